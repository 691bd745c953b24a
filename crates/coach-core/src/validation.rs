//! Field validators applied before a request is sent.
//!
//! Each validator returns a [`ValidationError`] naming the offending field so
//! callers can show the message next to it. The backend validates again.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use coach_api::models::{NewClient, NewFood, NewWeightEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn validate_email(field: &str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new(field, "invalid email address");
    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return Err(invalid());
    };
    if host.is_empty() || tld.is_empty() {
        return Err(invalid());
    }
    Ok(())
}

/// At least 8 characters with one lowercase, one uppercase and one digit.
pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    const SYMBOLS: &str = "@$!%*?&";
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || SYMBOLS.contains(c));
    let ok = value.chars().count() >= 8
        && allowed
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new(
            "password",
            "must be at least 8 characters with upper and lower case letters and a digit",
        ))
    }
}

pub fn validate_name(field: &str, value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            format!("must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"),
        ))
    }
}

/// Height in metres, exclusive bounds.
pub fn validate_height(value: f64) -> Result<(), ValidationError> {
    if value > 0.5 && value < 3.0 {
        Ok(())
    } else {
        Err(ValidationError::new("altura", "must be between 0.5 and 3.0 m"))
    }
}

/// Body weight in kg, exclusive bounds.
pub fn validate_weight(value: f64) -> Result<(), ValidationError> {
    if value > 20.0 && value < 500.0 {
        Ok(())
    } else {
        Err(ValidationError::new("peso", "must be between 20 and 500 kg"))
    }
}

/// Age by calendar year difference, inclusive bounds.
pub fn validate_age(birth_date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    let age = today.year() - birth_date.year();
    if (10..=120).contains(&age) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "fecha_nacimiento",
            "age must be between 10 and 120 years",
        ))
    }
}

/// Inclusive range check for quantities such as grams, sets or reps.
pub fn validate_positive(field: &str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else if max.is_finite() {
        Err(ValidationError::new(field, format!("must be between {min} and {max}")))
    } else {
        Err(ValidationError::new(field, format!("must be at least {min}")))
    }
}

/// Trim and drop angle brackets.
pub fn sanitize(input: &str) -> String {
    input.trim().chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

fn collect(checks: impl IntoIterator<Item = Result<(), ValidationError>>) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = checks.into_iter().filter_map(Result::err).collect();
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Sanitize free-text fields in place, then check every field.
pub fn validate_new_client(client: &mut NewClient, today: NaiveDate) -> Result<(), Vec<ValidationError>> {
    client.name = sanitize(&client.name);
    client.email = client.email.trim().to_owned();
    client.goal = sanitize(&client.goal);
    collect([
        validate_name("nombre", &client.name),
        validate_email("email", &client.email),
        validate_height(client.height),
        validate_age(client.birth_date.date(), today),
        if client.goal.is_empty() {
            Err(ValidationError::new("objetivo", "is required"))
        } else {
            Ok(())
        },
    ])
}

pub fn validate_new_food(food: &mut NewFood) -> Result<(), Vec<ValidationError>> {
    food.name = sanitize(&food.name);
    collect([
        validate_name("nombre", &food.name),
        validate_positive("calorias_100g", food.calories_per_100g, 0.0, 900.0),
        validate_positive("proteinas_100g", food.protein_per_100g, 0.0, 100.0),
        validate_positive("carbohidratos_100g", food.carbs_per_100g, 0.0, 100.0),
        validate_positive("grasas_100g", food.fat_per_100g, 0.0, 100.0),
    ])
}

pub fn validate_weight_entry(entry: &NewWeightEntry) -> Result<(), Vec<ValidationError>> {
    collect([validate_weight(entry.weight)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("email", "ana@example.com").is_ok());
        assert!(validate_email("email", "ana@mail.example.es").is_ok());
        for bad in ["ana", "ana@", "@example.com", "ana@example", "a na@example.com", "a@b@c.com", "ana@.com"] {
            assert!(validate_email("email", bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("Secret123").is_ok());
        assert!(validate_password("Secr3t!x").is_ok());
        assert!(validate_password("secret123").is_err());
        assert!(validate_password("SECRET123").is_err());
        assert!(validate_password("Secretxyz").is_err());
        assert!(validate_password("Sec12").is_err());
        assert!(validate_password("Secret 123").is_err());
    }

    #[test]
    fn name_length_counts_trimmed_chars() {
        assert!(validate_name("nombre", "  A  ").is_err());
        assert!(validate_name("nombre", "Ana").is_ok());
        assert!(validate_name("nombre", "Íñ").is_ok());
        assert!(validate_name("nombre", &"x".repeat(101)).is_err());
    }

    #[test]
    fn height_and_weight_bounds_are_exclusive() {
        assert!(validate_height(0.5).is_err());
        assert!(validate_height(1.70).is_ok());
        assert!(validate_height(3.0).is_err());
        assert!(validate_weight(20.0).is_err());
        assert!(validate_weight(72.5).is_ok());
        assert!(validate_weight(500.0).is_err());
    }

    #[test]
    fn age_uses_year_difference() {
        let today = date(2024, 1, 1);
        assert!(validate_age(date(2014, 12, 31), today).is_ok());
        assert!(validate_age(date(2015, 1, 1), today).is_err());
        assert!(validate_age(date(1904, 6, 1), today).is_ok());
        assert!(validate_age(date(1903, 6, 1), today).is_err());
    }

    #[test]
    fn sanitize_strips_brackets() {
        assert_eq!(sanitize("  <b>Avena</b> "), "bAvena/b");
        assert_eq!(sanitize("Pollo"), "Pollo");
    }

    #[test]
    fn positive_range() {
        assert!(validate_positive("gramos", 150.0, 1.0, 2000.0).is_ok());
        assert!(validate_positive("gramos", 0.0, 1.0, 2000.0).is_err());
        let err = validate_positive("series", -1.0, 1.0, f64::INFINITY).unwrap_err();
        assert_eq!(err.message, "must be at least 1");
    }

    #[test]
    fn new_client_collects_every_error() {
        let mut client = NewClient {
            name: " <A> ".into(),
            email: "not-an-email".into(),
            birth_date: date(2020, 1, 1).and_hms_opt(0, 0, 0).unwrap(),
            height: 17.0,
            goal: "perder peso".into(),
            billing_date: None,
        };
        let errors = validate_new_client(&mut client, date(2024, 6, 1)).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["nombre", "email", "altura", "fecha_nacimiento"]);
        assert_eq!(client.name, "A");
    }

    #[test]
    fn valid_client_passes() {
        let mut client = NewClient {
            name: "Ana".into(),
            email: " ana@example.com ".into(),
            birth_date: date(1995, 6, 15).and_hms_opt(0, 0, 0).unwrap(),
            height: 1.70,
            goal: "lose weight".into(),
            billing_date: None,
        };
        assert!(validate_new_client(&mut client, date(2024, 6, 1)).is_ok());
        assert_eq!(client.email, "ana@example.com");
    }
}
