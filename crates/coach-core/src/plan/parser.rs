//! Plan file parser with validation.
//!
//! Parses a plan file into a [`PlanFile`] and validates:
//! - The plan name is not blank.
//! - Routines only carry `[[exercises]]`, diets only `[[meals]]`.
//! - Every day-slot is within the plan's range.
//! - Quantities are positive and catalog names are searchable.

use std::collections::HashSet;

use coach_api::models::PlanKind;
use thiserror::Error;

use super::bucket::DIET_MENU_SLOTS;
use super::toml_format::PlanFile;
use crate::catalog::MIN_SEARCH_LEN;

#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("plan name must not be empty")]
    EmptyName,

    #[error("day count {0} is out of range (1-7)")]
    InvalidDayCount(i32),

    #[error("a {kind} plan cannot contain [[{section}]]")]
    UnexpectedSection { kind: PlanKind, section: &'static str },

    #[error("plan must contain at least one entry")]
    NoEntries,

    #[error("{entry}: day {day} is outside 1-{max}")]
    DayOutOfRange { entry: String, day: i32, max: i32 },

    #[error("{entry}: {field} must be positive")]
    NonPositive { entry: String, field: &'static str },

    #[error("{entry}: catalog name {name:?} is too short to search (minimum 3 characters)")]
    NameTooShort { entry: String, name: String },

    #[error("menu {day} has two meals named {name:?}")]
    DuplicateMeal { day: i32, name: String },
}

/// Parse and validate a plan file.
pub fn parse_plan_toml(content: &str) -> Result<PlanFile, PlanParseError> {
    let plan: PlanFile = toml::from_str(content)?;
    validate(&plan)?;
    Ok(plan)
}

fn validate(plan: &PlanFile) -> Result<(), PlanParseError> {
    if plan.plan.name.trim().is_empty() {
        return Err(PlanParseError::EmptyName);
    }
    match plan.plan.kind {
        PlanKind::Routine => validate_routine(plan),
        PlanKind::Diet => validate_diet(plan),
    }
}

fn check_name(entry: &str, name: &str) -> Result<(), PlanParseError> {
    if name.trim().chars().count() < MIN_SEARCH_LEN {
        return Err(PlanParseError::NameTooShort {
            entry: entry.to_owned(),
            name: name.to_owned(),
        });
    }
    Ok(())
}

fn validate_routine(plan: &PlanFile) -> Result<(), PlanParseError> {
    if !plan.meals.is_empty() {
        return Err(PlanParseError::UnexpectedSection {
            kind: PlanKind::Routine,
            section: "meals",
        });
    }
    let max = plan.plan.day_count;
    if !(1..=DIET_MENU_SLOTS).contains(&max) {
        return Err(PlanParseError::InvalidDayCount(max));
    }
    if plan.exercises.is_empty() {
        return Err(PlanParseError::NoEntries);
    }

    for (i, ex) in plan.exercises.iter().enumerate() {
        let entry = format!("exercise {} ({})", i + 1, ex.exercise);
        if !(1..=max).contains(&ex.day) {
            return Err(PlanParseError::DayOutOfRange { entry, day: ex.day, max });
        }
        check_name(&entry, &ex.exercise)?;
        let non_positive = if ex.sets <= 0 {
            Some("sets")
        } else if ex.reps <= 0 {
            Some("reps")
        } else if ex.rest < 0 {
            Some("rest")
        } else if ex.weight.is_some_and(|w| w <= 0.0) {
            Some("weight")
        } else {
            None
        };
        if let Some(field) = non_positive {
            return Err(PlanParseError::NonPositive { entry, field });
        }
    }
    Ok(())
}

fn validate_diet(plan: &PlanFile) -> Result<(), PlanParseError> {
    if !plan.exercises.is_empty() {
        return Err(PlanParseError::UnexpectedSection {
            kind: PlanKind::Diet,
            section: "exercises",
        });
    }
    if plan.meals.is_empty() {
        return Err(PlanParseError::NoEntries);
    }

    let mut seen = HashSet::new();
    for (i, meal) in plan.meals.iter().enumerate() {
        let entry = format!("meal {} ({})", i + 1, meal.name);
        if !(1..=DIET_MENU_SLOTS).contains(&meal.day) {
            return Err(PlanParseError::DayOutOfRange {
                entry,
                day: meal.day,
                max: DIET_MENU_SLOTS,
            });
        }
        if meal.name.trim().is_empty() {
            return Err(PlanParseError::EmptyName);
        }
        if !seen.insert((meal.day, meal.name.trim().to_lowercase())) {
            return Err(PlanParseError::DuplicateMeal {
                day: meal.day,
                name: meal.name.clone(),
            });
        }
        for food in &meal.foods {
            let entry = format!("{entry} / {}", food.food);
            check_name(&entry, &food.food)?;
            if food.grams <= 0.0 {
                return Err(PlanParseError::NonPositive { entry, field: "grams" });
            }
        }
    }
    Ok(())
}
