//! Weight history and personal records.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::info;

use coach_api::ApiClient;
use coach_api::endpoints::progress as api;
use coach_api::models::{Id, NewPersonalRecord, NewWeightEntry, PersonalRecord, WeightEntry};

use crate::error::CoreError;
use crate::validation::{self, ValidationError};

/// Validate, then record a body weight.
pub async fn record_weight(
    client: &ApiClient,
    client_id: Id,
    weight: f64,
    date: Option<NaiveDateTime>,
) -> Result<WeightEntry, CoreError> {
    let entry = NewWeightEntry { weight, date };
    validation::validate_weight_entry(&entry).map_err(CoreError::Validation)?;
    let saved = api::add_weight(client, client_id, &entry).await?;
    info!(client_id, weight, "weight recorded");
    Ok(saved)
}

/// Validate, then record a personal record. Records are never edited.
pub async fn record_personal_best(
    client: &ApiClient,
    client_id: Id,
    exercise: &str,
    weight: f64,
    reps: i32,
    date: Option<NaiveDateTime>,
) -> Result<PersonalRecord, CoreError> {
    let exercise = validation::sanitize(exercise);
    let mut errors = Vec::new();
    if let Err(e) = validation::validate_name("ejercicio", &exercise) {
        errors.push(e);
    }
    if let Err(e) = validation::validate_positive("peso", weight, 0.0, 1000.0) {
        errors.push(e);
    }
    if reps < 1 {
        errors.push(ValidationError::new("repeticiones", "must be at least 1"));
    }
    if !errors.is_empty() {
        return Err(CoreError::Validation(errors));
    }
    let record = NewPersonalRecord {
        exercise,
        weight,
        reps,
        date,
    };
    Ok(api::add_personal_record(client, client_id, &record).await?)
}

/// Heaviest record per exercise, ties broken by more reps, then the most
/// recent date. Exercise names compare case-insensitively; the result is
/// sorted by name.
pub fn best_records(records: &[PersonalRecord]) -> Vec<&PersonalRecord> {
    let mut best: BTreeMap<String, &PersonalRecord> = BTreeMap::new();
    for record in records {
        let key = record.exercise.trim().to_lowercase();
        match best.get(&key) {
            Some(current) if !beats(record, current) => {}
            _ => {
                best.insert(key, record);
            }
        }
    }
    best.into_values().collect()
}

fn beats(a: &PersonalRecord, b: &PersonalRecord) -> bool {
    a.weight
        .total_cmp(&b.weight)
        .then(a.reps.cmp(&b.reps))
        .then(a.date.cmp(&b.date))
        .is_gt()
}

/// Change between the oldest and newest weight entries, in kg.
pub fn weight_change(entries: &[WeightEntry]) -> Option<f64> {
    let first = entries.iter().min_by_key(|e| e.date)?;
    let last = entries.iter().max_by_key(|e| e.date)?;
    Some(last.weight - first.weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn pr(id: Id, exercise: &str, weight: f64, reps: i32, day: u32) -> PersonalRecord {
        PersonalRecord {
            id,
            client_id: 1,
            exercise: exercise.into(),
            weight,
            reps,
            date: at(day),
        }
    }

    #[test]
    fn best_record_per_exercise() {
        let records = vec![
            pr(1, "Sentadilla", 100.0, 5, 1),
            pr(2, "sentadilla", 110.0, 3, 2),
            pr(3, "Press banca", 80.0, 5, 3),
            pr(4, "Press banca", 80.0, 6, 4),
            pr(5, "Sentadilla", 105.0, 8, 5),
        ];
        let best: Vec<Id> = best_records(&records).iter().map(|r| r.id).collect();
        assert_eq!(best, [4, 2]);
    }

    #[test]
    fn equal_records_prefer_latest() {
        let records = vec![pr(1, "Remo", 60.0, 8, 1), pr(2, "Remo", 60.0, 8, 9)];
        assert_eq!(best_records(&records)[0].id, 2);
    }

    #[test]
    fn weight_change_spans_history() {
        let entries = vec![
            WeightEntry { id: 1, client_id: 1, weight: 80.0, date: at(10) },
            WeightEntry { id: 2, client_id: 1, weight: 82.5, date: at(1) },
            WeightEntry { id: 3, client_id: 1, weight: 79.0, date: at(20) },
        ];
        assert_eq!(weight_change(&entries), Some(-3.5));
        assert_eq!(weight_change(&[]), None);
    }
}
