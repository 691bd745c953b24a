//! Copying one day-slot of a plan onto another.
//!
//! The backend performs the copy in a single request: it clears the target
//! day and duplicates the source day's entries into it. Argument checks run
//! here first so a bad request never reaches the network.

use tracing::info;

use coach_api::endpoints::{diets, routines};
use coach_api::models::{CopyDayRequest, Id, Meal, NewMeal, NewMealFood, NewRoutineEntry, PlanKind, RoutineEntry};
use coach_api::ApiClient;

use super::bucket::DaySlotted;
use crate::error::CoreError;

/// Highest day-slot the copy endpoints accept.
pub const MAX_DAY_SLOT: i32 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyDayOutcome {
    pub copied: usize,
    pub message: String,
}

/// Validate a copy request: both days in `1..=7` and distinct.
pub fn check_days(source_day: i32, target_day: i32) -> Result<CopyDayRequest, CoreError> {
    for (label, day) in [("source", source_day), ("target", target_day)] {
        if !(1..=MAX_DAY_SLOT).contains(&day) {
            return Err(CoreError::invalid(format!(
                "{label} day {day} is out of range (1-{MAX_DAY_SLOT})"
            )));
        }
    }
    if source_day == target_day {
        return Err(CoreError::conflict(format!(
            "source and target day are both {source_day}"
        )));
    }
    Ok(CopyDayRequest {
        source_day,
        target_day,
    })
}

/// Replace the entries of `target_day` with copies of `source_day`.
///
/// Not idempotent under concurrent edits: the last copy wins. Reload the
/// plan afterwards to see the new buckets.
pub async fn copy_day(
    client: &ApiClient,
    kind: PlanKind,
    plan_id: Id,
    source_day: i32,
    target_day: i32,
) -> Result<CopyDayOutcome, CoreError> {
    let request = check_days(source_day, target_day)?;
    let response = match kind {
        PlanKind::Routine => routines::copy_day(client, plan_id, request).await?,
        PlanKind::Diet => diets::copy_day(client, plan_id, request).await?,
    };
    info!(%kind, plan_id, source_day, target_day, copied = response.copied, "day copied");
    Ok(CopyDayOutcome {
        copied: response.copied,
        message: response.message,
    })
}

/// An entry that can be re-created in another day-slot.
pub trait DayCopyable: DaySlotted {
    type Draft;

    fn draft_for_day(&self, day: i32) -> Self::Draft;
}

impl DayCopyable for RoutineEntry {
    type Draft = NewRoutineEntry;

    fn draft_for_day(&self, day: i32) -> NewRoutineEntry {
        NewRoutineEntry {
            day,
            ..NewRoutineEntry::from(self)
        }
    }
}

/// A meal together with its foods, ready to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct MealDraft {
    pub meal: NewMeal,
    pub foods: Vec<NewMealFood>,
}

impl DayCopyable for Meal {
    type Draft = MealDraft;

    fn draft_for_day(&self, day: i32) -> MealDraft {
        MealDraft {
            meal: NewMeal {
                name: self.name.clone(),
                order: self.order,
                day,
            },
            foods: self
                .foods
                .iter()
                .map(|f| NewMealFood {
                    food_id: f.food_id,
                    grams: f.grams,
                })
                .collect(),
        }
    }
}

/// What a copy would do to an already-loaded plan.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyPreview<D> {
    pub source_day: i32,
    pub target_day: i32,
    /// Entries the target day will hold afterwards.
    pub drafts: Vec<D>,
    /// Entries currently in the target day that will be deleted.
    pub replaced: usize,
}

impl<D> CopyPreview<D> {
    /// The backend refuses to copy an empty day.
    pub fn source_is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

pub fn preview_day_copy<T: DayCopyable>(
    entries: &[T],
    source_day: i32,
    target_day: i32,
) -> Result<CopyPreview<T::Draft>, CoreError> {
    check_days(source_day, target_day)?;
    let drafts = entries
        .iter()
        .filter(|e| e.day_slot() == source_day)
        .map(|e| e.draft_for_day(target_day))
        .collect();
    let replaced = entries.iter().filter(|e| e.day_slot() == target_day).count();
    Ok(CopyPreview {
        source_day,
        target_day,
        drafts,
        replaced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_api::ApiError;

    fn entry(id: i64, day: i32, exercise_id: i64) -> RoutineEntry {
        RoutineEntry {
            id,
            routine_id: Some(1),
            exercise_id,
            day,
            sets: 4,
            reps: 8,
            weight: Some(60.0),
            rest_seconds: 90,
            notes: None,
            exercise: None,
        }
    }

    #[test]
    fn same_day_is_a_conflict() {
        let err = check_days(2, 2).unwrap_err();
        assert!(matches!(err, CoreError::Api(ApiError::Conflict(_))));
    }

    #[test]
    fn out_of_range_is_invalid() {
        for (s, t) in [(0, 1), (1, 8), (-1, 3), (8, 9)] {
            let err = check_days(s, t).unwrap_err();
            assert!(err.is_invalid_argument(), "({s}, {t}) should be rejected");
        }
        assert!(check_days(1, 7).is_ok());
    }

    #[test]
    fn preview_retargets_source_entries() {
        let entries = vec![entry(1, 1, 10), entry(2, 1, 11), entry(3, 3, 12), entry(4, 2, 13)];
        let preview = preview_day_copy(&entries, 1, 3).unwrap();
        assert_eq!(preview.replaced, 1);
        assert_eq!(preview.drafts.len(), 2);
        assert!(preview.drafts.iter().all(|d| d.day == 3));
        let ids: Vec<i64> = preview.drafts.iter().map(|d| d.exercise_id).collect();
        assert_eq!(ids, [10, 11]);
        assert_eq!(preview.drafts[0].sets, 4);
    }

    #[test]
    fn preview_of_empty_source() {
        let entries = vec![entry(1, 2, 10)];
        let preview = preview_day_copy(&entries, 1, 2).unwrap();
        assert!(preview.source_is_empty());
        assert_eq!(preview.replaced, 1);
    }

    #[test]
    fn meal_draft_keeps_foods() {
        let meal = Meal {
            id: 5,
            diet_id: Some(1),
            day: 1,
            name: "Desayuno".into(),
            order: 1,
            foods: vec![coach_api::models::MealFood {
                id: 7,
                meal_id: Some(5),
                food_id: 3,
                grams: 80.0,
                food: None,
            }],
        };
        let draft = meal.draft_for_day(4);
        assert_eq!(draft.meal.day, 4);
        assert_eq!(draft.meal.name, "Desayuno");
        assert_eq!(draft.foods, [NewMealFood { food_id: 3, grams: 80.0 }]);
    }
}
