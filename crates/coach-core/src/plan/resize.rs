//! Changing a routine's number of training days.
//!
//! Entries are never renumbered. Shrinking a routine would hide entries in
//! the removed day-slots, so it is refused unless the caller asks for those
//! entries to be deleted first.

use tracing::info;

use coach_api::ApiClient;
use coach_api::endpoints::routines;
use coach_api::models::{Id, Routine, RoutineUpdate};

use super::copy::MAX_DAY_SLOT;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizePolicy {
    /// Fail with a conflict when entries would be orphaned.
    #[default]
    Refuse,
    /// Delete entries in the removed day-slots, then resize.
    DeleteOrphans,
}

/// Entries a resize would leave outside the new range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Orphans {
    pub days: Vec<i32>,
    pub entry_ids: Vec<Id>,
}

impl Orphans {
    pub fn is_empty(&self) -> bool {
        self.entry_ids.is_empty()
    }
}

pub fn find_orphans(routine: &Routine, new_day_count: i32) -> Orphans {
    let mut orphans = Orphans::default();
    for entry in routine.entries.iter().filter(|e| e.day > new_day_count) {
        orphans.entry_ids.push(entry.id);
        if !orphans.days.contains(&entry.day) {
            orphans.days.push(entry.day);
        }
    }
    orphans.days.sort_unstable();
    orphans
}

#[derive(Debug, Clone)]
pub struct ResizeOutcome {
    pub routine: Routine,
    pub deleted_entries: usize,
}

pub async fn resize_routine(
    client: &ApiClient,
    routine_id: Id,
    new_day_count: i32,
    policy: ResizePolicy,
) -> Result<ResizeOutcome, CoreError> {
    if !(1..=MAX_DAY_SLOT).contains(&new_day_count) {
        return Err(CoreError::invalid(format!(
            "day count {new_day_count} is out of range (1-{MAX_DAY_SLOT})"
        )));
    }

    let routine = routines::get_routine(client, routine_id).await?;
    let orphans = find_orphans(&routine, new_day_count);
    if !orphans.is_empty() && policy == ResizePolicy::Refuse {
        let days: Vec<String> = orphans.days.iter().map(ToString::to_string).collect();
        return Err(CoreError::conflict(format!(
            "day(s) {} still hold {} exercise(s); delete them first or allow deleting orphans",
            days.join(", "),
            orphans.entry_ids.len()
        )));
    }

    for entry_id in &orphans.entry_ids {
        routines::delete_entry(client, *entry_id).await?;
    }

    let update = RoutineUpdate {
        day_count: Some(new_day_count),
        ..Default::default()
    };
    routines::update_routine(client, routine_id, &update).await?;
    let routine = routines::get_routine(client, routine_id).await?;
    info!(
        routine_id,
        new_day_count,
        deleted = orphans.entry_ids.len(),
        "routine resized"
    );
    Ok(ResizeOutcome {
        routine,
        deleted_entries: orphans.entry_ids.len(),
    })
}
