//! Day-slot grouping.
//!
//! The backend returns plan entries as one flat list, each tagged with its
//! day-slot. [`DayBucketMap`] regroups them for display and is rebuilt from
//! scratch after every mutation.

use coach_api::models::{Diet, Meal, Routine, RoutineEntry};

/// Diets always offer seven menus.
pub const DIET_MENU_SLOTS: i32 = 7;

/// Anything placed in a numbered day-slot.
pub trait DaySlotted {
    fn day_slot(&self) -> i32;
}

impl DaySlotted for RoutineEntry {
    fn day_slot(&self) -> i32 {
        self.day
    }
}

impl DaySlotted for Meal {
    fn day_slot(&self) -> i32 {
        self.day
    }
}

/// Entries grouped by day-slot `1..=day_count`, input order kept per slot.
#[derive(Debug)]
pub struct DayBucketMap<'a, T> {
    buckets: Vec<Vec<&'a T>>,
    orphaned: usize,
}

impl<'a, T: DaySlotted> DayBucketMap<'a, T> {
    /// Entries whose slot falls outside the range are left out of every
    /// bucket and counted by [`orphaned`](Self::orphaned).
    pub fn build(entries: &'a [T], day_count: i32) -> Self {
        let slots = usize::try_from(day_count).unwrap_or(0);
        let mut buckets: Vec<Vec<&'a T>> = vec![Vec::new(); slots];
        let mut orphaned = 0;
        for entry in entries {
            let day = entry.day_slot();
            match usize::try_from(day).ok().filter(|d| (1..=slots).contains(d)) {
                Some(d) => buckets[d - 1].push(entry),
                None => orphaned += 1,
            }
        }
        Self { buckets, orphaned }
    }

    pub fn day_count(&self) -> i32 {
        self.buckets.len() as i32
    }

    /// Entries of `day`, or `None` when `day` is not a slot of this map.
    pub fn get(&self, day: i32) -> Option<&[&'a T]> {
        let idx = usize::try_from(day).ok()?.checked_sub(1)?;
        self.buckets.get(idx).map(Vec::as_slice)
    }

    /// `(day, entries)` in ascending day order, empty days included.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &[&'a T])> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| (i as i32 + 1, bucket.as_slice()))
    }

    pub fn orphaned(&self) -> usize {
        self.orphaned
    }

    pub fn non_empty_days(&self) -> Vec<i32> {
        self.iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(day, _)| day)
            .collect()
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

pub fn routine_buckets(routine: &Routine) -> DayBucketMap<'_, RoutineEntry> {
    DayBucketMap::build(&routine.entries, routine.day_count)
}

/// Menus of a diet; meals inside a menu keep the backend order (by `orden`).
pub fn diet_buckets(diet: &Diet) -> DayBucketMap<'_, Meal> {
    DayBucketMap::build(&diet.meals, DIET_MENU_SLOTS)
}
