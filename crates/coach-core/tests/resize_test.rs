//! Changing a routine's training-day count.

use coach_api::endpoints::routines;
use coach_api::models::{Id, NewRoutine, NewRoutineEntry};
use coach_core::plan::{ResizePolicy, resize_routine, routine_buckets};
use coach_test_utils::FakeBackend;

async fn four_day_routine(backend: &FakeBackend) -> Id {
    let client = backend.client();
    let ana = backend.seed_client("Ana López", "ana@example.com");
    let press = backend.seed_exercise("Press banca", "Pecho");
    let routine = routines::create_routine(
        &client,
        ana.id,
        &NewRoutine {
            name: "Weider".into(),
            start_date: None,
            expiry_date: None,
            notes: None,
            day_count: Some(4),
        },
    )
    .await
    .unwrap();
    for day in 1..=4 {
        routines::add_entry(
            &client,
            routine.id,
            &NewRoutineEntry {
                exercise_id: press.id,
                day,
                sets: 3,
                reps: 12,
                weight: None,
                rest_seconds: 60,
                notes: None,
            },
        )
        .await
        .unwrap();
    }
    routine.id
}

#[tokio::test]
async fn shrinking_over_entries_is_refused_by_default() {
    let backend = FakeBackend::spawn().await;
    let id = four_day_routine(&backend).await;

    let err = resize_routine(&backend.client(), id, 2, ResizePolicy::Refuse)
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "got {err:?}");
    assert!(err.to_string().contains("3, 4"), "names the orphaned days: {err}");

    let routine = backend.routine(id).unwrap();
    assert_eq!(routine.day_count, 4);
    assert_eq!(routine.entries.len(), 4);
}

#[tokio::test]
async fn shrinking_with_delete_policy_removes_orphans() {
    let backend = FakeBackend::spawn().await;
    let id = four_day_routine(&backend).await;

    let outcome = resize_routine(&backend.client(), id, 2, ResizePolicy::DeleteOrphans)
        .await
        .unwrap();
    assert_eq!(outcome.deleted_entries, 2);
    assert_eq!(outcome.routine.day_count, 2);

    let buckets = routine_buckets(&outcome.routine);
    assert_eq!(buckets.day_count(), 2);
    assert_eq!(buckets.orphaned(), 0);
    assert_eq!(buckets.total(), 2);
}

#[tokio::test]
async fn growing_never_deletes() {
    let backend = FakeBackend::spawn().await;
    let id = four_day_routine(&backend).await;

    let outcome = resize_routine(&backend.client(), id, 6, ResizePolicy::Refuse)
        .await
        .unwrap();
    assert_eq!(outcome.deleted_entries, 0);
    assert_eq!(outcome.routine.day_count, 6);
    assert_eq!(routine_buckets(&outcome.routine).get(6).map(<[_]>::len), Some(0));
}

#[tokio::test]
async fn out_of_range_count_is_rejected_locally() {
    let backend = FakeBackend::spawn().await;
    backend.clear_requests();
    let err = resize_routine(&backend.client(), 1, 8, ResizePolicy::DeleteOrphans)
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(backend.request_count(), 0);
}
