//! CRUD round trips for clients and their progress history.

use chrono::NaiveDate;

use coach_api::ApiError;
use coach_api::endpoints::{clients, injuries, progress};
use coach_api::models::{ClientUpdate, InjuryUpdate, NewInjury, NewPersonalRecord, NewWeightEntry};
use coach_test_utils::FakeBackend;

fn day(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(9, 0, 0).unwrap()
}

#[tokio::test]
async fn create_update_delete_client() {
    let backend = FakeBackend::spawn().await;
    let api = backend.client();
    let ana = backend.seed_client("Ana López", "ana@example.com");

    let listed = clients::list_clients(&api).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Ana López");

    let updated = clients::update_client(
        &api,
        ana.id,
        &ClientUpdate {
            goal: Some("Ganar fuerza".into()),
            notifications_enabled: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.goal.as_deref(), Some("Ganar fuerza"));
    assert!(!updated.notifications_enabled);
    assert_eq!(updated.email, "ana@example.com", "unset fields are kept");

    clients::delete_client(&api, ana.id).await.unwrap();
    let err = clients::get_client(&api, ana.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref m) if m == "Alumno not found"), "{err:?}");
}

#[tokio::test]
async fn empty_update_is_not_sent() {
    let backend = FakeBackend::spawn().await;
    let api = backend.client();
    backend.clear_requests();

    let err = clients::update_client(&api, 1, &ClientUpdate::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn weights_feed_the_dashboard() {
    let backend = FakeBackend::spawn().await;
    let api = backend.client();
    let ana = backend.seed_client("Ana López", "ana@example.com");

    for (date, weight) in [(day(2024, 1, 10), 68.0), (day(2024, 2, 10), 66.5)] {
        progress::add_weight(&api, ana.id, &NewWeightEntry { weight, date: Some(date) })
            .await
            .unwrap();
    }
    let wrong = progress::add_weight(&api, ana.id, &NewWeightEntry { weight: 99.0, date: Some(day(2024, 3, 10)) })
        .await
        .unwrap();
    let fixed = progress::update_weight(&api, wrong.id, &NewWeightEntry { weight: 65.8, date: None })
        .await
        .unwrap();
    assert_eq!(fixed.weight, 65.8);
    assert_eq!(fixed.date, day(2024, 3, 10));

    let dashboard = clients::get_dashboard(&api, ana.id).await.unwrap();
    assert_eq!(dashboard.client.current_weight, Some(65.8));
    assert_eq!(dashboard.weight_history.len(), 3);
    assert!(dashboard.client.age.is_some());

    progress::delete_weight(&api, fixed.id).await.unwrap();
    let weights = progress::list_weights(&api, ana.id).await.unwrap();
    assert_eq!(weights.len(), 2);
}

#[tokio::test]
async fn personal_records_are_added_and_deleted() {
    let backend = FakeBackend::spawn().await;
    let api = backend.client();
    let ana = backend.seed_client("Ana López", "ana@example.com");

    let pr = progress::add_personal_record(
        &api,
        ana.id,
        &NewPersonalRecord {
            exercise: "Sentadilla".into(),
            weight: 95.0,
            reps: 3,
            date: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(pr.client_id, ana.id);

    let records = progress::list_personal_records(&api, ana.id).await.unwrap();
    assert_eq!(records, [pr.clone()]);

    progress::delete_personal_record(&api, pr.id).await.unwrap();
    assert!(progress::list_personal_records(&api, ana.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn injury_lifecycle() {
    let backend = FakeBackend::spawn().await;
    let api = backend.client();
    let ana = backend.seed_client("Ana López", "ana@example.com");

    let injury = injuries::create_injury(
        &api,
        ana.id,
        &NewInjury {
            name: "Tendinitis rotuliana".into(),
            description: Some("Molestia al bajar escaleras".into()),
            chronic: false,
            start_date: Some(day(2024, 4, 1)),
            end_date: None,
        },
    )
    .await
    .unwrap();
    assert!(injury.active);

    let healed = injuries::update_injury(
        &api,
        injury.id,
        &InjuryUpdate {
            active: Some(false),
            end_date: Some(day(2024, 5, 1)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(!healed.active);
    assert_eq!(healed.end_date, Some(day(2024, 5, 1)));

    injuries::delete_injury(&api, injury.id).await.unwrap();
    assert!(injuries::list_injuries(&api, ana.id).await.unwrap().is_empty());
}
