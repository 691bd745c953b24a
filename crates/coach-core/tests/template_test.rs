//! Integration tests for template capture, instantiation and plan copies.

use coach_api::endpoints::{diets, routines, templates};
use coach_api::models::{
    Id, NewDiet, NewMeal, NewMealFood, NewRoutine, NewRoutineEntry, PlanKind, RoutineEntryUpdate,
};
use coach_api::{ApiClient, ApiError};
use coach_core::CoreError;
use coach_core::plan::{
    copy_routine_to_client, instantiate_diet_template, instantiate_routine_template,
    save_diet_as_template, save_routine_as_template,
};
use coach_test_utils::FakeBackend;

async fn seeded_routine(backend: &FakeBackend, client: &ApiClient) -> (Id, Id) {
    let ana = backend.seed_client("Ana López", "ana@example.com");
    let press = backend.seed_exercise("Press banca", "Pecho");
    let squat = backend.seed_exercise("Sentadilla", "Pierna");
    let routine = routines::create_routine(
        client,
        ana.id,
        &NewRoutine {
            name: "Full body".into(),
            start_date: None,
            expiry_date: None,
            notes: Some("Subir carga cada semana".into()),
            day_count: Some(2),
        },
    )
    .await
    .unwrap();
    for (day, exercise_id) in [(1, press.id), (2, squat.id)] {
        routines::add_entry(
            client,
            routine.id,
            &NewRoutineEntry {
                exercise_id,
                day,
                sets: 3,
                reps: 10,
                weight: None,
                rest_seconds: 60,
                notes: None,
            },
        )
        .await
        .unwrap();
    }
    (ana.id, routine.id)
}

#[tokio::test]
async fn save_then_instantiate_routine_template() {
    let backend = FakeBackend::spawn().await;
    let client = backend.client();
    let (_, routine_id) = seeded_routine(&backend, &client).await;
    let luis = backend.seed_client("Luis Pérez", "luis@example.com");

    let (template, saved) = save_routine_as_template(&client, routine_id).await.unwrap();
    assert!(template.is_template);
    assert_eq!(template.client_id, None);
    assert_eq!(template.name, "Full body (Plantilla)");
    assert_eq!(saved.entries, 2);

    let (routine, report) = instantiate_routine_template(&client, template.id, luis.id)
        .await
        .unwrap();
    assert_eq!(report.kind, PlanKind::Routine);
    assert_eq!(report.source_id, template.id);
    assert_eq!(report.client_id, Some(luis.id));
    assert_eq!(routine.name, "Full body");
    assert_eq!(routine.day_count, 2);
    assert_eq!(routine.entries.len(), 2);
    assert!(routine.active);
    assert!(!routine.is_template);
}

#[tokio::test]
async fn instance_is_independent_of_template() {
    let backend = FakeBackend::spawn().await;
    let client = backend.client();
    let (_, routine_id) = seeded_routine(&backend, &client).await;
    let luis = backend.seed_client("Luis Pérez", "luis@example.com");

    let (template, _) = save_routine_as_template(&client, routine_id).await.unwrap();
    let (routine, _) = instantiate_routine_template(&client, template.id, luis.id)
        .await
        .unwrap();

    let first = &routine.entries[0];
    let updated = routines::update_entry(
        &client,
        first.id,
        &RoutineEntryUpdate {
            sets: Some(5),
            reps: Some(5),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!((updated.sets, updated.reps), (5, 5));
    let template_now = templates::find_routine_template(&client, template.id).await.unwrap();
    let untouched = template_now
        .entries
        .iter()
        .find(|e| e.exercise_id == first.exercise_id && e.day == first.day)
        .unwrap();
    assert_eq!((untouched.sets, untouched.reps), (3, 10), "template entry keeps its values");

    for entry in &routine.entries {
        routines::delete_entry(&client, entry.id).await.unwrap();
    }
    assert!(routines::get_routine(&client, routine.id).await.unwrap().entries.is_empty());

    let template = templates::find_routine_template(&client, template.id).await.unwrap();
    assert_eq!(template.entries.len(), 2, "template keeps its entries");
    assert_eq!(backend.routine(routine_id).unwrap().entries.len(), 2, "source keeps its entries");
}

#[tokio::test]
async fn bare_mutation_rows_are_verified_after_reading_back() {
    let backend = FakeBackend::spawn().await;
    let client = backend.client();
    let (_, routine_id) = seeded_routine(&backend, &client).await;
    let luis = backend.seed_client("Luis Pérez", "luis@example.com");
    let marta = backend.seed_client("Marta Ruiz", "marta@example.com");
    backend.return_bare_copy_rows();

    let (template, saved) = save_routine_as_template(&client, routine_id).await.unwrap();
    assert_eq!(saved.entries, 2);
    assert_eq!(template.entries.len(), 2);

    backend.clear_requests();
    let (routine, report) = instantiate_routine_template(&client, template.id, luis.id)
        .await
        .unwrap();
    assert_eq!(report.entries, 2);
    assert_eq!(routine.entries.len(), 2);
    let reread = format!("GET /rutinas/{}", routine.id);
    assert!(backend.requests().contains(&reread), "{:?}", backend.requests());

    let (copy, report) = copy_routine_to_client(&client, routine_id, marta.id).await.unwrap();
    assert_eq!(report.entries, 2);
    assert_eq!(copy.entries.len(), 2);
}

#[tokio::test]
async fn instantiating_for_unknown_client_fails() {
    let backend = FakeBackend::spawn().await;
    let client = backend.client();
    let (_, routine_id) = seeded_routine(&backend, &client).await;
    let (template, _) = save_routine_as_template(&client, routine_id).await.unwrap();

    let err = instantiate_routine_template(&client, template.id, 9_999).await.unwrap_err();
    assert!(matches!(err, CoreError::Api(ApiError::NotFound(_))), "got {err:?}");
    assert_eq!(backend.lock().routines.len(), 1, "no routine was created");
}

#[tokio::test]
async fn copy_routine_to_other_client_retires_their_active_routine() {
    let backend = FakeBackend::spawn().await;
    let client = backend.client();
    let (ana_id, routine_id) = seeded_routine(&backend, &client).await;
    let luis = backend.seed_client("Luis Pérez", "luis@example.com");
    let old = routines::create_routine(
        &client,
        luis.id,
        &NewRoutine {
            name: "Antigua".into(),
            start_date: None,
            expiry_date: None,
            notes: None,
            day_count: None,
        },
    )
    .await
    .unwrap();

    let (copy, report) = copy_routine_to_client(&client, routine_id, luis.id).await.unwrap();
    assert_eq!(copy.client_id, Some(luis.id));
    assert_eq!(report.entries, 2);
    assert!(!backend.routine(old.id).unwrap().active);

    let err = copy_routine_to_client(&client, routine_id, ana_id).await.unwrap_err();
    assert!(err.is_conflict(), "copying to the owner is refused, got {err:?}");
}

#[tokio::test]
async fn diet_template_round_trip_keeps_menus() {
    let backend = FakeBackend::spawn().await;
    let client = backend.client();
    let ana = backend.seed_client("Ana López", "ana@example.com");
    let luis = backend.seed_client("Luis Pérez", "luis@example.com");
    let rice = backend.seed_food("Arroz", (130.0, 2.7, 28.0, 0.3));
    let chicken = backend.seed_food("Pollo", (165.0, 31.0, 0.0, 3.6));

    let diet = diets::create_diet(
        &client,
        ana.id,
        &NewDiet {
            name: "Volumen".into(),
            start_date: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    for day in [1, 3] {
        let meal = diets::add_meal(
            &client,
            diet.id,
            &NewMeal {
                name: "Comida".into(),
                order: 2,
                day,
            },
        )
        .await
        .unwrap();
        for (food_id, grams) in [(rice.id, 100.0), (chicken.id, 150.0)] {
            diets::add_meal_food(&client, meal.id, &NewMealFood { food_id, grams })
                .await
                .unwrap();
        }
    }

    backend.return_bare_copy_rows();
    let (template, saved) = save_diet_as_template(&client, diet.id).await.unwrap();
    assert_eq!(saved.entries, 2);
    assert_eq!(saved.foods, 4);

    let (copy, report) = instantiate_diet_template(&client, template.id, luis.id).await.unwrap();
    assert_eq!(report.foods, 4);
    let days: Vec<i32> = copy.meals.iter().map(|m| m.day).collect();
    assert_eq!(days, [1, 3]);
    assert_eq!(copy.name, "Volumen");
}
