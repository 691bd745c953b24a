//! End-to-end flow: log in, onboard a client, build a diet through the
//! catalog, and read back the macro totals per menu.

use chrono::NaiveDate;

use coach_api::endpoints::{auth, clients, diets};
use coach_api::models::{NewClient, NewDiet, NewMeal, NewMealFood};
use coach_core::catalog::{Catalog, FoodAttrs, FoodCatalog, Resolution};
use coach_core::nutrition::{diet_macros, menu_macros};
use coach_core::plan::diet_buckets;
use coach_core::validation::validate_new_client;
use coach_test_utils::FakeBackend;

#[tokio::test]
async fn oatmeal_breakfast_reports_120_kcal() {
    let backend = FakeBackend::spawn().await;

    let session = auth::login(&backend.anonymous_client(), "coach@example.com", "Secret123")
        .await
        .expect("login");
    let client = backend.anonymous_client().with_token(session.access_token);

    let mut new = NewClient {
        name: "  Ana ".into(),
        email: "ana@example.com".into(),
        birth_date: NaiveDate::from_ymd_opt(1994, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
        height: 1.70,
        goal: "lose weight".into(),
        billing_date: None,
    };
    let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    validate_new_client(&mut new, today).expect("valid client");
    let ana = clients::create_client(&client, &new).await.expect("create client");
    assert_eq!(ana.name, "Ana");

    let diet = diets::create_diet(
        &client,
        ana.id,
        &NewDiet {
            name: "Pérdida de grasa".into(),
            start_date: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    let breakfast = diets::add_meal(
        &client,
        diet.id,
        &NewMeal {
            name: "Breakfast".into(),
            order: 1,
            day: 1,
        },
    )
    .await
    .unwrap();
    diets::add_meal(
        &client,
        diet.id,
        &NewMeal {
            name: "Dinner".into(),
            order: 1,
            day: 2,
        },
    )
    .await
    .unwrap();

    let foods = FoodCatalog::new(client.clone());
    let oatmeal = match foods
        .resolve_or_create(
            "Oatmeal",
            &FoodAttrs {
                calories: 60.0,
                ..Default::default()
            },
        )
        .await
        .unwrap()
    {
        Resolution::Created(food) => food,
        other => panic!("expected a new catalog item, got {other:?}"),
    };
    diets::add_meal_food(
        &client,
        breakfast.id,
        &NewMealFood {
            food_id: oatmeal.id,
            grams: 200.0,
        },
    )
    .await
    .unwrap();

    let diet = diets::get_diet(&client, diet.id).await.unwrap();
    let menu1 = menu_macros(&diet, 1);
    assert_eq!(menu1.rounded().calories, 120);
    assert!(menu_macros(&diet, 2).is_zero());
    assert_eq!(diet_macros(&diet).rounded().calories, 120);

    let buckets = diet_buckets(&diet);
    assert_eq!(buckets.non_empty_days(), [1, 2]);
}
