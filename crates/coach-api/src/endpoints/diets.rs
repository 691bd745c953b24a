//! Diet ("dieta") resources: meals and the foods inside them.

use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    CopyDayRequest, CopyDayResponse, Diet, Id, Meal, MealFood, MealUpdate, NewDiet, NewMeal,
    NewMealFood,
};

pub async fn list_diets(client: &ApiClient, client_id: Id) -> Result<Vec<Diet>, ApiError> {
    client.get(&format!("/alumnos/{client_id}/dietas")).await
}

pub async fn create_diet(client: &ApiClient, client_id: Id, new: &NewDiet) -> Result<Diet, ApiError> {
    let diet: Diet = client
        .post(&format!("/alumnos/{client_id}/dietas"), new)
        .await?;
    info!(diet_id = diet.id, client_id, "diet created");
    Ok(diet)
}

/// Fetch a diet with meals and foods inlined.
pub async fn get_diet(client: &ApiClient, id: Id) -> Result<Diet, ApiError> {
    client.get(&format!("/dietas/{id}")).await
}

pub async fn delete_diet(client: &ApiClient, id: Id) -> Result<(), ApiError> {
    client.delete(&format!("/dietas/{id}")).await?;
    info!(diet_id = id, "diet deleted");
    Ok(())
}

pub async fn add_meal(client: &ApiClient, diet_id: Id, meal: &NewMeal) -> Result<Meal, ApiError> {
    client.post(&format!("/dietas/{diet_id}/comidas"), meal).await
}

pub async fn update_meal(client: &ApiClient, meal_id: Id, update: &MealUpdate) -> Result<Meal, ApiError> {
    client.patch(&format!("/comidas/{meal_id}"), update).await
}

pub async fn delete_meal(client: &ApiClient, meal_id: Id) -> Result<(), ApiError> {
    client.delete(&format!("/comidas/{meal_id}")).await
}

pub async fn add_meal_food(
    client: &ApiClient,
    meal_id: Id,
    food: &NewMealFood,
) -> Result<MealFood, ApiError> {
    client
        .post(&format!("/comidas/{meal_id}/alimentos"), food)
        .await
}

pub async fn delete_meal_food(client: &ApiClient, meal_food_id: Id) -> Result<(), ApiError> {
    client
        .delete(&format!("/comida-alimentos/{meal_food_id}"))
        .await
}

/// Replace the target menu's meals with copies of the source menu's.
/// Runs as one backend transaction.
pub async fn copy_day(
    client: &ApiClient,
    diet_id: Id,
    request: CopyDayRequest,
) -> Result<CopyDayResponse, ApiError> {
    client
        .post(&format!("/dietas/{diet_id}/copy-day"), &request)
        .await
}
