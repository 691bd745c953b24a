//! Exercise and food catalogs.
//!
//! Search ordering and matching are decided by the backend (substring match,
//! capped at 20 results for foods).

use tracing::info;

use crate::client::{ApiClient, path_segment};
use crate::error::ApiError;
use crate::models::{Exercise, Food, NewExercise, NewFood};

pub async fn list_exercises(client: &ApiClient) -> Result<Vec<Exercise>, ApiError> {
    client.get("/ejercicios-base").await
}

pub async fn search_exercises(client: &ApiClient, term: &str) -> Result<Vec<Exercise>, ApiError> {
    client
        .get(&format!("/ejercicios-base/search/{}", path_segment(term)))
        .await
}

pub async fn create_exercise(client: &ApiClient, new: &NewExercise) -> Result<Exercise, ApiError> {
    let created: Exercise = client.post("/ejercicios-base", new).await?;
    info!(exercise_id = created.id, name = %created.name, "exercise cataloged");
    Ok(created)
}

pub async fn list_foods(client: &ApiClient) -> Result<Vec<Food>, ApiError> {
    client.get("/alimentos").await
}

pub async fn search_foods(client: &ApiClient, term: &str) -> Result<Vec<Food>, ApiError> {
    client
        .get(&format!("/alimentos/search/{}", path_segment(term)))
        .await
}

/// Create a food. The backend returns the existing row when a food with the
/// same name (case-insensitive) already exists.
pub async fn create_food(client: &ApiClient, new: &NewFood) -> Result<Food, ApiError> {
    let created: Food = client.post("/alimentos", new).await?;
    info!(food_id = created.id, name = %created.name, "food cataloged");
    Ok(created)
}
