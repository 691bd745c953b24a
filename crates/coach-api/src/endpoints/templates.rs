//! Routine and diet templates ("plantillas").
//!
//! Templates are stored by the backend as separate resources; responses are
//! decoded into [`Routine`] / [`Diet`] with `is_template` set so callers can
//! treat them uniformly.

use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{Diet, Id, NewRoutine, Routine};

fn mark_routine(mut routine: Routine) -> Routine {
    routine.is_template = true;
    routine.client_id = None;
    routine
}

fn mark_diet(mut diet: Diet) -> Diet {
    diet.is_template = true;
    diet.client_id = None;
    diet
}

pub async fn list_routine_templates(client: &ApiClient) -> Result<Vec<Routine>, ApiError> {
    let templates: Vec<Routine> = client.get("/plantillas").await?;
    Ok(templates.into_iter().map(mark_routine).collect())
}

/// Find one routine template by id. The backend has no detail endpoint for
/// templates, so this filters the list.
pub async fn find_routine_template(client: &ApiClient, id: Id) -> Result<Routine, ApiError> {
    list_routine_templates(client)
        .await?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("routine template {id} not found")))
}

/// Create an empty routine template not bound to any client.
pub async fn create_routine_template(client: &ApiClient, new: &NewRoutine) -> Result<Routine, ApiError> {
    let template: Routine = client.post("/plantillas", new).await?;
    info!(template_id = template.id, "routine template created");
    Ok(mark_routine(template))
}

/// Duplicate a client routine into a new template. The routine itself is
/// left untouched and stays bound to its client.
pub async fn save_routine_as_template(client: &ApiClient, routine_id: Id) -> Result<Routine, ApiError> {
    let template: Routine = client
        .post_empty(&format!("/rutinas/{routine_id}/save-as-template"))
        .await?;
    info!(routine_id, template_id = template.id, "routine saved as template");
    Ok(mark_routine(template))
}

/// Deep-copy a routine template into a new routine for `client_id`.
pub async fn instantiate_routine_template(
    client: &ApiClient,
    template_id: Id,
    client_id: Id,
) -> Result<Routine, ApiError> {
    let routine: Routine = client
        .post_empty(&format!("/plantillas/{template_id}/create-rutina/{client_id}"))
        .await?;
    info!(template_id, client_id, routine_id = routine.id, "routine created from template");
    Ok(routine)
}

pub async fn list_diet_templates(client: &ApiClient) -> Result<Vec<Diet>, ApiError> {
    let templates: Vec<Diet> = client.get("/dietas-plantillas").await?;
    Ok(templates.into_iter().map(mark_diet).collect())
}

/// Find one diet template by id (filters the list, as for routines).
pub async fn find_diet_template(client: &ApiClient, id: Id) -> Result<Diet, ApiError> {
    list_diet_templates(client)
        .await?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| ApiError::NotFound(format!("diet template {id} not found")))
}

pub async fn save_diet_as_template(client: &ApiClient, diet_id: Id) -> Result<Diet, ApiError> {
    let template: Diet = client
        .post_empty(&format!("/dietas/{diet_id}/save-as-template"))
        .await?;
    info!(diet_id, template_id = template.id, "diet saved as template");
    Ok(mark_diet(template))
}

pub async fn instantiate_diet_template(
    client: &ApiClient,
    template_id: Id,
    client_id: Id,
) -> Result<Diet, ApiError> {
    let diet: Diet = client
        .post_empty(&format!("/dietas-plantillas/{template_id}/create-dieta/{client_id}"))
        .await?;
    info!(template_id, client_id, diet_id = diet.id, "diet created from template");
    Ok(diet)
}
