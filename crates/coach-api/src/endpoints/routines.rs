//! Routine ("rutina") resources and their exercise entries.

use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    CopyDayRequest, CopyDayResponse, Id, NewRoutine, NewRoutineEntry, Routine, RoutineEntry,
    RoutineEntryUpdate, RoutineUpdate,
};

/// List a client's routines, entries inlined.
pub async fn list_routines(client: &ApiClient, client_id: Id) -> Result<Vec<Routine>, ApiError> {
    client.get(&format!("/alumnos/{client_id}/rutinas")).await
}

pub async fn create_routine(
    client: &ApiClient,
    client_id: Id,
    new: &NewRoutine,
) -> Result<Routine, ApiError> {
    let routine: Routine = client
        .post(&format!("/alumnos/{client_id}/rutinas"), new)
        .await?;
    info!(routine_id = routine.id, client_id, "routine created");
    Ok(routine)
}

/// Fetch a routine with its entries inlined.
pub async fn get_routine(client: &ApiClient, id: Id) -> Result<Routine, ApiError> {
    client.get(&format!("/rutinas/{id}")).await
}

pub async fn update_routine(
    client: &ApiClient,
    id: Id,
    update: &RoutineUpdate,
) -> Result<Routine, ApiError> {
    client.patch(&format!("/rutinas/{id}"), update).await
}

pub async fn delete_routine(client: &ApiClient, id: Id) -> Result<(), ApiError> {
    client.delete(&format!("/rutinas/{id}")).await?;
    info!(routine_id = id, "routine deleted");
    Ok(())
}

pub async fn add_entry(
    client: &ApiClient,
    routine_id: Id,
    entry: &NewRoutineEntry,
) -> Result<RoutineEntry, ApiError> {
    client
        .post(&format!("/rutinas/{routine_id}/ejercicios"), entry)
        .await
}

pub async fn update_entry(
    client: &ApiClient,
    entry_id: Id,
    update: &RoutineEntryUpdate,
) -> Result<RoutineEntry, ApiError> {
    client.patch(&format!("/ejercicios/{entry_id}"), update).await
}

pub async fn delete_entry(client: &ApiClient, entry_id: Id) -> Result<(), ApiError> {
    client.delete(&format!("/ejercicios/{entry_id}")).await
}

/// Replace the target day's entries with copies of the source day's.
/// Runs as one backend transaction.
pub async fn copy_day(
    client: &ApiClient,
    routine_id: Id,
    request: CopyDayRequest,
) -> Result<CopyDayResponse, ApiError> {
    client
        .post(&format!("/rutinas/{routine_id}/copy-day"), &request)
        .await
}

/// Deep-copy a routine to another client. The target client's previously
/// active routine is retired by the backend.
pub async fn copy_to_client(
    client: &ApiClient,
    routine_id: Id,
    target_client_id: Id,
) -> Result<Routine, ApiError> {
    client
        .post_empty(&format!("/rutinas/{routine_id}/copy/{target_client_id}"))
        .await
}
