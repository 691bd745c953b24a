//! Append-only progress history: weight entries and personal records.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    Id, NewPersonalRecord, NewWeightEntry, PersonalRecord, WeightEntry,
};

pub async fn list_weights(client: &ApiClient, client_id: Id) -> Result<Vec<WeightEntry>, ApiError> {
    client.get(&format!("/alumnos/{client_id}/pesos")).await
}

pub async fn add_weight(
    client: &ApiClient,
    client_id: Id,
    entry: &NewWeightEntry,
) -> Result<WeightEntry, ApiError> {
    client.post(&format!("/alumnos/{client_id}/pesos"), entry).await
}

/// Correct a recorded weight (value and/or date).
pub async fn update_weight(
    client: &ApiClient,
    weight_id: Id,
    entry: &NewWeightEntry,
) -> Result<WeightEntry, ApiError> {
    client.patch(&format!("/pesos/{weight_id}"), entry).await
}

pub async fn delete_weight(client: &ApiClient, weight_id: Id) -> Result<(), ApiError> {
    client.delete(&format!("/pesos/{weight_id}")).await
}

pub async fn list_personal_records(
    client: &ApiClient,
    client_id: Id,
) -> Result<Vec<PersonalRecord>, ApiError> {
    client
        .get(&format!("/alumnos/{client_id}/personal-records"))
        .await
}

pub async fn add_personal_record(
    client: &ApiClient,
    client_id: Id,
    record: &NewPersonalRecord,
) -> Result<PersonalRecord, ApiError> {
    client
        .post(&format!("/alumnos/{client_id}/personal-records"), record)
        .await
}

/// Personal records are never edited; a wrong record is deleted and re-added.
pub async fn delete_personal_record(client: &ApiClient, record_id: Id) -> Result<(), ApiError> {
    client
        .delete(&format!("/alumnos/personal-records/{record_id}"))
        .await
}
