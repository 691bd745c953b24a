//! Injury ("lesión") records attached to a client.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{Id, Injury, InjuryUpdate, NewInjury};

pub async fn list_injuries(client: &ApiClient, client_id: Id) -> Result<Vec<Injury>, ApiError> {
    client.get(&format!("/lesiones/alumno/{client_id}")).await
}

pub async fn create_injury(
    client: &ApiClient,
    client_id: Id,
    injury: &NewInjury,
) -> Result<Injury, ApiError> {
    client
        .post(&format!("/lesiones/alumno/{client_id}"), injury)
        .await
}

pub async fn update_injury(
    client: &ApiClient,
    injury_id: Id,
    update: &InjuryUpdate,
) -> Result<Injury, ApiError> {
    client.patch(&format!("/lesiones/{injury_id}"), update).await
}

pub async fn delete_injury(client: &ApiClient, injury_id: Id) -> Result<(), ApiError> {
    client.delete(&format!("/lesiones/{injury_id}")).await
}
