//! Client ("alumno") resources.

use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{Client, ClientDashboard, ClientUpdate, Id, NewClient};

pub async fn list_clients(client: &ApiClient) -> Result<Vec<Client>, ApiError> {
    client.get("/alumnos").await
}

pub async fn get_client(client: &ApiClient, id: Id) -> Result<Client, ApiError> {
    client.get(&format!("/alumnos/{id}")).await
}

pub async fn create_client(client: &ApiClient, new: &NewClient) -> Result<Client, ApiError> {
    let created: Client = client.post("/alumnos", new).await?;
    info!(client_id = created.id, name = %created.name, "client created");
    Ok(created)
}

/// Partially update a client. Only the fields set in `update` are sent.
pub async fn update_client(
    client: &ApiClient,
    id: Id,
    update: &ClientUpdate,
) -> Result<Client, ApiError> {
    if update.is_empty() {
        return Err(ApiError::InvalidArgument(
            "client update has no fields set".to_owned(),
        ));
    }
    client.patch(&format!("/alumnos/{id}"), update).await
}

/// Delete a client. The backend cascades to the client's plans.
pub async fn delete_client(client: &ApiClient, id: Id) -> Result<(), ApiError> {
    client.delete(&format!("/alumnos/{id}")).await?;
    info!(client_id = id, "client deleted");
    Ok(())
}

pub async fn get_dashboard(client: &ApiClient, id: Id) -> Result<ClientDashboard, ApiError> {
    client.get(&format!("/alumnos/{id}/dashboard")).await
}
