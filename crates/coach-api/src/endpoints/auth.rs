//! Login and registration. Token issuance itself happens in the backend.

use tracing::info;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};

/// Exchange credentials for a bearer token.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
    let body = LoginRequest {
        email: email.to_owned(),
        password: password.to_owned(),
    };
    let token: TokenResponse = client.post("/auth/login", &body).await?;
    info!(email, "logged in");
    Ok(token)
}

/// Register a new coach account.
pub async fn register(
    client: &ApiClient,
    name: &str,
    email: &str,
    password: &str,
) -> Result<MessageResponse, ApiError> {
    let body = RegisterRequest {
        name: name.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
    };
    client.post("/auth/register", &body).await
}
