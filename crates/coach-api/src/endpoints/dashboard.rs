//! Coach-wide dashboard.

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::CoachDashboard;

pub async fn get_coach_dashboard(client: &ApiClient) -> Result<CoachDashboard, ApiError> {
    client.get("/dashboard/").await
}
