//! Shared test helpers: an in-process fake of the coaching backend.
//!
//! [`FakeBackend::spawn`] binds an ephemeral port and serves the same REST
//! surface the real backend exposes, backed by an in-memory [`FakeState`].
//! Tests seed data through the helpers below, drive the code under test with
//! [`FakeBackend::client`], then inspect state or the request log.

pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDateTime;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use coach_api::models::{
    Client, Diet, Exercise, Food, Id, NewClient, NewExercise, NewFood, Notification,
    NotificationKind, Routine,
};
use coach_api::{ApiClient, ApiConfig};

pub use state::{FailRule, FakeError, FakeState};

/// Handle to the shared in-memory state.
pub type Shared = Arc<Mutex<FakeState>>;

/// Token the fake backend accepts for every authenticated request.
pub const TEST_TOKEN: &str = "test-token";

pub(crate) fn lock(shared: &Shared) -> MutexGuard<'_, FakeState> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A running fake backend. The server task is aborted on drop.
pub struct FakeBackend {
    pub addr: SocketAddr,
    pub state: Shared,
    handle: JoinHandle<()>,
}

impl FakeBackend {
    /// Start a fake backend on `127.0.0.1:0`.
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState::new(TEST_TOKEN)));
        let app = routes::build_router(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind fake backend");
        let addr = listener.local_addr().expect("fake backend has no address");
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "fake backend stopped");
            }
        });
        tracing::debug!(%addr, "fake backend listening");
        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client authenticated with [`TEST_TOKEN`].
    pub fn client(&self) -> ApiClient {
        self.anonymous_client().with_token(TEST_TOKEN)
    }

    /// Client without a token; only `/auth/*` accepts it.
    pub fn anonymous_client(&self) -> ApiClient {
        ApiClient::new(ApiConfig::new(self.base_url())).expect("failed to build API client")
    }

    pub fn lock(&self) -> MutexGuard<'_, FakeState> {
        lock(&self.state)
    }

    // -------------------------------------------------------------------
    // Seeding
    // -------------------------------------------------------------------

    pub fn seed_client(&self, name: &str, email: &str) -> Client {
        let birth = NaiveDateTime::parse_from_str("1995-06-15T00:00:00", "%Y-%m-%dT%H:%M:%S")
            .expect("valid fixture date");
        self.lock().create_client(NewClient {
            name: name.to_owned(),
            email: email.to_owned(),
            birth_date: birth,
            height: 1.70,
            goal: "Mantenimiento".to_owned(),
            billing_date: None,
        })
    }

    pub fn seed_exercise(&self, name: &str, category: &str) -> Exercise {
        self.lock()
            .create_exercise(NewExercise {
                name: name.to_owned(),
                category: Some(category.to_owned()),
            })
            .expect("exercise names must be unique in fixtures")
    }

    /// Seed a food with the given per-100 g nutrients `(kcal, protein, carbs, fat)`.
    pub fn seed_food(&self, name: &str, per_100g: (f64, f64, f64, f64)) -> Food {
        let (calories, protein, carbs, fat) = per_100g;
        self.lock().create_food(NewFood {
            name: name.to_owned(),
            calories_per_100g: calories,
            protein_per_100g: protein,
            carbs_per_100g: carbs,
            fat_per_100g: fat,
        })
    }

    pub fn push_notification(&self, kind: NotificationKind, title: &str) -> Notification {
        self.lock().push_notification(kind, title, title, None)
    }

    // -------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------

    pub fn routine(&self, id: Id) -> Option<Routine> {
        self.lock().routine(id).ok()
    }

    pub fn diet(&self, id: Id) -> Option<Diet> {
        self.lock().diet(id).ok()
    }

    /// `METHOD path` of every request received so far.
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// Answer 500 to every `method` request whose path contains
    /// `path_contains`, starting with the `nth` match (1-based).
    pub fn fail_from(&self, method: &str, path_contains: &str, nth: usize) {
        self.lock().fail_rules.push(FailRule {
            method: method.to_owned(),
            path_contains: path_contains.to_owned(),
            fail_from: nth,
            seen: 0,
        });
    }

    /// Answer copy and template mutations with bare rows from now on.
    pub fn return_bare_copy_rows(&self) {
        self.lock().bare_copy_rows = true;
    }

    /// Swap the accepted token, invalidating sessions issued before.
    pub fn rotate_token(&self, token: &str) {
        self.lock().token = token.to_owned();
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_rule_triggers_from_nth_match() {
        let mut state = FakeState::new("t");
        state.fail_rules.push(FailRule {
            method: "POST".into(),
            path_contains: "/ejercicios".into(),
            fail_from: 2,
            seen: 0,
        });
        assert!(!state.record_request("POST", "/rutinas/1/ejercicios"));
        assert!(!state.record_request("GET", "/rutinas/1/ejercicios"));
        assert!(state.record_request("POST", "/rutinas/1/ejercicios"));
        assert_eq!(state.requests.len(), 3);
    }

    #[test]
    fn food_create_returns_existing_case_insensitively() {
        let mut state = FakeState::new("t");
        let first = state.create_food(NewFood {
            name: "Avena".into(),
            calories_per_100g: 389.0,
            ..Default::default()
        });
        let again = state.create_food(NewFood {
            name: "avena".into(),
            ..Default::default()
        });
        assert_eq!(first.id, again.id);
        assert_eq!(state.foods.len(), 1);
    }
}
