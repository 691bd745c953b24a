//! `coach login`, `coach register` and `coach logout`.

use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};

use coach_api::ApiClient;
use coach_api::endpoints::auth;
use coach_core::CoreError;
use coach_core::validation::{validate_email, validate_name, validate_password};

use crate::config::{self, ConfigFile};

fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// Write the session into the config file at `path`, keeping the URL the
/// session was issued by so later commands talk to the same backend.
pub fn store_session(path: &Path, base_url: &str, email: &str, token: &str) -> Result<()> {
    let mut file = config::load_config_from(path).unwrap_or_default();
    file.api.url = base_url.to_owned();
    file.auth.token = Some(token.to_owned());
    file.auth.email = Some(email.to_owned());
    config::save_config_to(path, &file)
}

pub fn clear_session(path: &Path) -> Result<bool> {
    let Ok(mut file) = config::load_config_from(path) else {
        return Ok(false);
    };
    let had_token = file.auth.token.take().is_some();
    file.auth.email = None;
    config::save_config_to(path, &file)?;
    Ok(had_token)
}

// -----------------------------------------------------------------------
// coach login --email <email>
// -----------------------------------------------------------------------

pub async fn cmd_login(client: &ApiClient, email: &str, password: Option<String>) -> Result<()> {
    let email = email.trim();
    validate_email("email", email).map_err(CoreError::from)?;
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };

    let session = auth::login(client, email, &password).await?;
    let path = config::config_path();
    store_session(&path, client.base_url(), email, &session.access_token)?;

    match session.coach {
        Some(coach) => println!("Logged in as {} <{}>.", coach.name, coach.email),
        None => println!("Logged in as {email}."),
    }
    println!("  Session saved to {}", path.display());
    Ok(())
}

// -----------------------------------------------------------------------
// coach register --name <name> --email <email>
// -----------------------------------------------------------------------

pub async fn cmd_register(
    client: &ApiClient,
    name: &str,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let name = coach_core::validation::sanitize(name);
    let email = email.trim();
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };

    let errors: Vec<_> = [
        validate_name("nombre", &name),
        validate_email("email", email),
        validate_password(&password),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();
    if !errors.is_empty() {
        return Err(CoreError::Validation(errors).into());
    }

    let response = auth::register(client, &name, email, &password).await?;
    println!("{}", response.message);
    println!("Run `coach login --email {email}` to start a session.");
    Ok(())
}

// -----------------------------------------------------------------------
// coach logout
// -----------------------------------------------------------------------

pub fn cmd_logout() -> Result<()> {
    if clear_session(&config::config_path())? {
        println!("Logged out.");
    } else {
        println!("No session stored.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach_test_utils::{FakeBackend, TEST_TOKEN};

    #[tokio::test]
    async fn login_session_is_stored_and_cleared() {
        let backend = FakeBackend::spawn().await;
        let anon = backend.anonymous_client();
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let session = auth::login(&anon, "coach@example.com", "Secret123").await.unwrap();
        store_session(&path, anon.base_url(), "coach@example.com", &session.access_token).unwrap();

        let saved: ConfigFile = config::load_config_from(&path).unwrap();
        assert_eq!(saved.auth.token.as_deref(), Some(TEST_TOKEN));
        assert_eq!(saved.api.url, backend.base_url());

        assert!(clear_session(&path).unwrap());
        let saved = config::load_config_from(&path).unwrap();
        assert_eq!(saved.auth.token, None);
        assert_eq!(saved.api.url, backend.base_url(), "url survives logout");
        assert!(!clear_session(&path).unwrap());
    }

    #[test]
    fn clear_session_without_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(!clear_session(&tmp.path().join("missing.toml")).unwrap());
    }

    #[tokio::test]
    async fn register_rejects_weak_password_without_request() {
        let backend = FakeBackend::spawn().await;
        backend.clear_requests();
        let err = cmd_register(
            &backend.anonymous_client(),
            "Marta",
            "marta@example.com",
            Some("short".into()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Validation(_))));
        assert_eq!(backend.request_count(), 0);
    }
}
