//! Configuration file management for coach.
//!
//! Provides a TOML-based config file at `~/.config/coachdesk/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use coach_api::{ApiClient, ApiConfig};

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
    pub api: ApiSection,
    #[serde(default)]
    pub auth: AuthSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSection {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthSection {
    /// Bearer token from the last `coach login`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Coach account the token belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            api: ApiSection {
                url: ApiConfig::DEFAULT_URL.to_owned(),
            },
            auth: AuthSection::default(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the coach config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/coachdesk` or
/// `~/.config/coachdesk`, on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("coachdesk");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("coachdesk")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    toml::from_str(&contents).context("failed to parse config file")
}

pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(&config_path(), config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// The file holds a session token, so it is made owner-only (0600) on Unix.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone)]
pub struct CoachConfig {
    pub api: ApiConfig,
}

impl CoachConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API URL: `cli_api_url` > `COACH_API_URL` env > `config_file.api.url` > `ApiConfig::DEFAULT_URL`
    /// - Token: `COACH_TOKEN` env > `config_file.auth.token` > none
    pub fn resolve(cli_api_url: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();

        let url = if let Some(url) = cli_api_url {
            url.to_owned()
        } else if let Ok(url) = std::env::var("COACH_API_URL") {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.api.url.clone()
        } else {
            ApiConfig::DEFAULT_URL.to_owned()
        };

        let token = std::env::var("COACH_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| file_config.and_then(|cfg| cfg.auth.token));

        let mut api = ApiConfig::new(url);
        api.token = token;
        Ok(Self { api })
    }

    /// Client without a session, for `login` and `register`.
    pub fn anonymous_client(&self) -> Result<ApiClient> {
        let mut api = self.api.clone();
        api.token = None;
        ApiClient::new(api).context("failed to build HTTP client")
    }

    /// Client carrying the stored session token.
    pub fn client(&self) -> Result<ApiClient> {
        if self.api.token.is_none() {
            bail!("not logged in; run `coach login --email <email>` first");
        }
        ApiClient::new(self.api.clone()).context("failed to build HTTP client")
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
