//! Configuration module
//!
//! Client configuration is read from the environment (after loading a `.env`
//! file if present). Every value has a default so a bare environment still
//! produces a usable development configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";
const DEFAULT_TOKEN_KEY: &str = "parkora_auth_token";
const DEFAULT_USER_KEY: &str = "parkora_auth_user";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const SESSION_DIR: &str = ".parkora";
const SESSION_FILE: &str = "session.json";

/// Names of the two persisted storage entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageKeys {
    /// Raw token string.
    pub token_key: String,
    /// Convenience cache of the decoded user. Never read back as a source of truth.
    pub user_key: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
        }
    }
}

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub storage_keys: StorageKeys,
    pub request_timeout: Duration,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_keys: StorageKeys::default(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            session_file: default_session_file(None),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_source<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("PARKORA_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let storage_keys = StorageKeys {
            token_key: lookup("PARKORA_TOKEN_KEY").unwrap_or_else(|| DEFAULT_TOKEN_KEY.to_string()),
            user_key: lookup("PARKORA_USER_KEY").unwrap_or_else(|| DEFAULT_USER_KEY.to_string()),
        };

        let request_timeout_secs = match lookup("PARKORA_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                anyhow::anyhow!("PARKORA_REQUEST_TIMEOUT_SECS must be a valid number")
            })?,
            None => REQUEST_TIMEOUT_SECS,
        };

        let session_file = lookup("PARKORA_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_session_file(lookup("HOME")));

        let config = Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            storage_keys,
            request_timeout: Duration::from_secs(request_timeout_secs),
            session_file,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.api_url.is_empty() {
            return Err(anyhow::anyhow!("PARKORA_API_URL cannot be empty"));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "PARKORA_API_URL must start with http:// or https://, got {}",
                self.api_url
            ));
        }
        if self.storage_keys.token_key.is_empty() || self.storage_keys.user_key.is_empty() {
            return Err(anyhow::anyhow!("Storage keys cannot be empty"));
        }
        if self.storage_keys.token_key == self.storage_keys.user_key {
            return Err(anyhow::anyhow!(
                "PARKORA_TOKEN_KEY and PARKORA_USER_KEY must differ"
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(anyhow::anyhow!(
                "PARKORA_REQUEST_TIMEOUT_SECS must be greater than zero"
            ));
        }
        Ok(())
    }
}

fn default_session_file(home: Option<String>) -> PathBuf {
    let base = home.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    base.join(SESSION_DIR).join(SESSION_FILE)
}
