//! Configuration management

use crate::roles::RoleOverrides;
use crate::storage::FileStore;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Dashboard REST API base URL
    pub api_url: String,

    /// Client-side storage file (token, user, flags)
    pub storage_path: PathBuf,

    /// TOML file with per-user role overrides (optional)
    pub role_overrides_path: Option<PathBuf>,

    /// Request timeout; none means the HTTP stack default
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_url = std::env::var("TASKDESK_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let storage_path = std::env::var("TASKDESK_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| FileStore::default_path());

        let role_overrides_path = std::env::var("TASKDESK_ROLE_OVERRIDES")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let request_timeout = match std::env::var("TASKDESK_REQUEST_TIMEOUT_SECS") {
            Ok(v) => {
                let secs: u64 = v
                    .trim()
                    .parse()
                    .with_context(|| format!("TASKDESK_REQUEST_TIMEOUT_SECS is not a number: {}", v))?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(Self {
            api_url,
            storage_path,
            role_overrides_path,
            request_timeout,
        })
    }

    /// Override table from `role_overrides_path`, empty when unset
    pub fn role_overrides(&self) -> Result<RoleOverrides> {
        match &self.role_overrides_path {
            Some(path) => RoleOverrides::load(path)
                .with_context(|| format!("Failed to load role overrides from {}", path.display())),
            None => Ok(RoleOverrides::empty()),
        }
    }
}
