//! Dashboard REST API client
//!
//! Thin `reqwest` wrapper over the external dashboard backend. Single
//! attempt per call: no retries, no backoff, and no timeout unless one is
//! configured.
//!
//! # Endpoints
//!
//! - `auth`: login and the three password-reset calls
//! - `resources`: departments, consultants, projects, packages, invoices, licenses

pub mod auth;
pub mod resources;

use crate::forms::FormError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::{LoginRequest, LoginResponse};

/// API errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not authorized ({status}){}", fmt_message(.message))]
    Unauthorized {
        status: u16,
        message: Option<String>,
    },

    #[error("Request failed ({status}){}", fmt_message(.message))]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error(transparent)]
    Validation(#[from] FormError),
}

fn fmt_message(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl ApiError {
    /// Message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message, .. } | ApiError::Server { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// Session problem (missing/expired token) rather than a request problem
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Server message verbatim, or `fallback`
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Validation(e) => e.to_string(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized {
                status: status.as_u16(),
                message,
            },
            _ => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// `message` (or `error`) field of an error body
fn extract_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

/// Login endpoint
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
}

/// Password reset endpoints
#[async_trait]
pub trait ResetApi: Send + Sync {
    async fn request_reset(&self, email: &str) -> Result<(), ApiError>;
    async fn verify_reset_token(&self, email: &str, token: &str) -> Result<(), ApiError>;
    async fn confirm_reset(&self, email: &str, token: &str, new_password: &str) -> Result<(), ApiError>;
}

/// Dashboard API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Client with an explicit request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create from config
    pub fn from_config(config: &crate::config::Config) -> Result<Self, ApiError> {
        match config.request_timeout {
            Some(timeout) => Self::with_timeout(&config.api_url, timeout),
            None => Ok(Self::new(&config.api_url)),
        }
    }

    /// Attach a bearer token to every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(path)))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.url(path)))
    }

    pub(crate) fn put(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.put(self.url(path)))
    }

    pub(crate) fn delete(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.delete(self.url(path)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send and decode a JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let text = self.send_text(request).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send, ignoring any success body
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send_text(request).await.map(|_| ())
    }

    async fn send_text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let text = response.text().await?;

        debug!("API {} -> {}", url, status);

        if !status.is_success() {
            return Err(ApiError::from_status(status, &text));
        }

        Ok(text)
    }
}
