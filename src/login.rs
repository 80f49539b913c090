//! Login Flow
//!
//! Validate → submit → apply role overrides → persist → route. One attempt
//! per submit; the caller re-submits on failure.

use crate::api::{ApiError, AuthApi};
use crate::credentials::CredentialStore;
use crate::forms::is_valid_email;
use crate::models::{LoginRequest, Session};
use crate::roles::{self, RoleOverrides, LOGIN_PATH};
use crate::storage::StorageError;
use thiserror::Error;
use tracing::{info, warn};

/// Shown when the server gives no usable message
pub const LOGIN_FALLBACK_MESSAGE: &str = "Login failed. Please check your credentials and try again.";

/// Login errors
#[derive(Error, Debug)]
pub enum LoginError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("Could not save session: {0}")]
    Storage(#[from] StorageError),
}

impl LoginError {
    /// Message for the inline alert
    pub fn display_message(&self) -> String {
        match self {
            LoginError::Validation(msg) => msg.clone(),
            LoginError::Api(e) => e.display_message(LOGIN_FALLBACK_MESSAGE),
            LoginError::Storage(_) => LOGIN_FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Login form input
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), LoginError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(LoginError::Validation(
                "Please enter your email and password.".to_string(),
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(LoginError::Validation(
                "Please enter a valid email address.".to_string(),
            ));
        }
        Ok(())
    }
}

/// What the login page shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginState {
    pub is_loading: bool,
    pub error: Option<String>,
    pub redirect: Option<&'static str>,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: Session,
    pub redirect: &'static str,
}

/// Login flow bound to an API and the credential store
pub struct LoginFlow<A: AuthApi> {
    api: A,
    credentials: CredentialStore,
    overrides: RoleOverrides,
    state: LoginState,
}

impl<A: AuthApi> LoginFlow<A> {
    pub fn new(api: A, credentials: CredentialStore, overrides: RoleOverrides) -> Self {
        Self {
            api,
            credentials,
            overrides,
            state: LoginState::default(),
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    /// Submit credentials
    pub async fn submit(&mut self, form: &LoginForm) -> Result<LoginOutcome, LoginError> {
        self.state = LoginState {
            is_loading: true,
            error: None,
            redirect: None,
        };

        let result = self.attempt(form).await;

        self.state.is_loading = false;
        match &result {
            Ok(outcome) => self.state.redirect = Some(outcome.redirect),
            Err(e) => {
                warn!("Login failed for {}: {}", form.email.trim(), e);
                self.state.error = Some(e.display_message());
            }
        }

        result
    }

    async fn attempt(&self, form: &LoginForm) -> Result<LoginOutcome, LoginError> {
        form.validate()?;

        let request = LoginRequest {
            email: form.email.trim().to_string(),
            password: form.password.clone(),
        };

        let response = self.api.login(&request).await?;
        let mut user = response.user;

        roles::apply_login_overrides(&mut user, &self.overrides);

        self.credentials.store_auth_data(&response.token, &user)?;
        // A previous user's plan must not outlive their session
        match user.company_plan_name() {
            Some(plan) => self.credentials.set_company_plan_name(plan)?,
            None => self.credentials.clear_company_plan_name()?,
        }

        let redirect = roles::dashboard_path(&user);
        info!("Logged in {} as {} -> {}", user.email, user.role.name, redirect);

        Ok(LoginOutcome {
            session: Session {
                token: response.token,
                user,
            },
            redirect,
        })
    }
}

/// Clear the session and return the login path
pub fn logout(credentials: &CredentialStore) -> Result<&'static str, StorageError> {
    credentials.clear_auth()?;
    info!("Logged out");
    Ok(LOGIN_PATH)
}
