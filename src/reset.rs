//! Password Reset Wizard
//!
//! Explicit state machine over the three reset calls:
//! - **AwaitingEmail**: request a reset code for an email
//! - **AwaitingToken**: verify the code the user received
//! - **AwaitingNewPassword**: set the new password
//! - **Done**: password changed
//!
//! A step only advances when its call succeeds. `back()` is client-side only.
//! The wizard lives in memory; nothing survives a restart.

use crate::api::{ApiError, ResetApi};
use crate::forms::is_valid_email;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Reset errors
#[derive(Error, Debug)]
pub enum ResetError {
    #[error("Cannot {action} while {step}")]
    InvalidTransition {
        step: &'static str,
        action: &'static str,
    },
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Api(#[from] ApiError),
}

/// Wizard states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetStep {
    AwaitingEmail,
    AwaitingToken { email: String },
    AwaitingNewPassword { email: String, token: String },
    Done,
}

impl ResetStep {
    /// 1-based step number as shown in the wizard header
    pub fn number(&self) -> u8 {
        match self {
            ResetStep::AwaitingEmail => 1,
            ResetStep::AwaitingToken { .. } => 2,
            ResetStep::AwaitingNewPassword { .. } => 3,
            ResetStep::Done => 4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResetStep::AwaitingEmail => "awaiting email",
            ResetStep::AwaitingToken { .. } => "awaiting token",
            ResetStep::AwaitingNewPassword { .. } => "awaiting new password",
            ResetStep::Done => "done",
        }
    }
}

/// Password reset wizard
pub struct PasswordReset<A: ResetApi> {
    api: A,
    step: ResetStep,
    error: Option<String>,
    notice: Option<String>,
    is_loading: bool,
}

impl<A: ResetApi> PasswordReset<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            step: ResetStep::AwaitingEmail,
            error: None,
            notice: None,
            is_loading: false,
        }
    }

    pub fn step(&self) -> &ResetStep {
        &self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_done(&self) -> bool {
        self.step == ResetStep::Done
    }

    /// Step 1: ask the server to send a reset code
    pub async fn submit_email(&mut self, email: &str) -> Result<(), ResetError> {
        if self.step != ResetStep::AwaitingEmail {
            return Err(self.invalid("submit an email"));
        }

        let email = email.trim().to_string();
        if email.is_empty() || !is_valid_email(&email) {
            return self.fail(ResetError::Validation(
                "Please enter a valid email address.".to_string(),
            ));
        }

        self.is_loading = true;
        let result = self.api.request_reset(&email).await;
        self.is_loading = false;

        match result {
            Ok(()) => {
                info!("Reset code requested for {}", email);
                self.notice = Some(format!("A reset code has been sent to {}.", email));
                self.advance(ResetStep::AwaitingToken { email });
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Step 2: verify the received code
    pub async fn submit_token(&mut self, token: &str) -> Result<(), ResetError> {
        let email = match &self.step {
            ResetStep::AwaitingToken { email } => email.clone(),
            _ => return Err(self.invalid("verify a token")),
        };

        let token = token.trim().to_string();
        if token.is_empty() {
            return self.fail(ResetError::Validation(
                "Please enter the code you received.".to_string(),
            ));
        }

        self.is_loading = true;
        let result = self.api.verify_reset_token(&email, &token).await;
        self.is_loading = false;

        match result {
            Ok(()) => {
                self.notice = Some("Code verified. Choose a new password.".to_string());
                self.advance(ResetStep::AwaitingNewPassword { email, token });
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Step 3: set the new password
    pub async fn submit_new_password(&mut self, password: &str, confirmation: &str) -> Result<(), ResetError> {
        let (email, token) = match &self.step {
            ResetStep::AwaitingNewPassword { email, token } => (email.clone(), token.clone()),
            _ => return Err(self.invalid("set a new password")),
        };

        if password.chars().count() < MIN_PASSWORD_LEN {
            return self.fail(ResetError::Validation(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LEN
            )));
        }
        if password != confirmation {
            return self.fail(ResetError::Validation(
                "Passwords do not match.".to_string(),
            ));
        }

        self.is_loading = true;
        let result = self.api.confirm_reset(&email, &token, password).await;
        self.is_loading = false;

        match result {
            Ok(()) => {
                info!("Password reset completed for {}", email);
                self.notice = Some("Your password has been reset. You can now log in.".to_string());
                self.advance(ResetStep::Done);
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Previous step without re-sending anything
    pub fn back(&mut self) -> bool {
        let previous = match &self.step {
            ResetStep::AwaitingToken { .. } => ResetStep::AwaitingEmail,
            ResetStep::AwaitingNewPassword { email, .. } => ResetStep::AwaitingToken {
                email: email.clone(),
            },
            ResetStep::AwaitingEmail | ResetStep::Done => return false,
        };
        self.advance(previous);
        self.notice = None;
        true
    }

    fn advance(&mut self, next: ResetStep) {
        debug!("Reset wizard: {} -> {}", self.step.name(), next.name());
        self.step = next;
        self.error = None;
    }

    fn fail(&mut self, err: ResetError) -> Result<(), ResetError> {
        let message = match &err {
            ResetError::Api(e) => e.display_message("Something went wrong. Please try again."),
            other => other.to_string(),
        };
        warn!("Reset step {} failed: {}", self.step.number(), message);
        self.error = Some(message);
        Err(err)
    }

    fn invalid(&self, action: &'static str) -> ResetError {
        ResetError::InvalidTransition {
            step: self.step.name(),
            action,
        }
    }
}
