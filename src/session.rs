//! Session Validator
//!
//! Decides whether the stored session is usable. The client holds no signing
//! key, so the JWT payload is decoded without signature verification and only
//! the `exp` claim is read.

use crate::credentials::CredentialStore;
use crate::models::Session;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[serde(default)]
    exp: Option<f64>,
}

/// Read the `exp` claim without verifying the signature
pub fn token_expiry(token: &str) -> Result<Option<DateTime<Utc>>, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;

    Ok(data
        .claims
        .exp
        .and_then(|exp| DateTime::<Utc>::from_timestamp(exp.floor() as i64, 0)))
}

/// Undecodable tokens count as expired; tokens without `exp` never expire
pub fn is_token_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match token_expiry(token) {
        Ok(Some(expires_at)) => expires_at <= now,
        Ok(None) => false,
        Err(e) => {
            debug!("Treating undecodable token as expired: {}", e);
            true
        }
    }
}

pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now())
}

/// Authentication state
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(Session),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

/// Validates the session held by a `CredentialStore`
#[derive(Clone)]
pub struct SessionValidator {
    credentials: CredentialStore,
}

impl SessionValidator {
    pub fn new(credentials: CredentialStore) -> Self {
        Self { credentials }
    }

    /// True iff a token is present
    pub fn is_authenticated(&self) -> bool {
        self.credentials.get_token().is_some()
    }

    /// Expiry of the stored token; a missing token counts as expired
    pub fn is_token_expired(&self) -> bool {
        self.is_token_expired_at(Utc::now())
    }

    pub fn is_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.credentials.get_token() {
            Some(token) => is_token_expired_at(&token, now),
            None => true,
        }
    }

    /// Collapse partial or expired sessions to `Unauthenticated`
    pub fn state(&self) -> SessionState {
        self.state_at(Utc::now())
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        match self.credentials.get_auth_data() {
            Some(session) if !is_token_expired_at(&session.token, now) => {
                SessionState::Authenticated(session)
            }
            _ => SessionState::Unauthenticated,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    /// Token expiring `secs` from now (negative for the past)
    pub fn token_expiring_in(secs: i64) -> String {
        let exp = (Utc::now() + Duration::seconds(secs)).timestamp();
        encode(
            &Header::default(),
            &json!({"sub": "42", "exp": exp}),
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }

    pub fn token_without_expiry() -> String {
        encode(
            &Header::default(),
            &json!({"sub": "42"}),
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_tokens::*;
    use super::*;
    use crate::models::UserProfile;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn validator() -> (CredentialStore, SessionValidator) {
        let creds = CredentialStore::new(Arc::new(MemoryStore::new()));
        (creds.clone(), SessionValidator::new(creds))
    }

    fn user() -> UserProfile {
        serde_json::from_value(json!({
            "id": 42,
            "fullName": "Test User",
            "email": "user@example.com",
            "role": {"name": "Employee"}
        }))
        .unwrap()
    }

    #[test]
    fn test_not_authenticated_without_token() {
        let (_, validator) = validator();
        assert!(!validator.is_authenticated());
        assert!(validator.is_token_expired());
        assert_eq!(validator.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_past_expiry_is_expired() {
        assert!(is_token_expired(&token_expiring_in(-60)));
    }

    #[test]
    fn test_future_expiry_is_valid() {
        assert!(!is_token_expired(&token_expiring_in(3600)));
    }

    #[test]
    fn test_undecodable_token_is_expired() {
        assert!(is_token_expired("not-a-jwt"));
        assert!(is_token_expired("aaa.bbb.ccc"));
        assert!(is_token_expired(""));
    }

    #[test]
    fn test_token_without_exp_is_not_expired() {
        assert!(!is_token_expired(&token_without_expiry()));
    }

    #[test]
    fn test_expiry_boundary() {
        let token = token_expiring_in(120);
        let expires_at = token_expiry(&token).unwrap().unwrap();

        assert!(!is_token_expired_at(&token, expires_at - chrono::Duration::seconds(1)));
        assert!(is_token_expired_at(&token, expires_at));
    }

    #[test]
    fn test_state_authenticated_with_valid_session() {
        let (creds, validator) = validator();
        let token = token_expiring_in(3600);
        creds.store_auth_data(&token, &user()).unwrap();

        assert!(validator.is_authenticated());
        match validator.state() {
            SessionState::Authenticated(session) => {
                assert_eq!(session.token, token);
                assert_eq!(session.user.email, "user@example.com");
            }
            other => panic!("expected authenticated, got {:?}", other),
        }
    }

    #[test]
    fn test_state_unauthenticated_with_expired_session() {
        let (creds, validator) = validator();
        creds.store_auth_data(&token_expiring_in(-5), &user()).unwrap();

        // Token is present, but the session is not usable
        assert!(validator.is_authenticated());
        assert!(!validator.state().is_authenticated());
    }
}
