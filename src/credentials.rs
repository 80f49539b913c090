//! Credential Store
//!
//! Single read/write boundary for client-held auth state. Flows and the
//! dashboard shell receive a `CredentialStore` handle instead of touching
//! storage keys directly.
//!
//! Keys:
//! - `token`: raw JWT
//! - `user`: cached profile as JSON
//! - `companyPlanName`: plan of the user's company
//! - `birthday_celebration_<userId>_<YYYY-MM-DD>`: once-per-day flag

use crate::models::{Session, UserProfile};
use crate::storage::{KeyValueStore, StorageError};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, warn};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const COMPANY_PLAN_KEY: &str = "companyPlanName";

/// Storage key for the birthday celebration flag
pub fn birthday_key(user_id: &str, date: NaiveDate) -> String {
    format!("birthday_celebration_{}_{}", user_id, date.format("%Y-%m-%d"))
}

/// Shared handle over the client-side auth state
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist token and profile (two writes, no rollback)
    pub fn store_auth_data(&self, token: &str, user: &UserProfile) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &user_json)?;
        debug!("Stored session for {}", user.email);
        Ok(())
    }

    /// Full session, or `None` when either half is missing or unreadable
    pub fn get_auth_data(&self) -> Option<Session> {
        let token = self.get_token()?;
        let user = self.get_auth_user()?;
        Some(Session { token, user })
    }

    /// Cached profile; corrupt JSON reads as absent
    pub fn get_auth_user(&self) -> Option<UserProfile> {
        let raw = self.read(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding unreadable cached user: {}", e);
                None
            }
        }
    }

    pub fn get_token(&self) -> Option<String> {
        self.read(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Remove all session keys
    pub fn clear_auth(&self) -> Result<(), StorageError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        self.store.remove(COMPANY_PLAN_KEY)?;
        debug!("Cleared session");
        Ok(())
    }

    pub fn company_plan_name(&self) -> Option<String> {
        self.read(COMPANY_PLAN_KEY)
    }

    pub fn set_company_plan_name(&self, plan: &str) -> Result<(), StorageError> {
        self.store.set(COMPANY_PLAN_KEY, plan)
    }

    pub fn clear_company_plan_name(&self) -> Result<(), StorageError> {
        self.store.remove(COMPANY_PLAN_KEY)
    }

    pub fn birthday_celebrated(&self, user_id: &str, date: NaiveDate) -> bool {
        self.read(&birthday_key(user_id, date)).is_some()
    }

    pub fn mark_birthday_celebrated(&self, user_id: &str, date: NaiveDate) -> Result<(), StorageError> {
        self.store.set(&birthday_key(user_id, date), "true")
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Storage read failed for {}: {}", key, e);
                None
            }
        }
    }
}
