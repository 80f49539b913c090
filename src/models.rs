//! Session and user profile models
//!
//! Shapes follow the dashboard API's JSON (camelCase). Unknown fields are
//! kept in `extra` so a profile written to storage reads back unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier as delivered by the API (numeric or string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Num(i64),
    Text(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Num(n) => fmt::Display::fmt(n, f),
            Id::Text(s) => f.pad(s),
        }
    }
}

impl From<i64> for Id {
    fn from(v: i64) -> Self {
        Id::Num(v)
    }
}

impl From<&str> for Id {
    fn from(v: &str) -> Self {
        Id::Text(v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRef {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoleRef {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRef {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRef {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentHeadRef {
    pub id: Id,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cached user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Id,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    pub role: RoleRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_head: Option<DepartmentHeadRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Birth date, accepting `YYYY-MM-DD` or an RFC 3339 timestamp
    pub fn birth_date(&self) -> Option<NaiveDate> {
        let raw = self.date_of_birth.as_deref()?;
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    pub fn is_department_head(&self) -> bool {
        self.department_head.is_some()
    }

    pub fn company_plan_name(&self) -> Option<&str> {
        self.company
            .as_ref()
            .and_then(|c| c.plan.as_ref())
            .map(|p| p.name.as_str())
    }
}

/// Client-held proof of authentication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// `POST /auth/login` body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}
