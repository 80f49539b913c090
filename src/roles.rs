//! Role Router
//!
//! Maps a user to the dashboard they start on:
//! - **Department head**: presence of `departmentHead` wins over the role name
//! - **Named roles**: fixed table of known role names
//! - **Fallback**: employee dashboard
//!
//! Per-user role overrides live in an external table (`RoleOverrides`)
//! instead of being compared inline during login.

use crate::models::UserProfile;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

pub const LOGIN_PATH: &str = "/login";
pub const DEPARTMENT_HEAD_PATH: &str = "/dashboard/department-head";
pub const SUPER_ADMIN_PATH: &str = "/dashboard/super-admin/companies";
pub const COMPANY_ADMIN_PATH: &str = "/dashboard/company";
pub const BOARD_MEMBER_PATH: &str = "/dashboard/board-member";
pub const EMPLOYEE_PATH: &str = "/dashboard/employee";
pub const CONSULTANCY_PATH: &str = "/dashboard/consultancy";
pub const FREELANCER_PATH: &str = "/dashboard/freelancer";

/// Role name given to department heads at login
pub const DEPARTMENT_ADMIN_ROLE: &str = "Department Admin";

/// Dashboard roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    SuperAdmin,
    CompanyAdmin,
    DepartmentAdmin,
    BoardMember,
    Consultant,
    Employee,
    Consultancy,
    Freelancer,
    /// Unrecognised role name, routed like an employee
    Other(String),
}

impl Role {
    /// Parse a role name (case-insensitive, surrounding whitespace ignored)
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "super admin" => Role::SuperAdmin,
            "company admin" => Role::CompanyAdmin,
            "department admin" => Role::DepartmentAdmin,
            "board member" => Role::BoardMember,
            "consultant" => Role::Consultant,
            "employee" => Role::Employee,
            "consultancy" => Role::Consultancy,
            "freelancer" => Role::Freelancer,
            _ => Role::Other(name.trim().to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::CompanyAdmin => "Company Admin",
            Role::DepartmentAdmin => DEPARTMENT_ADMIN_ROLE,
            Role::BoardMember => "Board Member",
            Role::Consultant => "Consultant",
            Role::Employee => "Employee",
            Role::Consultancy => "Consultancy",
            Role::Freelancer => "Freelancer",
            Role::Other(name) => name,
        }
    }

    /// Start page after login
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::SuperAdmin => SUPER_ADMIN_PATH,
            Role::CompanyAdmin => COMPANY_ADMIN_PATH,
            Role::DepartmentAdmin => DEPARTMENT_HEAD_PATH,
            Role::BoardMember => BOARD_MEMBER_PATH,
            Role::Consultancy => CONSULTANCY_PATH,
            Role::Freelancer => FREELANCER_PATH,
            Role::Consultant | Role::Employee | Role::Other(_) => EMPLOYEE_PATH,
        }
    }

    /// Route subtree the role may open
    pub fn dashboard_root(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "/dashboard/super-admin",
            _ => self.dashboard_path(),
        }
    }
}

/// Effective role: department heads route as `DepartmentAdmin` regardless of name
pub fn resolve_role(user: &UserProfile) -> Role {
    if user.is_department_head() {
        return Role::DepartmentAdmin;
    }
    Role::from_name(&user.role.name)
}

/// Starting dashboard path for a user
pub fn dashboard_path(user: &UserProfile) -> &'static str {
    resolve_role(user).dashboard_path()
}

/// Override table errors
#[derive(Error, Debug)]
pub enum OverrideError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid override table: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize)]
struct OverrideFile {
    #[serde(default)]
    overrides: HashMap<String, String>,
}

/// Per-user role overrides keyed by email
///
/// ```toml
/// [overrides]
/// "contractor@example.com" = "Freelancer"
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleOverrides {
    entries: HashMap<String, String>,
}

impl RoleOverrides {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_toml_str(data: &str) -> Result<Self, OverrideError> {
        let file: OverrideFile = toml::from_str(data)?;
        let mut table = Self::empty();
        for (email, role) in file.overrides {
            table.insert(&email, &role);
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, OverrideError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    pub fn insert(&mut self, email: &str, role: &str) {
        self.entries
            .insert(email.trim().to_lowercase(), role.trim().to_string());
    }

    pub fn role_for(&self, email: &str) -> Option<&str> {
        self.entries
            .get(&email.trim().to_lowercase())
            .map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Role rename applied at login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedOverride {
    pub from: String,
    pub to: String,
    pub reason: OverrideReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideReason {
    DepartmentHead,
    PerUserTable,
}

/// Rewrite the user's role name before it is persisted
///
/// Department heads become `Department Admin`; then an entry in the
/// per-user table replaces whatever the role is at that point.
pub fn apply_login_overrides(user: &mut UserProfile, overrides: &RoleOverrides) -> Vec<AppliedOverride> {
    let mut applied = Vec::new();

    if user.is_department_head() && user.role.name != DEPARTMENT_ADMIN_ROLE {
        applied.push(AppliedOverride {
            from: user.role.name.clone(),
            to: DEPARTMENT_ADMIN_ROLE.to_string(),
            reason: OverrideReason::DepartmentHead,
        });
        user.role.name = DEPARTMENT_ADMIN_ROLE.to_string();
    }

    if let Some(role) = overrides.role_for(&user.email) {
        if user.role.name != role {
            warn!(
                "Per-user role override for {}: {} -> {}",
                user.email, user.role.name, role
            );
            applied.push(AppliedOverride {
                from: user.role.name.clone(),
                to: role.to_string(),
                reason: OverrideReason::PerUserTable,
            });
            user.role.name = role.to_string();
        }
    }

    applied
}
