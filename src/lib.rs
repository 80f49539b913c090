//! Taskdesk
//!
//! Client core for the multi-tenant time-tracking & invoicing dashboard.
//!
//! # Features
//!
//! - **Credential Store**: token + cached profile behind one handle
//! - **Session Validator**: token presence and JWT expiry
//! - **Role Router**: start dashboard per role, department-head precedence
//! - **Login Flow**: validate, submit, override, persist, route
//! - **Password Reset**: explicit three-step state machine
//! - **Dashboard Shell**: session gate, role navigation, birthday banner
//! - **REST Client**: departments, projects, invoices, packages, licenses
//!
//! # Architecture
//!
//! ```text
//! CLI ──► LoginFlow / PasswordReset / DashboardShell
//!              │             │              │
//!              ├── ApiClient ┘              ├── SessionValidator
//!              │   (reqwest)                │
//!              └── CredentialStore ◄────────┘
//!                    └── KeyValueStore (FileStore / MemoryStore)
//! ```

pub mod api;
pub mod birthday;
pub mod config;
pub mod credentials;
pub mod forms;
pub mod login;
pub mod models;
pub mod reset;
pub mod roles;
pub mod session;
pub mod shell;
pub mod storage;

pub use api::{ApiClient, ApiError, AuthApi, ResetApi};
pub use config::Config;
pub use credentials::CredentialStore;
pub use forms::FormError;
pub use login::{LoginError, LoginFlow, LoginForm, LoginOutcome, LoginState};
pub use models::{Id, Session, UserProfile};
pub use reset::{PasswordReset, ResetError, ResetStep};
pub use roles::{Role, RoleOverrides};
pub use session::{SessionState, SessionValidator};
pub use shell::{DashboardShell, NavItem, ShellOutcome, ShellView};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
