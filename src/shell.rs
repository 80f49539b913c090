//! Dashboard Shell
//!
//! Gates every dashboard route behind a valid session and builds the
//! role's navigation menu.
//!
//! # Outcomes
//!
//! - No, partial, or expired session → redirect to `/login` (expired sessions
//!   are cleared)
//! - Route outside the role's subtree → redirect to the role's start page
//! - Otherwise → render with navigation and the birthday banner flag

use crate::birthday;
use crate::credentials::CredentialStore;
use crate::models::UserProfile;
use crate::roles::{self, Role, LOGIN_PATH};
use crate::session::{SessionState, SessionValidator};
use chrono::{DateTime, Local, Utc};
use tracing::{debug, warn};

pub const SESSION_EXPIRED_NOTICE: &str = "Session expired. Redirecting to login...";
pub const SIGN_IN_NOTICE: &str = "Please sign in. Redirecting to login...";

/// Routes every role may open
const SHARED_ROUTES: &[&str] = &["/dashboard/profile"];

/// Navigation entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

const fn nav(label: &'static str, path: &'static str) -> NavItem {
    NavItem { label, path }
}

const PROFILE: NavItem = nav("Profile", "/dashboard/profile");

const SUPER_ADMIN_NAV: &[NavItem] = &[
    nav("Companies", "/dashboard/super-admin/companies"),
    nav("Packages", "/dashboard/super-admin/packages"),
    nav("Licenses", "/dashboard/super-admin/licenses"),
    nav("Invoices", "/dashboard/super-admin/invoices"),
    PROFILE,
];

const COMPANY_ADMIN_NAV: &[NavItem] = &[
    nav("Overview", "/dashboard/company"),
    nav("Departments", "/dashboard/company/departments"),
    nav("Projects", "/dashboard/company/projects"),
    nav("Consultants", "/dashboard/company/consultants"),
    nav("Invoices", "/dashboard/company/invoices"),
    nav("Reports", "/dashboard/company/reports"),
    PROFILE,
];

const DEPARTMENT_HEAD_NAV: &[NavItem] = &[
    nav("Overview", "/dashboard/department-head"),
    nav("Projects", "/dashboard/department-head/projects"),
    nav("Team", "/dashboard/department-head/team"),
    nav("Reports", "/dashboard/department-head/reports"),
    PROFILE,
];

const BOARD_MEMBER_NAV: &[NavItem] = &[
    nav("Overview", "/dashboard/board-member"),
    nav("Reports", "/dashboard/board-member/reports"),
    PROFILE,
];

const EMPLOYEE_NAV: &[NavItem] = &[
    nav("Overview", "/dashboard/employee"),
    nav("Tasks", "/dashboard/employee/tasks"),
    nav("Timesheets", "/dashboard/employee/timesheets"),
    nav("Invoices", "/dashboard/employee/invoices"),
    PROFILE,
];

const CONSULTANCY_NAV: &[NavItem] = &[
    nav("Overview", "/dashboard/consultancy"),
    nav("Consultants", "/dashboard/consultancy/consultants"),
    nav("Invoices", "/dashboard/consultancy/invoices"),
    PROFILE,
];

const FREELANCER_NAV: &[NavItem] = &[
    nav("Overview", "/dashboard/freelancer"),
    nav("Projects", "/dashboard/freelancer/projects"),
    nav("Invoices", "/dashboard/freelancer/invoices"),
    PROFILE,
];

/// Navigation menu for a role
pub fn navigation(role: &Role) -> &'static [NavItem] {
    match role {
        Role::SuperAdmin => SUPER_ADMIN_NAV,
        Role::CompanyAdmin => COMPANY_ADMIN_NAV,
        Role::DepartmentAdmin => DEPARTMENT_HEAD_NAV,
        Role::BoardMember => BOARD_MEMBER_NAV,
        Role::Consultancy => CONSULTANCY_NAV,
        Role::Freelancer => FREELANCER_NAV,
        Role::Consultant | Role::Employee | Role::Other(_) => EMPLOYEE_NAV,
    }
}

fn under(path: &str, root: &str) -> bool {
    path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/') || rest.starts_with('?'))
}

/// Rendered shell
#[derive(Debug, Clone, PartialEq)]
pub struct ShellView {
    pub user: UserProfile,
    pub role: Role,
    pub home: &'static str,
    pub nav: &'static [NavItem],
    pub active: Option<NavItem>,
    pub show_birthday: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellOutcome {
    Render(Box<ShellView>),
    Redirect {
        to: &'static str,
        notice: Option<&'static str>,
    },
}

/// Session-gated dashboard shell
#[derive(Clone)]
pub struct DashboardShell {
    credentials: CredentialStore,
    validator: SessionValidator,
}

impl DashboardShell {
    pub fn new(credentials: CredentialStore) -> Self {
        let validator = SessionValidator::new(credentials.clone());
        Self {
            credentials,
            validator,
        }
    }

    /// Resolve a dashboard route now
    pub fn enter(&self, path: &str) -> ShellOutcome {
        self.enter_at(path, Utc::now(), Local::now().date_naive())
    }

    pub fn enter_at(&self, path: &str, now: DateTime<Utc>, today: chrono::NaiveDate) -> ShellOutcome {
        let session = match self.validator.state_at(now) {
            SessionState::Authenticated(session) => session,
            SessionState::Unauthenticated => {
                let had_token = self.credentials.get_token().is_some();
                if had_token {
                    // Expired or half-written session
                    if let Err(e) = self.credentials.clear_auth() {
                        warn!("Could not clear stale session: {}", e);
                    }
                }
                debug!("Shell: no usable session for {}", path);
                return ShellOutcome::Redirect {
                    to: LOGIN_PATH,
                    notice: Some(if had_token {
                        SESSION_EXPIRED_NOTICE
                    } else {
                        SIGN_IN_NOTICE
                    }),
                };
            }
        };

        let role = roles::resolve_role(&session.user);
        let home = role.dashboard_path();
        let allowed = under(path, role.dashboard_root())
            || SHARED_ROUTES.iter().any(|root| under(path, root));

        if !allowed {
            debug!("Shell: {} not open to {}, sending to {}", path, role.name(), home);
            return ShellOutcome::Redirect {
                to: home,
                notice: None,
            };
        }

        let nav = navigation(&role);
        let active = nav
            .iter()
            .filter(|item| under(path, item.path))
            .max_by_key(|item| item.path.len())
            .copied();

        let show_birthday = match birthday::take_celebration(&self.credentials, &session.user, today) {
            Ok(show) => show,
            Err(e) => {
                warn!("Birthday flag unavailable: {}", e);
                false
            }
        };

        ShellOutcome::Render(Box::new(ShellView {
            user: session.user,
            role,
            home,
            nav,
            active,
            show_birthday,
        }))
    }
}
