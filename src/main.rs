//! Taskdesk CLI - Entry Point
//!
//! Commands:
//! - login <email>: authenticate and print the start dashboard
//! - logout / whoami / route <path>
//! - reset-password: interactive three-step reset
//! - departments, consultants, projects, invoices, package <id>

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;
use taskdesk::forms::DepartmentForm;
use taskdesk::roles::dashboard_path;
use taskdesk::shell::SESSION_EXPIRED_NOTICE;
use taskdesk::{
    ApiClient, Config, CredentialStore, DashboardShell, FileStore, Id, LoginFlow, LoginForm,
    PasswordReset, ResetStep, Session, SessionState, SessionValidator, ShellOutcome, UserProfile,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn print_help() {
    println!("Taskdesk v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: taskdesk <COMMAND> [ARGS]");
    println!();
    println!("Commands:");
    println!("  login <email>                  Log in (password from TASKDESK_PASSWORD or stdin)");
    println!("  logout                         Clear the stored session");
    println!("  whoami                         Show the session user and navigation");
    println!("  route [path]                   Resolve a dashboard route for the session");
    println!("  reset-password                 Reset a forgotten password");
    println!("  departments [list]             List departments of your company");
    println!("  departments create <name>      Create a department");
    println!("  departments delete <id>        Delete a department");
    println!("  consultants                    List consultants of your company");
    println!("  projects                       List projects");
    println!("  invoices [employee <id>]       List company (or employee) invoices");
    println!("  package <id>                   Show a package");
    println!();
    println!("Environment variables:");
    println!("  TASKDESK_API_URL               API base URL (default: http://localhost:8000/api)");
    println!("  TASKDESK_STORAGE_PATH          Session storage file");
    println!("  TASKDESK_ROLE_OVERRIDES        TOML file with per-user role overrides");
    println!("  TASKDESK_REQUEST_TIMEOUT_SECS  Request timeout in seconds");
    println!("  RUST_LOG                       trace | debug | info | warn | error");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let log_level = log_level(std::env::var("RUST_LOG").ok().as_deref());

    // Logs go to stderr so command output stays clean
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;
    info!("Taskdesk v{} using {}", env!("CARGO_PKG_VERSION"), config.api_url);

    let credentials = CredentialStore::new(Arc::new(FileStore::new(&config.storage_path)));
    let api = ApiClient::from_config(&config)?;

    let command = args[0].as_str();
    let rest = &args[1..];

    match command {
        "login" => login(&config, api, credentials, rest).await,
        "logout" => {
            let path = taskdesk::login::logout(&credentials)?;
            println!("Logged out. Next: {}", path);
            Ok(())
        }
        "whoami" => {
            let session = require_session(&credentials)?;
            route(&credentials, dashboard_path(&session.user))
        }
        "route" => {
            let path = rest.first().map(String::as_str).unwrap_or("/dashboard");
            route(&credentials, path)
        }
        "reset-password" => reset_password(api).await,
        "departments" => departments(api, &credentials, rest).await,
        "consultants" => {
            let session = require_session(&credentials)?;
            let company = company_id(&session.user)?;
            let api = api.with_token(Some(session.token));
            for c in api.list_consultants(&company).await? {
                println!("{:>6}  {:<30} {}", c.id, c.full_name, c.email);
            }
            Ok(())
        }
        "projects" => {
            let session = require_session(&credentials)?;
            let api = api.with_token(Some(session.token));
            for p in api.list_projects().await? {
                println!("{:>6}  {:<30} {}", p.id, p.name, p.status.unwrap_or_default());
            }
            Ok(())
        }
        "invoices" => invoices(api, &credentials, rest).await,
        "package" => {
            let id = rest.first().context("Usage: taskdesk package <id>")?;
            let session = require_session(&credentials)?;
            let api = api.with_token(Some(session.token));
            let package = api.get_package(&parse_id(id)).await?;
            println!("{}", serde_json::to_string_pretty(&package)?);
            Ok(())
        }
        other => {
            print_help();
            bail!("Unknown command: {}", other)
        }
    }
}

/// Level from a `RUST_LOG` value; info when unset or unknown
fn log_level(value: Option<&str>) -> Level {
    match value.map(str::to_lowercase).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("warn") => Level::WARN,
        Some("error") => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_id(raw: &str) -> Id {
    raw.parse::<i64>()
        .map(Id::Num)
        .unwrap_or_else(|_| Id::Text(raw.to_string()))
}

fn company_id(user: &UserProfile) -> Result<Id> {
    user.company
        .as_ref()
        .map(|c| c.id.clone())
        .context("Your account is not attached to a company")
}

/// Usable session; stale sessions are cleared
fn require_session(credentials: &CredentialStore) -> Result<Session> {
    match SessionValidator::new(credentials.clone()).state() {
        SessionState::Authenticated(session) => Ok(session),
        SessionState::Unauthenticated => {
            if credentials.get_token().is_some() {
                credentials.clear_auth()?;
                bail!("{} (run `taskdesk login <email>`)", SESSION_EXPIRED_NOTICE);
            }
            bail!("Not logged in. Run `taskdesk login <email>`")
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn login(config: &Config, api: ApiClient, credentials: CredentialStore, rest: &[String]) -> Result<()> {
    let email = match rest.first() {
        Some(email) => email.clone(),
        None => prompt("Email: ")?,
    };
    let password = match std::env::var("TASKDESK_PASSWORD") {
        Ok(password) => password,
        Err(_) => prompt("Password: ")?,
    };

    let mut flow = LoginFlow::new(api, credentials, config.role_overrides()?);
    match flow.submit(&LoginForm::new(&email, &password)).await {
        Ok(outcome) => {
            println!(
                "Welcome, {} ({})",
                outcome.session.user.full_name, outcome.session.user.role.name
            );
            println!("Dashboard: {}", outcome.redirect);
            Ok(())
        }
        Err(_) => bail!(
            "{}",
            flow.state()
                .error
                .clone()
                .unwrap_or_else(|| taskdesk::login::LOGIN_FALLBACK_MESSAGE.to_string())
        ),
    }
}

fn route(credentials: &CredentialStore, path: &str) -> Result<()> {
    let shell = DashboardShell::new(credentials.clone());
    match shell.enter(path) {
        ShellOutcome::Render(view) => {
            if view.show_birthday {
                println!("Happy birthday, {}!", view.user.full_name);
            }
            println!("{} <{}> - {}", view.user.full_name, view.user.email, view.role.name());
            if let Some(plan) = credentials.company_plan_name() {
                println!("Plan: {}", plan);
            }
            println!("Home: {}", view.home);
            for item in view.nav {
                let marker = if view.active == Some(*item) { "*" } else { " " };
                println!(" {} {:<14} {}", marker, item.label, item.path);
            }
            Ok(())
        }
        ShellOutcome::Redirect { to, notice } => {
            if let Some(notice) = notice {
                println!("{}", notice);
            }
            println!("Redirect: {}", to);
            Ok(())
        }
    }
}

async fn reset_password(api: ApiClient) -> Result<()> {
    println!("Password reset. Type `back` to return to the previous step.");
    let mut wizard = PasswordReset::new(api);

    while !wizard.is_done() {
        let result = match wizard.step().clone() {
            ResetStep::AwaitingEmail => {
                let email = prompt("[1/3] Email: ")?;
                wizard.submit_email(&email).await
            }
            ResetStep::AwaitingToken { email } => {
                let token = prompt(&format!("[2/3] Code sent to {}: ", email))?;
                if token.trim() == "back" {
                    wizard.back();
                    continue;
                }
                wizard.submit_token(&token).await
            }
            ResetStep::AwaitingNewPassword { .. } => {
                let password = prompt("[3/3] New password: ")?;
                if password.trim() == "back" {
                    wizard.back();
                    continue;
                }
                let confirmation = prompt("      Confirm password: ")?;
                wizard.submit_new_password(&password, &confirmation).await
            }
            ResetStep::Done => break,
        };

        match result {
            Ok(()) => {
                if let Some(notice) = wizard.notice() {
                    println!("{}", notice);
                }
            }
            Err(_) => {
                if let Some(error) = wizard.error() {
                    eprintln!("Error: {}", error);
                }
            }
        }
    }

    Ok(())
}

async fn departments(api: ApiClient, credentials: &CredentialStore, rest: &[String]) -> Result<()> {
    let session = require_session(credentials)?;
    let company = company_id(&session.user)?;
    let api = api.with_token(Some(session.token));

    match rest.first().map(String::as_str).unwrap_or("list") {
        "list" => {
            for d in api.list_departments(&company).await? {
                println!("{:>6}  {}", d.id, d.name);
            }
        }
        "create" => {
            let name = rest.get(1).cloned().unwrap_or_default();
            let form = DepartmentForm {
                name,
                company_id: company.to_string(),
                ..Default::default()
            };
            let created = api.create_department(&form).await?;
            println!("Created department {} ({})", created.name, created.id);
        }
        "delete" => {
            let id = rest.get(1).context("Usage: taskdesk departments delete <id>")?;
            api.delete_department(&parse_id(id)).await?;
            println!("Deleted department {}", id);
        }
        other => bail!("Unknown departments action: {}", other),
    }

    Ok(())
}

async fn invoices(api: ApiClient, credentials: &CredentialStore, rest: &[String]) -> Result<()> {
    let session = require_session(credentials)?;
    let list = match rest.first().map(String::as_str) {
        Some("employee") => {
            let id = rest.get(1).map(|s| parse_id(s)).unwrap_or_else(|| session.user.id.clone());
            api.with_token(Some(session.token))
                .list_employee_invoices(&id)
                .await?
        }
        _ => {
            let company = company_id(&session.user)?;
            api.with_token(Some(session.token))
                .list_company_invoices(&company)
                .await?
        }
    };

    for inv in list {
        println!(
            "{:>6}  {:<12} {:>10} {:<10} {}",
            inv.id,
            inv.invoice_number.unwrap_or_default(),
            inv.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
            inv.status.unwrap_or_default(),
            inv.due_date.unwrap_or_default()
        );
    }
    Ok(())
}
