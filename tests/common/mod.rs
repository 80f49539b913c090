//! In-process fake of the dashboard REST backend

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::collections::HashMap;
use parking_lot::Mutex;
use std::sync::Arc;

pub const PASSWORD: &str = "correct-horse-battery";
pub const RESET_CODE: &str = "424242";

#[derive(Clone, Default)]
pub struct Backend {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub token: Arc<Mutex<Option<String>>>,
}

impl Backend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = self.token.lock().clone();
        let given = headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));
        matches!((expected.as_deref(), given), (Some(e), Some(g)) if e == g)
    }
}

pub fn jwt_expiring_in(secs: i64) -> String {
    let exp = (Utc::now() + Duration::seconds(secs)).timestamp();
    encode(
        &Header::default(),
        &json!({"sub": "user", "exp": exp}),
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

fn user_for(email: &str) -> Option<Value> {
    let company = json!({"id": 3, "name": "Acme", "plan": {"name": "Business"}});
    let user = match email {
        "consultant@acme.test" => json!({
            "id": 21,
            "fullName": "Casey Consultant",
            "email": email,
            "role": {"name": "Consultant"},
            "company": company
        }),
        "head@acme.test" => json!({
            "id": 22,
            "fullName": "Harper Head",
            "email": email,
            "role": {"name": "Employee"},
            "company": company,
            "departmentHead": {"id": 4, "name": "Finance"}
        }),
        "root@acme.test" => json!({
            "id": 1,
            "fullName": "Robin Root",
            "email": email,
            "role": {"name": "Super Admin"}
        }),
        _ => return None,
    };
    Some(user)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"})))
}

async fn login(State(backend): State<Backend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    backend.record(format!("login:{}", email));

    match user_for(&email) {
        Some(user) if body["password"] == PASSWORD => {
            let token = jwt_expiring_in(3600);
            *backend.token.lock() = Some(token.clone());
            (StatusCode::OK, Json(json!({"token": token, "user": user})))
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid email or password"})),
        ),
    }
}

async fn reset_request(State(backend): State<Backend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    backend.record(format!("reset-request:{}", email));
    if user_for(&email).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "No account found for this email"})),
        );
    }
    (StatusCode::OK, Json(json!({"sent": true})))
}

async fn reset_verify(State(backend): State<Backend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let token = body["token"].as_str().unwrap_or_default().to_string();
    backend.record(format!("reset-verify:{}", token));
    if token != RESET_CODE {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Invalid or expired token"})),
        );
    }
    (StatusCode::OK, Json(json!({"valid": true})))
}

async fn reset_confirm(State(backend): State<Backend>, Json(body): Json<Value>) -> StatusCode {
    backend.record(format!(
        "reset-confirm:{}:{}",
        body["token"].as_str().unwrap_or_default(),
        body["newPassword"].as_str().unwrap_or_default()
    ));
    StatusCode::NO_CONTENT
}

async fn list_departments(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    let company = query.get("companyId").cloned().unwrap_or_default();
    backend.record(format!("departments:{}", company));
    (
        StatusCode::OK,
        Json(json!({"data": [
            {"id": 4, "name": "Finance", "companyId": 3},
            {"id": 5, "name": "Engineering", "companyId": 3, "headCount": 12}
        ]})),
    )
}

async fn create_department(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    backend.record(format!("create-department:{}", body["name"].as_str().unwrap_or_default()));
    (
        StatusCode::CREATED,
        Json(json!({"id": 9, "name": body["name"], "companyId": body["companyId"]})),
    )
}

async fn update_department(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    backend.record(format!("update-department:{}", id));
    (
        StatusCode::OK,
        Json(json!({"id": id.parse::<i64>().unwrap_or(0), "name": body["name"]})),
    )
}

async fn delete_department(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> StatusCode {
    if !backend.authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    backend.record(format!("delete-department:{}", id));
    StatusCode::NO_CONTENT
}

async fn list_projects(State(backend): State<Backend>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!([
            {"id": 1, "name": "Payroll revamp", "status": "active"},
            {"id": 2, "name": "Audit 2026"}
        ])),
    )
}

async fn get_package(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    if id != "7" {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Package not found"})));
    }
    (
        StatusCode::OK,
        Json(json!({"id": 7, "name": "Business", "price": 99.0, "maxUsers": 50})),
    )
}

async fn company_invoices(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    backend.record(format!("company-invoices:{}", id));
    (
        StatusCode::OK,
        Json(json!([
            {"id": 100, "invoiceNumber": "INV-100", "amount": 1200.5, "status": "paid"},
            {"id": 101, "invoiceNumber": "INV-101", "amount": 830.0, "status": "open", "dueDate": "2026-11-01"}
        ])),
    )
}

async fn employee_invoices(State(backend): State<Backend>, headers: HeaderMap, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    backend.record(format!("employee-invoices:{}", id));
    (StatusCode::OK, Json(json!({"data": [{"id": 300, "amount": 75.0}]})))
}

/// Echo a created record: the posted body plus a server id
fn created(id: i64, body: Value) -> (StatusCode, Json<Value>) {
    let mut record = body;
    record["id"] = json!(id);
    (StatusCode::CREATED, Json(record))
}

async fn list_consultants(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    let company = query.get("companyId").cloned().unwrap_or_default();
    backend.record(format!("consultants:{}", company));
    (
        StatusCode::OK,
        Json(json!({"data": [
            {"id": 21, "fullName": "Casey Consultant", "email": "consultant@acme.test", "rate": 95}
        ]})),
    )
}

async fn create_project(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    backend.record(format!(
        "create-project:{}:{}",
        body["name"].as_str().unwrap_or_default(),
        body["departmentId"].as_str().unwrap_or_default()
    ));
    let mut body = body;
    body["status"] = json!("planned");
    created(31, body)
}

async fn delete_project(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> StatusCode {
    if !backend.authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    backend.record(format!("delete-project:{}", id));
    StatusCode::NO_CONTENT
}

async fn create_package(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    backend.record(format!(
        "create-package:{}:{}:{}",
        body["name"].as_str().unwrap_or_default(),
        body["price"],
        body["maxUsers"]
    ));
    created(8, body)
}

async fn create_invoice(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    backend.record(format!(
        "create-invoice:{}:{}:{}:{}",
        body["companyId"].as_str().unwrap_or_default(),
        body["employeeId"].as_str().unwrap_or_default(),
        body["issueDate"].as_str().unwrap_or_default(),
        body["dueDate"].as_str().unwrap_or_default()
    ));
    let mut body = body;
    body["invoiceNumber"] = json!("INV-102");
    body["status"] = json!("open");
    created(102, body)
}

async fn create_license(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !backend.authorized(&headers) {
        return unauthorized();
    }
    backend.record(format!(
        "create-license:{}:{}:{}",
        body["companyId"].as_str().unwrap_or_default(),
        body["packageId"].as_str().unwrap_or_default(),
        body["seats"]
    ));
    created(55, body)
}

/// Start the fake backend; returns its API base URL
pub async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/password-reset/request", post(reset_request))
        .route("/auth/password-reset/verify", post(reset_verify))
        .route("/auth/password-reset/confirm", post(reset_confirm))
        .route("/departments", get(list_departments).post(create_department))
        .route("/departments/{id}", put(update_department).delete(delete_department))
        .route("/consultants", get(list_consultants))
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{id}", delete(delete_project))
        .route("/packages", post(create_package))
        .route("/packages/{id}", get(get_package))
        .route("/invoices", post(create_invoice))
        .route("/licenses", post(create_license))
        .route("/company/invoices/{id}", get(company_invoices))
        .route("/employee/invoices/{id}", get(employee_invoices))
        .with_state(backend.clone());

    let app = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), backend)
}
