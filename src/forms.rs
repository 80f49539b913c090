//! Resource Forms
//!
//! Client-side validation for the dashboard's create/update forms. A form
//! that fails validation is never submitted.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Loose email shape check
pub fn is_valid_email(email: &str) -> bool {
    RE_EMAIL.is_match(email.trim())
}

/// Form validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Collects missing required fields in declaration order
struct Required(Vec<&'static str>);

impl Required {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn text(mut self, field: &'static str, value: &str) -> Self {
        if blank(value) {
            self.0.push(field);
        }
        self
    }

    fn present<T>(mut self, field: &'static str, value: &Option<T>) -> Self {
        if value.is_none() {
            self.0.push(field);
        }
        self
    }

    fn check(self) -> Result<(), FormError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(FormError::MissingFields(self.0))
        }
    }
}

fn date_order(
    field: &'static str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), FormError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(FormError::Invalid {
                field,
                reason: format!("{} is before {}", end, start),
            });
        }
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), FormError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FormError::Invalid {
            field,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Department create/update
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentForm {
    pub name: String,
    pub company_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DepartmentForm {
    pub fn validate(&self) -> Result<(), FormError> {
        Required::new()
            .text("name", &self.name)
            .text("companyId", &self.company_id)
            .check()
    }
}

/// Project create
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    pub name: String,
    pub department_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl ProjectForm {
    pub fn validate(&self) -> Result<(), FormError> {
        Required::new()
            .text("name", &self.name)
            .text("departmentId", &self.department_id)
            .check()?;
        date_order("endDate", self.start_date, self.end_date)
    }
}

/// Invoice create
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceForm {
    pub company_id: String,
    pub employee_id: String,
    pub amount: f64,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InvoiceForm {
    pub fn validate(&self) -> Result<(), FormError> {
        Required::new()
            .text("companyId", &self.company_id)
            .text("employeeId", &self.employee_id)
            .present("issueDate", &self.issue_date)
            .present("dueDate", &self.due_date)
            .check()?;
        positive("amount", self.amount)?;
        date_order("dueDate", self.issue_date, self.due_date)
    }
}

/// Subscription package create
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageForm {
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_users: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PackageForm {
    pub fn validate(&self) -> Result<(), FormError> {
        Required::new().text("name", &self.name).check()?;
        positive("price", self.price)?;
        if self.max_users == Some(0) {
            return Err(FormError::Invalid {
                field: "maxUsers",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// License assignment
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseForm {
    pub company_id: String,
    pub package_id: String,
    pub seats: u32,
    pub starts_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
}

impl LicenseForm {
    pub fn validate(&self) -> Result<(), FormError> {
        Required::new()
            .text("companyId", &self.company_id)
            .text("packageId", &self.package_id)
            .present("startsOn", &self.starts_on)
            .present("expiresOn", &self.expires_on)
            .check()?;
        if self.seats == 0 {
            return Err(FormError::Invalid {
                field: "seats",
                reason: "must be at least 1".to_string(),
            });
        }
        date_order("expiresOn", self.starts_on, self.expires_on)
    }
}
