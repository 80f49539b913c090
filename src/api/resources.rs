//! Dashboard resource endpoints
//!
//! Departments, consultants, projects, packages, invoices and licenses.
//! Known fields are typed; the rest is kept in `extra`.

use super::{ApiClient, ApiError};
use crate::forms::{DepartmentForm, InvoiceForm, LicenseForm, PackageForm, ProjectForm};
use crate::models::Id;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultant {
    pub id: Id,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// List endpoints answer either a bare array or `{"data": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) => items,
            ListBody::Wrapped { data } => data,
        }
    }
}

impl ApiClient {
    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<T>, ApiError> {
        let body: ListBody<T> = self.send_json(request).await?;
        Ok(body.into_vec())
    }

    // Departments

    pub async fn list_departments(&self, company_id: &Id) -> Result<Vec<Department>, ApiError> {
        self.list(
            self.get("/departments")
                .query(&[("companyId", company_id.to_string())]),
        )
        .await
    }

    pub async fn create_department(&self, form: &DepartmentForm) -> Result<Department, ApiError> {
        form.validate()?;
        info!("Creating department {}", form.name);
        self.send_json(self.post("/departments").json(form)).await
    }

    pub async fn update_department(&self, id: &Id, form: &DepartmentForm) -> Result<Department, ApiError> {
        form.validate()?;
        self.send_json(self.put(&format!("/departments/{}", id)).json(form))
            .await
    }

    pub async fn delete_department(&self, id: &Id) -> Result<(), ApiError> {
        info!("Deleting department {}", id);
        self.send_empty(self.delete(&format!("/departments/{}", id)))
            .await
    }

    // Consultants

    pub async fn list_consultants(&self, company_id: &Id) -> Result<Vec<Consultant>, ApiError> {
        self.list(
            self.get("/consultants")
                .query(&[("companyId", company_id.to_string())]),
        )
        .await
    }

    // Projects

    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.list(self.get("/projects")).await
    }

    pub async fn create_project(&self, form: &ProjectForm) -> Result<Project, ApiError> {
        form.validate()?;
        info!("Creating project {}", form.name);
        self.send_json(self.post("/projects").json(form)).await
    }

    pub async fn delete_project(&self, id: &Id) -> Result<(), ApiError> {
        info!("Deleting project {}", id);
        self.send_empty(self.delete(&format!("/projects/{}", id)))
            .await
    }

    // Packages

    pub async fn get_package(&self, id: &Id) -> Result<Package, ApiError> {
        self.send_json(self.get(&format!("/packages/{}", id))).await
    }

    pub async fn create_package(&self, form: &PackageForm) -> Result<Package, ApiError> {
        form.validate()?;
        self.send_json(self.post("/packages").json(form)).await
    }

    // Invoices

    pub async fn list_company_invoices(&self, company_id: &Id) -> Result<Vec<Invoice>, ApiError> {
        self.list(self.get(&format!("/company/invoices/{}", company_id)))
            .await
    }

    pub async fn list_employee_invoices(&self, employee_id: &Id) -> Result<Vec<Invoice>, ApiError> {
        self.list(self.get(&format!("/employee/invoices/{}", employee_id)))
            .await
    }

    pub async fn create_invoice(&self, form: &InvoiceForm) -> Result<Invoice, ApiError> {
        form.validate()?;
        self.send_json(self.post("/invoices").json(form)).await
    }

    // Licenses

    pub async fn create_license(&self, form: &LicenseForm) -> Result<License, ApiError> {
        form.validate()?;
        self.send_json(self.post("/licenses").json(form)).await
    }
}
