//! Authentication endpoints

use super::{ApiClient, ApiError, AuthApi, ResetApi};
use crate::models::{LoginRequest, LoginResponse};
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct ResetRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    email: &'a str,
    token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmRequest<'a> {
    email: &'a str,
    token: &'a str,
    new_password: &'a str,
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        info!("Logging in {}", request.email);
        self.send_json(self.post("/auth/login").json(request)).await
    }
}

#[async_trait]
impl ResetApi for ApiClient {
    async fn request_reset(&self, email: &str) -> Result<(), ApiError> {
        self.send_empty(
            self.post("/auth/password-reset/request")
                .json(&ResetRequest { email }),
        )
        .await
    }

    async fn verify_reset_token(&self, email: &str, token: &str) -> Result<(), ApiError> {
        self.send_empty(
            self.post("/auth/password-reset/verify")
                .json(&VerifyRequest { email, token }),
        )
        .await
    }

    async fn confirm_reset(&self, email: &str, token: &str, new_password: &str) -> Result<(), ApiError> {
        self.send_empty(
            self.post("/auth/password-reset/confirm")
                .json(&ConfirmRequest {
                    email,
                    token,
                    new_password,
                }),
        )
        .await
    }
}
