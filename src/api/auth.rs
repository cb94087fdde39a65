use serde_json::json;

use super::{ApiClient, ApiResult, Credentials, LoginResponse, MessageResponse, Registration, TokenResponse};

impl ApiClient {
    pub async fn register(&self, registration: &Registration) -> ApiResult<MessageResponse> {
        self.post("/auth/register", registration).await
    }

    /// Either signs in directly or, for accounts with two-factor enabled,
    /// triggers a code email and reports `two_factor_enabled`.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        self.post("/auth/login", credentials).await
    }

    pub async fn verify_2fa(&self, user_id: i64, code: &str) -> ApiResult<TokenResponse> {
        self.post("/auth/verify-2fa", &json!({ "user_id": user_id, "code": code }))
            .await
    }

    pub async fn enable_2fa(&self, user_id: i64) -> ApiResult<MessageResponse> {
        self.post("/auth/enable-2fa", &json!({ "user_id": user_id }))
            .await
    }

    pub async fn disable_2fa(&self, user_id: i64) -> ApiResult<MessageResponse> {
        self.post("/auth/disable-2fa", &json!({ "user_id": user_id }))
            .await
    }
}
