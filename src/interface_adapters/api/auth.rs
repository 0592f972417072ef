use async_trait::async_trait;

use crate::domain::auth::{
    AdminLoginGrant, AdminLoginRequest, AuthProvider, AuthTokens, LoginRequest,
    OtpVerificationRequest, RegistrationForm,
};
use crate::domain::errors::{ApiError, RequestError};
use crate::domain::validation::require_text;
use crate::interface_adapters::api::with_query;
use crate::interface_adapters::gateway::{ApiGateway, CallOptions};
use crate::interface_adapters::response::NormalizedResponse;

impl ApiGateway {
    // Starts registration; the backend answers with `{message, phoneNumber}` and sends an OTP.
    pub async fn register(&self, form: RegistrationForm) -> Result<NormalizedResponse, ApiError> {
        let request = form.into_request()?;
        self.call("/auth/register", CallOptions::post().json(&request)?)
            .await
    }

    pub async fn resend_otp(&self, phone_number: &str) -> Result<NormalizedResponse, ApiError> {
        let phone_number = require_text("phone_number", phone_number, "Phone number", 15)?;
        let path = with_query("/auth/resend-otp", [("phoneNumber", phone_number)]);
        self.call(&path, CallOptions::post()).await
    }
}

#[async_trait]
impl AuthProvider for ApiGateway {
    async fn login(&self, req: LoginRequest) -> Result<AuthTokens, ApiError> {
        let response = self
            .call("/auth/login", CallOptions::post().json(&req)?)
            .await?;
        Ok(response.data_as()?)
    }

    async fn admin_login(&self, req: AdminLoginRequest) -> Result<AdminLoginGrant, ApiError> {
        let response = self
            .call("/admin/login", CallOptions::post().json(&req)?)
            .await?;
        // Admin login reports some failures inside a 200 envelope.
        if !response.is_success() {
            let message = response
                .message
                .clone()
                .unwrap_or_else(|| "Admin login failed".to_string());
            return Err(RequestError::upstream(response.status_code, message).into());
        }
        Ok(response.data_as()?)
    }

    async fn verify_otp(&self, req: OtpVerificationRequest) -> Result<AuthTokens, ApiError> {
        let response = self
            .call("/auth/verify-otp", CallOptions::post().json(&req)?)
            .await?;
        Ok(response.data_as()?)
    }
}
