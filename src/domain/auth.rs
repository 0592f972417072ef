use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{ApiError, ValidationError};
use crate::domain::session::{Role, UserRecord};
use crate::domain::validation::require_text;

// Payloads sent to and received from the backend's auth endpoints.
// Serialization in this layer is a pragmatic leak; the shapes are the contract.

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub phone_number: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerificationRequest {
    pub phone_number: String,
    pub otp: String,
}

// Token grant returned by `/auth/login` and `/auth/verify-otp`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: UserRecord,
}

// Token grant found under `data` of the `/admin/login` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginGrant {
    pub access_token: String,
    pub admin: UserRecord,
}

// Registration form as filled in by the user.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    pub password: String,
    pub role: &'static str,
}

/// Splits a full name on its first space.
///
/// Everything after the first space becomes the last name, so multi-word
/// given names end up partly in `last_name`. The backend expects exactly two
/// fields, so this lossy split is kept as-is.
pub fn split_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

impl RegistrationForm {
    pub fn into_request(self) -> Result<RegisterRequest, ValidationError> {
        require_text("name", &self.name, "Name", 100)?;
        require_text("phone", &self.phone, "Phone number", 15)?;
        require_text("email", &self.email, "Email", 254)?;
        if self.password.is_empty() {
            return Err(ValidationError::new("password", "Password is required"));
        }
        if self.role == Role::Admin {
            return Err(ValidationError::new(
                "role",
                "Admin accounts cannot be registered from the client",
            ));
        }

        let (first_name, last_name) = split_name(&self.name);
        Ok(RegisterRequest {
            first_name,
            last_name,
            phone_number: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            role: self.role.backend_name(),
        })
    }
}

// Sign-in flows depend on this trait, not on the concrete HTTP gateway.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, req: LoginRequest) -> Result<AuthTokens, ApiError>;
    async fn admin_login(&self, req: AdminLoginRequest) -> Result<AdminLoginGrant, ApiError>;
    async fn verify_otp(&self, req: OtpVerificationRequest) -> Result<AuthTokens, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, role: Role) -> RegistrationForm {
        RegistrationForm {
            name: name.to_string(),
            phone: "9876543210".to_string(),
            email: "rider@rides.test".to_string(),
            password: "secret".to_string(),
            role,
        }
    }

    #[test]
    fn when_name_has_two_words_then_splits_into_first_and_last() {
        assert_eq!(split_name("Asha Rao"), ("Asha".to_string(), "Rao".to_string()));
    }

    #[test]
    fn when_name_has_one_word_then_last_name_is_empty() {
        assert_eq!(split_name("  Asha "), ("Asha".to_string(), String::new()));
    }

    #[test]
    fn when_given_name_has_several_words_then_remainder_becomes_last_name() {
        assert_eq!(
            split_name("Mary Ann Smith"),
            ("Mary".to_string(), "Ann Smith".to_string())
        );
    }

    #[test]
    fn when_passenger_registers_then_backend_role_is_user() {
        let req = form("Asha Rao", Role::Passenger)
            .into_request()
            .expect("expected valid registration");

        assert_eq!(req.role, "USER");
        assert_eq!(req.first_name, "Asha");
        assert_eq!(req.last_name, "Rao");
    }

    #[test]
    fn when_admin_registers_then_returns_validation_error() {
        let err = form("Root User", Role::Admin)
            .into_request()
            .expect_err("expected admin registration to be rejected");

        assert_eq!(err.field, "role");
    }

    #[test]
    fn when_name_is_blank_then_returns_validation_error() {
        let err = form("   ", Role::Driver)
            .into_request()
            .expect_err("expected blank name to be rejected");

        assert_eq!(err.field, "name");
    }
}
