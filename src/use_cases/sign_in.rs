use std::sync::Arc;

use crate::domain::auth::{
    AdminLoginRequest, AuthProvider, AuthTokens, LoginRequest, OtpVerificationRequest,
};
use crate::domain::errors::{ApiError, RequestError, ValidationError};
use crate::domain::session::{Role, Session};
use crate::use_cases::session_manager::SessionManager;

// Result of a successful sign-in: the session and where the user should land.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedIn {
    pub session: Session,
    pub redirect_to: &'static str,
}

impl SignedIn {
    fn new(session: Session) -> Self {
        let redirect_to = session.redirect_target();
        Self {
            session,
            redirect_to,
        }
    }
}

// Passenger/driver login with injected dependencies.
pub struct LoginUseCase<P> {
    pub provider: P,
    pub session: Arc<SessionManager>,
}

impl<P> LoginUseCase<P>
where
    P: AuthProvider,
{
    #[tracing::instrument(name = "login", skip_all)]
    pub async fn execute(&self, phone_number: &str, password: &str) -> Result<SignedIn, ApiError> {
        let phone_number = phone_number.trim();
        if phone_number.is_empty() {
            return Err(ValidationError::new("phone_number", "Phone number is required").into());
        }
        if password.is_empty() {
            return Err(ValidationError::new("password", "Password is required").into());
        }

        let tokens = self
            .provider
            .login(LoginRequest {
                phone_number: phone_number.to_string(),
                password: password.to_string(),
            })
            .await?;

        let role = role_of(&tokens)?;
        Ok(establish(&self.session, tokens, role))
    }
}

// Admin login against the separate admin endpoint.
pub struct AdminLoginUseCase<P> {
    pub provider: P,
    pub session: Arc<SessionManager>,
}

impl<P> AdminLoginUseCase<P>
where
    P: AuthProvider,
{
    #[tracing::instrument(name = "admin_login", skip_all)]
    pub async fn execute(&self, email: &str, password: &str) -> Result<SignedIn, ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::new("email", "Email is required").into());
        }
        if password.is_empty() {
            return Err(ValidationError::new("password", "Password is required").into());
        }

        let grant = self
            .provider
            .admin_login(AdminLoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let session = self
            .session
            .establish(grant.admin, Role::Admin, grant.access_token, None);
        Ok(SignedIn::new(session))
    }
}

// OTP verification completing a registration. The role is the one the user registered with.
pub struct VerifyOtpUseCase<P> {
    pub provider: P,
    pub session: Arc<SessionManager>,
}

impl<P> VerifyOtpUseCase<P>
where
    P: AuthProvider,
{
    #[tracing::instrument(name = "verify_otp", skip_all, fields(role = %role))]
    pub async fn execute(&self, phone_number: &str, otp: &str, role: Role) -> Result<SignedIn, ApiError> {
        let otp = otp.trim();
        if otp.len() != 6 || !otp.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::new("otp", "OTP must be 6 digits").into());
        }

        let tokens = self
            .provider
            .verify_otp(OtpVerificationRequest {
                phone_number: phone_number.trim().to_string(),
                otp: otp.to_string(),
            })
            .await?;

        Ok(establish(&self.session, tokens, role))
    }
}

fn role_of(tokens: &AuthTokens) -> Result<Role, RequestError> {
    let raw = tokens.user.role.as_deref().unwrap_or_default();
    Role::from_backend(raw).ok_or_else(|| {
        tracing::warn!(role = raw, "login returned an unsupported role.");
        RequestError::upstream(200, format!("unsupported role: {raw:?}"))
    })
}

fn establish(session: &SessionManager, tokens: AuthTokens, role: Role) -> SignedIn {
    let session = session.establish(tokens.user, role, tokens.access_token, tokens.refresh_token);
    SignedIn::new(session)
}
