use crate::domain::session::Role;
use thiserror::Error;

// Message used for every failure that never produced an HTTP response.
pub const BACKEND_UNAVAILABLE: &str = "backend unavailable";

// Client-detected constraint violation. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

// Non-2xx response or transport failure. `status` is None when no response arrived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestError {
    pub status: Option<u16>,
    pub message: String,
}

impl RequestError {
    pub fn transport() -> Self {
        Self {
            status: None,
            message: BACKEND_UNAVAILABLE.to_string(),
        }
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        self.status.is_none()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }
}

// Attempted an authorized operation without a matching session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("please sign in to continue")]
    NotAuthenticated { required: Option<Role> },
    #[error("this page requires a {expected} account, signed in as {actual}")]
    WrongRole { expected: Role, actual: Role },
}

impl SessionError {
    // Where the UI should send the user instead of failing.
    pub fn redirect_path(&self) -> &'static str {
        match self {
            SessionError::NotAuthenticated { required: Some(role) } => role.login_path(),
            SessionError::NotAuthenticated { required: None } => Role::Passenger.login_path(),
            SessionError::WrongRole { expected, .. } => expected.login_path(),
        }
    }
}

// The single error type surfaced by gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request(err) => err.status,
            _ => None,
        }
    }
}

// Persistence failures. Logged by the session manager, never returned to callers.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage format error: {0}")]
    Format(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
