use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const PASSENGER_DASHBOARD: &str = "/passenger-dashboard";
pub const DRIVER_DASHBOARD: &str = "/driver-dashboard";
pub const ADMIN_DASHBOARD: &str = "/admin-dashboard";
pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_LOGIN_PATH: &str = "/admin-login";

// Keys the session is persisted under.
pub mod keys {
    pub const USER: &str = "user";
    pub const ROLE: &str = "userType";
    pub const TOKEN: &str = "token";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    // Written by older OTP flows; only ever cleared.
    pub const LEGACY_AUTH_TOKEN: &str = "authToken";

    pub const ALL: [&str; 5] = [USER, ROLE, TOKEN, REFRESH_TOKEN, LEGACY_AUTH_TOKEN];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Passenger,
    Driver,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Passenger, Role::Driver, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Passenger => "passenger",
            Role::Driver => "driver",
            Role::Admin => "admin",
        }
    }

    pub fn dashboard_path(self) -> &'static str {
        match self {
            Role::Passenger => PASSENGER_DASHBOARD,
            Role::Driver => DRIVER_DASHBOARD,
            Role::Admin => ADMIN_DASHBOARD,
        }
    }

    pub fn login_path(self) -> &'static str {
        match self {
            Role::Admin => ADMIN_LOGIN_PATH,
            Role::Passenger | Role::Driver => LOGIN_PATH,
        }
    }

    // Role name the backend uses in user records and registration payloads.
    pub fn backend_name(self) -> &'static str {
        match self {
            Role::Passenger => "USER",
            Role::Driver => "DRIVER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn from_backend(value: &str) -> Option<Role> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USER" | "PASSENGER" => Some(Role::Passenger),
            "DRIVER" => Some(Role::Driver),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "passenger" => Ok(Role::Passenger),
            "driver" => Ok(Role::Driver),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Identity record returned by the backend on login, OTP verification and
/// admin login. Fields the client does not model are kept in `extra` so the
/// record survives a persist/restore cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            email: None,
            phone_number: None,
            role: None,
            extra: Map::new(),
        }
    }

    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) if !last.is_empty() => format!("{first} {last}"),
            (Some(first), _) => first.to_string(),
            (None, _) => self.email.clone().unwrap_or_else(|| format!("user {}", self.id)),
        }
    }
}

// A complete session. Partial sessions are never handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: UserRecord,
    pub role: Role,
    pub token: String,
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn redirect_target(&self) -> &'static str {
        self.role.dashboard_path()
    }
}

/// Maps a role name to the dashboard the user lands on after sign-in.
///
/// Unrecognised names fall back to the passenger dashboard and log a warning;
/// they never resolve to the admin dashboard.
pub fn redirect_target_for(role: &str) -> &'static str {
    match role.parse::<Role>() {
        Ok(role) => role.dashboard_path(),
        Err(err) => {
            tracing::warn!(%err, "unrecognised role, using passenger dashboard.");
            PASSENGER_DASHBOARD
        }
    }
}
