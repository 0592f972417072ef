use serde::Serialize;

use crate::domain::errors::ValidationError;
use crate::domain::validation::{is_phone_number, limit_chars};

// Body of `PUT /users/profile`. Absent fields are left unchanged by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(first_name) = &self.first_name {
            if first_name.trim().is_empty() {
                return Err(ValidationError::new("first_name", "First name cannot be blank"));
            }
            limit_chars("first_name", first_name, "First name", 50)?;
        }
        if let Some(last_name) = &self.last_name {
            limit_chars("last_name", last_name, "Last name", 50)?;
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ValidationError::new("email", "Email address is invalid"));
            }
        }
        if let Some(phone) = &self.phone_number {
            if !is_phone_number(phone) {
                return Err(ValidationError::new("phone_number", "Invalid phone number format"));
            }
        }
        Ok(())
    }
}
