use serde::Serialize;

use crate::domain::errors::ValidationError;
use crate::domain::validation::{limit_chars, require_id};

pub const MAX_COMMENT_CHARS: usize = 500;

// Body of `POST /ratings/passenger/{passengerId}` and `PUT /ratings/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub driver_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<u64>,
}

impl RatingRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::new("rating", "Rating must be between 1 and 5 stars"));
        }
        if let Some(comment) = &self.comment {
            limit_chars("comment", comment, "Comment", MAX_COMMENT_CHARS)?;
        }
        require_id("driver_id", self.driver_id, "Driver ID")?;
        Ok(())
    }
}

// Zero-based page request for paged rating listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: 10 }
    }
}

impl PageRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=100).contains(&self.size) {
            return Err(ValidationError::new("size", "Page size must be between 1 and 100"));
        }
        Ok(())
    }
}
