use crate::domain::errors::ApiError;
use crate::domain::users::ProfileUpdate;
use crate::domain::validation::require_id;
use crate::interface_adapters::gateway::{ApiGateway, CallOptions};
use crate::interface_adapters::response::NormalizedResponse;

impl ApiGateway {
    pub async fn profile(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/users/profile", CallOptions::get()).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<NormalizedResponse, ApiError> {
        update.validate()?;
        self.call("/users/profile", CallOptions::put().json(update)?)
            .await
    }

    pub async fn admin_user(&self, user_id: u64) -> Result<NormalizedResponse, ApiError> {
        let user_id = require_id("user_id", user_id, "User ID")?;
        self.call(&format!("/admin/users/{user_id}"), CallOptions::get())
            .await
    }

    pub async fn admin_delete_user(&self, user_id: u64) -> Result<NormalizedResponse, ApiError> {
        let user_id = require_id("user_id", user_id, "User ID")?;
        tracing::info!(user_id, "deleting user.");
        self.call(&format!("/admin/users/{user_id}"), CallOptions::delete())
            .await
    }
}
