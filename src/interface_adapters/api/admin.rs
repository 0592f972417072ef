use crate::domain::errors::ApiError;
use crate::domain::validation::require_id;
use crate::interface_adapters::api::with_query;
use crate::interface_adapters::gateway::{ApiGateway, CallOptions};
use crate::interface_adapters::response::NormalizedResponse;

impl ApiGateway {
    pub async fn admin_profile(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/admin/profile", CallOptions::get()).await
    }

    pub async fn pending_drivers(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/admin/drivers/pending", CallOptions::get()).await
    }

    pub async fn all_drivers(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/admin/drivers", CallOptions::get()).await
    }

    pub async fn drivers_with_ratings(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/admin/drivers-with-ratings", CallOptions::get())
            .await
    }

    pub async fn all_users(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/admin/users", CallOptions::get()).await
    }

    pub async fn verify_driver(&self, driver_detail_id: u64) -> Result<NormalizedResponse, ApiError> {
        self.review_driver(driver_detail_id, "verify").await
    }

    pub async fn reject_driver(&self, driver_detail_id: u64) -> Result<NormalizedResponse, ApiError> {
        self.review_driver(driver_detail_id, "reject").await
    }

    // Sets the verification flag directly instead of going through review.
    pub async fn set_driver_verified(
        &self,
        driver_detail_id: u64,
        verified: bool,
    ) -> Result<NormalizedResponse, ApiError> {
        let id = require_id("driver_detail_id", driver_detail_id, "Driver detail ID")?;
        let path = with_query(
            &format!("/driver/verify/{id}"),
            [("verified", verified.to_string())],
        );
        self.call(&path, CallOptions::put()).await
    }

    async fn review_driver(&self, driver_detail_id: u64, action: &str) -> Result<NormalizedResponse, ApiError> {
        let id = require_id("driver_detail_id", driver_detail_id, "Driver detail ID")?;
        tracing::info!(driver_detail_id = id, action, "reviewing driver.");
        self.call(&format!("/admin/drivers/{id}/{action}"), CallOptions::put())
            .await
    }
}
