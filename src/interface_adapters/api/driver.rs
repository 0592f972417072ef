use crate::domain::drivers::DriverDetails;
use crate::domain::errors::ApiError;
use crate::interface_adapters::gateway::{ApiGateway, CallOptions};
use crate::interface_adapters::response::NormalizedResponse;

impl ApiGateway {
    // Expiry dates are checked against the gateway clock's date.
    pub async fn submit_driver_details(
        &self,
        details: &DriverDetails,
    ) -> Result<NormalizedResponse, ApiError> {
        let details = details.validated(self.now().date())?;
        self.call("/driver/details", CallOptions::post().json(&details)?)
            .await
    }

    pub async fn update_driver_details(
        &self,
        details: &DriverDetails,
    ) -> Result<NormalizedResponse, ApiError> {
        let details = details.validated(self.now().date())?;
        self.call("/driver/details", CallOptions::put().json(&details)?)
            .await
    }

    pub async fn driver_details(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/driver/details", CallOptions::get()).await
    }
}
