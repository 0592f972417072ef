use serde_json::json;

use crate::domain::errors::ApiError;
use crate::domain::rides::{FareQuote, FareRequest, RideDraft, RideSearch, RideStatus};
use crate::domain::validation::require_id;
use crate::interface_adapters::api::with_query;
use crate::interface_adapters::gateway::{ApiGateway, CallOptions};
use crate::interface_adapters::response::NormalizedResponse;

impl ApiGateway {
    /// Posts a new ride.
    ///
    /// The draft is validated against the gateway clock first; on any
    /// violation no request is made.
    #[tracing::instrument(name = "post_ride", skip_all)]
    pub async fn post_ride(&self, draft: &RideDraft) -> Result<NormalizedResponse, ApiError> {
        let ride = draft.validate(self.now())?;
        self.call("/rides", CallOptions::post().json(&ride)?).await
    }

    pub async fn my_rides(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/rides/my-rides", CallOptions::get()).await
    }

    pub async fn my_upcoming_rides(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/rides/my-rides/upcoming", CallOptions::get())
            .await
    }

    pub async fn ride(&self, ride_id: u64) -> Result<NormalizedResponse, ApiError> {
        let ride_id = require_id("ride_id", ride_id, "Ride ID")?;
        self.call(&format!("/rides/{ride_id}"), CallOptions::get())
            .await
    }

    pub async fn ride_bookings(&self, ride_id: u64) -> Result<NormalizedResponse, ApiError> {
        let ride_id = require_id("ride_id", ride_id, "Ride ID")?;
        self.call(&format!("/rides/{ride_id}/bookings"), CallOptions::get())
            .await
    }

    // Search does not require authentication, though a current token is still
    // attached. An empty filter posts `{}` and returns every ride.
    pub async fn search_rides(&self, search: &RideSearch) -> Result<NormalizedResponse, ApiError> {
        search.validate()?;
        let payload = if search.is_empty() {
            json!({})
        } else {
            search.to_payload()
        };
        self.call("/rides/search", CallOptions::post().json(&payload)?)
            .await
    }

    pub async fn all_rides(&self) -> Result<NormalizedResponse, ApiError> {
        self.search_rides(&RideSearch::default()).await
    }

    pub async fn update_ride_status(
        &self,
        ride_id: u64,
        status: RideStatus,
    ) -> Result<NormalizedResponse, ApiError> {
        let ride_id = require_id("ride_id", ride_id, "Ride ID")?;
        let path = with_query(
            &format!("/rides/{ride_id}/status"),
            [("status", status.as_str().to_string())],
        );
        self.call(&path, CallOptions::put()).await
    }

    pub async fn delete_ride(&self, ride_id: u64) -> Result<NormalizedResponse, ApiError> {
        let ride_id = require_id("ride_id", ride_id, "Ride ID")?;
        self.call(&format!("/rides/{ride_id}"), CallOptions::delete())
            .await
    }

    pub async fn cancel_ride(&self, ride_id: u64) -> Result<NormalizedResponse, ApiError> {
        self.transition_ride(ride_id, "cancel").await
    }

    pub async fn complete_ride(&self, ride_id: u64) -> Result<NormalizedResponse, ApiError> {
        self.transition_ride(ride_id, "complete").await
    }

    pub async fn activate_ride(&self, ride_id: u64) -> Result<NormalizedResponse, ApiError> {
        self.transition_ride(ride_id, "activate").await
    }

    async fn transition_ride(&self, ride_id: u64, action: &str) -> Result<NormalizedResponse, ApiError> {
        let ride_id = require_id("ride_id", ride_id, "Ride ID")?;
        tracing::info!(ride_id, action, "changing ride status.");
        self.call(&format!("/rides/{ride_id}/{action}"), CallOptions::put())
            .await
    }

    pub async fn calculate_fare(&self, source: &str, destination: &str) -> Result<FareQuote, ApiError> {
        let request = FareRequest::new(source, destination)?;
        let response = self
            .call("/rides/calculate-fare", CallOptions::post().json(&request)?)
            .await?;
        Ok(response.data_as()?)
    }
}
