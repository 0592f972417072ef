use crate::domain::errors::ApiError;
use crate::domain::ratings::{PageRequest, RatingRequest};
use crate::domain::validation::require_id;
use crate::interface_adapters::api::with_query;
use crate::interface_adapters::gateway::{ApiGateway, CallOptions};
use crate::interface_adapters::response::NormalizedResponse;

impl ApiGateway {
    // A passenger rates the driver of a ride they took.
    pub async fn rate_driver(
        &self,
        passenger_id: u64,
        rating: &RatingRequest,
    ) -> Result<NormalizedResponse, ApiError> {
        let passenger_id = require_id("passenger_id", passenger_id, "Passenger ID")?;
        rating.validate()?;
        self.call(
            &format!("/ratings/passenger/{passenger_id}"),
            CallOptions::post().json(rating)?,
        )
        .await
    }

    pub async fn update_rating(
        &self,
        rating_id: u64,
        rating: &RatingRequest,
    ) -> Result<NormalizedResponse, ApiError> {
        let rating_id = require_id("rating_id", rating_id, "Rating ID")?;
        rating.validate()?;
        self.call(&format!("/ratings/{rating_id}"), CallOptions::put().json(rating)?)
            .await
    }

    pub async fn delete_rating(&self, rating_id: u64) -> Result<NormalizedResponse, ApiError> {
        let rating_id = require_id("rating_id", rating_id, "Rating ID")?;
        self.call(&format!("/ratings/{rating_id}"), CallOptions::delete())
            .await
    }

    pub async fn rating(&self, rating_id: u64) -> Result<NormalizedResponse, ApiError> {
        let rating_id = require_id("rating_id", rating_id, "Rating ID")?;
        self.call(&format!("/ratings/{rating_id}"), CallOptions::get())
            .await
    }

    pub async fn driver_ratings(&self, driver_id: u64) -> Result<NormalizedResponse, ApiError> {
        self.driver_rating_view(driver_id, "").await
    }

    pub async fn driver_rating_summary(&self, driver_id: u64) -> Result<NormalizedResponse, ApiError> {
        self.driver_rating_view(driver_id, "/summary").await
    }

    pub async fn driver_rating_comments(&self, driver_id: u64) -> Result<NormalizedResponse, ApiError> {
        self.driver_rating_view(driver_id, "/comments").await
    }

    pub async fn driver_ratings_page(
        &self,
        driver_id: u64,
        page: PageRequest,
    ) -> Result<NormalizedResponse, ApiError> {
        let driver_id = require_id("driver_id", driver_id, "Driver ID")?;
        page.validate()?;
        let path = with_query(
            &format!("/ratings/driver/{driver_id}/paginated"),
            page_pairs(page),
        );
        self.call(&path, CallOptions::get()).await
    }

    pub async fn passenger_ratings(&self, passenger_id: u64) -> Result<NormalizedResponse, ApiError> {
        let passenger_id = require_id("passenger_id", passenger_id, "Passenger ID")?;
        self.call(&format!("/ratings/passenger/{passenger_id}"), CallOptions::get())
            .await
    }

    pub async fn all_ratings(&self, page: PageRequest) -> Result<NormalizedResponse, ApiError> {
        page.validate()?;
        let path = with_query("/ratings/admin/all", page_pairs(page));
        self.call(&path, CallOptions::get()).await
    }

    async fn driver_rating_view(&self, driver_id: u64, suffix: &str) -> Result<NormalizedResponse, ApiError> {
        let driver_id = require_id("driver_id", driver_id, "Driver ID")?;
        self.call(&format!("/ratings/driver/{driver_id}{suffix}"), CallOptions::get())
            .await
    }
}

fn page_pairs(page: PageRequest) -> [(&'static str, String); 2] {
    [("page", page.page.to_string()), ("size", page.size.to_string())]
}
