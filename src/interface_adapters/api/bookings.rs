use crate::domain::bookings::{BookingForm, check_seats_to_book};
use crate::domain::errors::ApiError;
use crate::domain::validation::require_id;
use crate::interface_adapters::api::with_query;
use crate::interface_adapters::gateway::{ApiGateway, CallOptions};
use crate::interface_adapters::response::NormalizedResponse;

impl ApiGateway {
    pub async fn create_booking(&self, ride_id: u64, seats: u32) -> Result<NormalizedResponse, ApiError> {
        check_seats_to_book(ride_id, seats)?;
        let path = with_query(
            &format!("/rides/{ride_id}/booking"),
            [("seatsToBook", seats.to_string())],
        );
        self.call(&path, CallOptions::post()).await
    }

    // Booking with passenger details in the body.
    pub async fn book_ride(&self, form: BookingForm) -> Result<NormalizedResponse, ApiError> {
        let request = form.into_request()?;
        self.call("/bookings", CallOptions::post().json(&request)?)
            .await
    }

    pub async fn my_bookings(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/bookings/my-bookings", CallOptions::get()).await
    }

    pub async fn my_upcoming_bookings(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/bookings/my-bookings/upcoming", CallOptions::get())
            .await
    }

    // Bookings on rides the caller drives.
    pub async fn driver_bookings(&self) -> Result<NormalizedResponse, ApiError> {
        self.call("/bookings/driver-bookings", CallOptions::get())
            .await
    }

    pub async fn cancel_booking(&self, booking_id: u64) -> Result<NormalizedResponse, ApiError> {
        let booking_id = require_id("booking_id", booking_id, "Booking ID")?;
        self.call(&format!("/bookings/{booking_id}/cancel"), CallOptions::put())
            .await
    }

    pub async fn driver_cancel_booking(
        &self,
        ride_id: u64,
        booking_id: u64,
    ) -> Result<NormalizedResponse, ApiError> {
        self.driver_booking_action(ride_id, booking_id, "cancel").await
    }

    pub async fn confirm_booking(
        &self,
        ride_id: u64,
        booking_id: u64,
    ) -> Result<NormalizedResponse, ApiError> {
        self.driver_booking_action(ride_id, booking_id, "confirm").await
    }

    async fn driver_booking_action(
        &self,
        ride_id: u64,
        booking_id: u64,
        action: &str,
    ) -> Result<NormalizedResponse, ApiError> {
        let ride_id = require_id("ride_id", ride_id, "Ride ID")?;
        let booking_id = require_id("booking_id", booking_id, "Booking ID")?;
        self.call(
            &format!("/rides/{ride_id}/bookings/{booking_id}/{action}"),
            CallOptions::put(),
        )
        .await
    }
}
