use serde::Serialize;

use crate::domain::errors::ValidationError;
use crate::domain::validation::{is_phone_number, limit_chars, require_id, require_text};

pub const MAX_SEATS_PER_BOOKING: u32 = 4;

// Seats requested through `POST /rides/{id}/booking?seatsToBook=N`.
pub fn check_seats_to_book(ride_id: u64, seats: u32) -> Result<(), ValidationError> {
    require_id("ride_id", ride_id, "Ride ID")?;
    if seats < 1 {
        return Err(ValidationError::new("seats", "Must book at least 1 seat"));
    }
    Ok(())
}

// Booking form for the `/bookings` endpoint, which carries passenger details.
#[derive(Debug, Clone)]
pub struct BookingForm {
    pub ride_id: u64,
    pub seats: u32,
    pub passenger_name: String,
    pub passenger_phone: String,
    pub pickup_point: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub ride_id: u64,
    pub seats_booked: u32,
    pub passenger_name: String,
    pub passenger_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_point: Option<String>,
}

impl BookingForm {
    pub fn into_request(self) -> Result<BookingRequest, ValidationError> {
        require_id("ride_id", self.ride_id, "Ride ID")?;
        if !(1..=MAX_SEATS_PER_BOOKING).contains(&self.seats) {
            return Err(ValidationError::new(
                "seats",
                format!("Seats per booking must be between 1 and {MAX_SEATS_PER_BOOKING}"),
            ));
        }
        let passenger_name =
            require_text("passenger_name", &self.passenger_name, "Passenger name", 100)?;
        let passenger_phone =
            require_text("passenger_phone", &self.passenger_phone, "Passenger phone", 16)?;
        if !is_phone_number(&passenger_phone) {
            return Err(ValidationError::new("passenger_phone", "Invalid phone number format"));
        }
        let pickup_point = match self.pickup_point.as_deref().map(str::trim) {
            Some(point) if !point.is_empty() => {
                limit_chars("pickup_point", point, "Pickup point", 200)?;
                Some(point.to_string())
            }
            _ => None,
        };

        Ok(BookingRequest {
            ride_id: self.ride_id,
            seats_booked: self.seats,
            passenger_name,
            passenger_phone,
            pickup_point,
        })
    }
}
