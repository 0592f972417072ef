use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::errors::ValidationError;
use crate::domain::validation::{limit_chars, require_text};

pub const MAX_LOCATION_CHARS: usize = 100;
pub const MAX_NOTES_CHARS: usize = 500;
pub const MIN_SEATS: i64 = 1;
pub const MAX_SEATS: i64 = 8;
pub const MAX_PRICE_PER_SEAT: f64 = 10_000.0;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DEPARTURE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// Ride as entered on the posting form, before any checks.
#[derive(Debug, Clone, Default)]
pub struct RideDraft {
    pub source: String,
    pub destination: String,
    // YYYY-MM-DD
    pub date: String,
    // HH:MM
    pub time: String,
    pub seats: i64,
    pub price: f64,
    pub notes: Option<String>,
}

// Body of `POST /rides`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RidePost {
    pub source: String,
    pub destination: String,
    pub departure_date: String,
    pub available_seats: u8,
    pub price_per_seat: f64,
    pub notes: String,
}

impl RideDraft {
    /// Checks the draft against the posting rules and builds the request body.
    ///
    /// Rules are applied in order and the first violation is returned:
    /// locations, departure (must be strictly after `now`), seats, price, notes.
    pub fn validate(&self, now: NaiveDateTime) -> Result<RidePost, ValidationError> {
        let source = require_text("source", &self.source, "Source location", MAX_LOCATION_CHARS)?;
        let destination = require_text(
            "destination",
            &self.destination,
            "Destination location",
            MAX_LOCATION_CHARS,
        )?;

        let departure = parse_departure(&self.date, &self.time)?;
        if departure <= now {
            return Err(ValidationError::new(
                "departure",
                "Departure date and time must be in the future",
            ));
        }

        if !(MIN_SEATS..=MAX_SEATS).contains(&self.seats) {
            return Err(ValidationError::new(
                "seats",
                format!("Available seats must be between {MIN_SEATS} and {MAX_SEATS}"),
            ));
        }

        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ValidationError::new(
                "price",
                "Price per seat must be greater than 0",
            ));
        }
        if self.price > MAX_PRICE_PER_SEAT {
            return Err(ValidationError::new(
                "price",
                "Price per seat cannot exceed 10000",
            ));
        }

        let notes = self.notes.as_deref().unwrap_or_default();
        limit_chars("notes", notes, "Notes", MAX_NOTES_CHARS)?;

        Ok(RidePost {
            source,
            destination,
            departure_date: departure.format(DEPARTURE_FORMAT).to_string(),
            available_seats: self.seats as u8,
            price_per_seat: self.price,
            notes: notes.trim().to_string(),
        })
    }
}

fn parse_departure(date: &str, time: &str) -> Result<NaiveDateTime, ValidationError> {
    let date = date.trim();
    let time = time.trim();
    if date.is_empty() {
        return Err(ValidationError::new("date", "Departure date is required"));
    }
    if time.is_empty() {
        return Err(ValidationError::new("time", "Departure time is required"));
    }

    let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| {
        ValidationError::new("date", "Departure date must be a valid date (YYYY-MM-DD)")
    })?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| ValidationError::new("time", "Departure time must be a valid time (HH:MM)"))?;

    Ok(date.and_time(time))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    Active,
    Cancelled,
    Completed,
}

impl RideStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RideStatus::Active => "ACTIVE",
            RideStatus::Cancelled => "CANCELLED",
            RideStatus::Completed => "COMPLETED",
        }
    }
}

/// Search filters. Every filter is optional and they combine with AND;
/// an empty search matches every ride.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RideSearch {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
    pub max_price: Option<f64>,
}

impl RideSearch {
    pub fn is_empty(&self) -> bool {
        non_blank(&self.source).is_none()
            && non_blank(&self.destination).is_none()
            && self.date.is_none()
            && self.max_price.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(price) = self.max_price {
            if !price.is_finite() || price <= 0.0 {
                return Err(ValidationError::new(
                    "max_price",
                    "Maximum price must be greater than 0",
                ));
            }
        }
        Ok(())
    }

    // Body of `POST /rides/search`. Missing text filters are sent as "".
    pub fn to_payload(&self) -> Value {
        json!({
            "source": non_blank(&self.source).unwrap_or_default(),
            "destination": non_blank(&self.destination).unwrap_or_default(),
            "departureDate": self
                .date
                .map(|date| format!("{}T00:00:00", date.format(DATE_FORMAT)))
                .unwrap_or_default(),
            "maxPrice": self.max_price,
        })
    }

    // Text-only match used when rides are filtered locally.
    pub fn matches(&self, ride: &Value) -> bool {
        if let Some(needle) = non_blank(&self.source) {
            if !field_contains(ride, "source", needle) {
                return false;
            }
        }
        if let Some(needle) = non_blank(&self.destination) {
            if !field_contains(ride, "destination", needle) {
                return false;
            }
        }
        if let Some(date) = self.date {
            let prefix = date.format(DATE_FORMAT).to_string();
            let departs_that_day = ride
                .get("departureDate")
                .and_then(Value::as_str)
                .is_some_and(|departure| departure.starts_with(&prefix));
            if !departs_that_day {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            let within_budget = ride
                .get("pricePerSeat")
                .and_then(Value::as_f64)
                .is_some_and(|price| price <= max_price);
            if !within_budget {
                return false;
            }
        }
        true
    }
}

pub fn filter_rides(rides: &[Value], search: &RideSearch) -> Vec<Value> {
    rides
        .iter()
        .filter(|ride| search.matches(ride))
        .cloned()
        .collect()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn field_contains(ride: &Value, field: &str, needle: &str) -> bool {
    ride.get(field)
        .and_then(Value::as_str)
        .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase()))
}

// Body of `POST /rides/calculate-fare`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FareRequest {
    pub source: String,
    pub destination: String,
}

impl FareRequest {
    pub fn new(source: &str, destination: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            source: require_text("source", source, "Source", MAX_LOCATION_CHARS)?,
            destination: require_text("destination", destination, "Destination", MAX_LOCATION_CHARS)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareQuote {
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub distance_text: Option<String>,
    #[serde(default)]
    pub duration_text: Option<String>,
    #[serde(default)]
    pub calculated_fare: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid fixture time")
    }

    fn draft() -> RideDraft {
        RideDraft {
            source: " Salt Lake ".to_string(),
            destination: "Howrah".to_string(),
            date: "2026-03-02".to_string(),
            time: "09:30".to_string(),
            seats: 3,
            price: 250.0,
            notes: Some("AC car".to_string()),
        }
    }

    #[test]
    fn when_draft_is_valid_then_builds_post_body() {
        let post = draft().validate(now()).expect("expected valid ride");

        assert_eq!(post.source, "Salt Lake");
        assert_eq!(post.departure_date, "2026-03-02T09:30:00");
        assert_eq!(post.available_seats, 3);
        assert_eq!(post.notes, "AC car");
    }

    #[test]
    fn when_seats_exceed_eight_then_error_mentions_seats() {
        let err = RideDraft { seats: 9, ..draft() }
            .validate(now())
            .expect_err("expected seat limit to fail");

        assert_eq!(err.field, "seats");
        assert!(err.message.contains("seats"));
    }

    #[test]
    fn when_price_is_zero_then_fails_on_price() {
        let err = RideDraft { price: 0.0, ..draft() }
            .validate(now())
            .expect_err("expected zero price to fail");

        assert_eq!(err.field, "price");
    }

    #[test]
    fn when_price_is_exactly_ten_thousand_then_passes() {
        assert!(RideDraft { price: 10_000.0, ..draft() }.validate(now()).is_ok());
        assert!(RideDraft { price: 10_000.01, ..draft() }.validate(now()).is_err());
    }

    #[test]
    fn when_departure_is_in_the_past_then_fails() {
        let err = RideDraft {
            date: "2026-03-01".to_string(),
            time: "11:59".to_string(),
            ..draft()
        }
        .validate(now())
        .expect_err("expected past departure to fail");

        assert_eq!(err.field, "departure");
    }

    #[test]
    fn when_departure_equals_now_then_fails() {
        let err = RideDraft {
            date: "2026-03-01".to_string(),
            time: "12:00".to_string(),
            ..draft()
        }
        .validate(now())
        .expect_err("expected departure at now to fail");

        assert_eq!(err.field, "departure");
    }

    #[test]
    fn when_several_rules_fail_then_first_in_order_is_reported() {
        let err = RideDraft {
            destination: "   ".to_string(),
            seats: 0,
            price: -1.0,
            ..draft()
        }
        .validate(now())
        .expect_err("expected validation to fail");

        assert_eq!(err.field, "destination");
    }

    #[test]
    fn when_source_exceeds_limit_then_fails() {
        let err = RideDraft {
            source: "x".repeat(101),
            ..draft()
        }
        .validate(now())
        .expect_err("expected long source to fail");

        assert_eq!(err.message, "Source location must not exceed 100 characters");
    }

    #[test]
    fn when_notes_exceed_limit_then_fails_last() {
        let err = RideDraft {
            notes: Some("n".repeat(501)),
            ..draft()
        }
        .validate(now())
        .expect_err("expected long notes to fail");

        assert_eq!(err.field, "notes");
    }

    #[test]
    fn when_time_is_missing_then_fails_on_time() {
        let err = RideDraft {
            time: String::new(),
            ..draft()
        }
        .validate(now())
        .expect_err("expected missing time to fail");

        assert_eq!(err.message, "Departure time is required");
    }

    #[test]
    fn when_search_is_empty_then_matches_every_ride() {
        let rides = vec![
            json!({"source": "Salt Lake", "destination": "Howrah", "pricePerSeat": 200}),
            json!({"source": "Dum Dum", "destination": "Park Street"}),
        ];

        assert!(RideSearch::default().is_empty());
        assert_eq!(filter_rides(&rides, &RideSearch::default()), rides);
    }

    #[test]
    fn when_filters_combine_then_all_must_match() {
        let rides = vec![
            json!({"source": "Salt Lake Sector V", "destination": "Howrah", "departureDate": "2026-03-02T09:30:00", "pricePerSeat": 200}),
            json!({"source": "Salt Lake", "destination": "Howrah", "departureDate": "2026-03-03T09:30:00", "pricePerSeat": 200}),
            json!({"source": "salt lake", "destination": "Howrah", "departureDate": "2026-03-02T18:00:00", "pricePerSeat": 900}),
        ];
        let search = RideSearch {
            source: Some("SALT".to_string()),
            destination: None,
            date: NaiveDate::from_ymd_opt(2026, 3, 2),
            max_price: Some(500.0),
        };

        let found = filter_rides(&rides, &search);

        assert_eq!(found, vec![rides[0].clone()]);
    }

    #[test]
    fn when_search_has_only_date_then_payload_uses_midnight_and_blank_text() {
        let search = RideSearch {
            date: NaiveDate::from_ymd_opt(2026, 3, 2),
            ..Default::default()
        };

        assert_eq!(
            search.to_payload(),
            json!({"source": "", "destination": "", "departureDate": "2026-03-02T00:00:00", "maxPrice": null})
        );
    }

    #[test]
    fn when_max_price_is_negative_then_search_is_invalid() {
        let search = RideSearch {
            max_price: Some(-5.0),
            ..Default::default()
        };

        assert!(search.validate().is_err());
    }
}
