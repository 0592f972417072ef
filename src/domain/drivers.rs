use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;
use crate::domain::validation::require_text;

pub const MIN_CAR_YEAR: i32 = 1900;
pub const MAX_CAR_YEAR: i32 = 2030;

// Driver detail record submitted for admin verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDetails {
    pub license_number: String,
    pub license_expiry_date: NaiveDate,
    pub car_number: String,
    pub car_model: String,
    pub car_color: String,
    pub car_year: i32,
    pub insurance_number: String,
    pub insurance_expiry_date: NaiveDate,
}

impl DriverDetails {
    // Returns a trimmed copy that satisfies the backend's field constraints.
    pub fn validated(&self, today: NaiveDate) -> Result<DriverDetails, ValidationError> {
        let license_number =
            require_text("license_number", &self.license_number, "License number", 50)?;
        if self.license_expiry_date < today {
            return Err(ValidationError::new(
                "license_expiry_date",
                "License expiry date cannot be in the past",
            ));
        }
        let car_number = require_text("car_number", &self.car_number, "Car number", 20)?;
        let car_model = require_text("car_model", &self.car_model, "Car model", 100)?;
        let car_color = require_text("car_color", &self.car_color, "Car color", 30)?;
        if !(MIN_CAR_YEAR..=MAX_CAR_YEAR).contains(&self.car_year) {
            return Err(ValidationError::new(
                "car_year",
                format!("Car year must be between {MIN_CAR_YEAR} and {MAX_CAR_YEAR}"),
            ));
        }
        let insurance_number =
            require_text("insurance_number", &self.insurance_number, "Insurance number", 50)?;
        if self.insurance_expiry_date < today {
            return Err(ValidationError::new(
                "insurance_expiry_date",
                "Insurance expiry date cannot be in the past",
            ));
        }

        Ok(DriverDetails {
            license_number,
            license_expiry_date: self.license_expiry_date,
            car_number,
            car_model,
            car_color,
            car_year: self.car_year,
            insurance_number,
            insurance_expiry_date: self.insurance_expiry_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
    }

    fn details() -> DriverDetails {
        DriverDetails {
            license_number: "WB-0120230001".to_string(),
            license_expiry_date: date(2030, 1, 1),
            car_number: " WB02AB1234 ".to_string(),
            car_model: "Swift".to_string(),
            car_color: "White".to_string(),
            car_year: 2021,
            insurance_number: "INS-77".to_string(),
            insurance_expiry_date: date(2027, 6, 30),
        }
    }

    #[test]
    fn when_details_are_valid_then_serialize_with_backend_field_names() {
        let valid = details().validated(date(2026, 1, 1)).expect("expected valid details");
        let body = serde_json::to_value(&valid).expect("expected json");

        assert_eq!(body["carNumber"], json!("WB02AB1234"));
        assert_eq!(body["licenseExpiryDate"], json!("2030-01-01"));
    }

    #[test]
    fn when_expiry_is_today_then_is_accepted() {
        let today = date(2027, 6, 30);

        assert!(details().validated(today).is_ok());
    }

    #[test]
    fn when_insurance_has_expired_then_fails() {
        let err = details()
            .validated(date(2027, 7, 1))
            .expect_err("expected expired insurance to fail");

        assert_eq!(err.field, "insurance_expiry_date");
    }

    #[test]
    fn when_car_year_is_out_of_range_then_fails() {
        let err = DriverDetails {
            car_year: 1899,
            ..details()
        }
        .validated(date(2026, 1, 1))
        .expect_err("expected car year to fail");

        assert_eq!(err.field, "car_year");
    }
}
