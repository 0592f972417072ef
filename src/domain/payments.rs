use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;
use crate::domain::validation::require_id;

// Body of `POST /payments/create-order`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrderRequest {
    pub booking_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
}

impl PaymentOrderRequest {
    pub fn for_booking(booking_id: u64) -> Self {
        Self {
            booking_id,
            notes: None,
            customer_email: None,
            customer_phone: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id("booking_id", self.booking_id, "Booking ID").map(|_| ())
    }
}

/// Order descriptor handed to the checkout widget, taken from the `data`
/// member of the create-order response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOrder {
    pub key_id: String,
    pub amount: f64,
    pub currency: String,
    pub order_id: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub booking_id: Option<u64>,
    #[serde(default)]
    pub payment_id: Option<u64>,
}

// Callback payload from the checkout widget on success. Field names are the widget's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSuccess {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    #[serde(default, rename = "method", skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

// Body of `POST /payments/verify`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub payment_method: String,
    pub gateway_response: String,
}

impl CheckoutSuccess {
    pub fn into_verification(self) -> Result<PaymentVerification, ValidationError> {
        for (field, value, label) in [
            ("razorpay_order_id", &self.razorpay_order_id, "Razorpay order ID"),
            ("razorpay_payment_id", &self.razorpay_payment_id, "Razorpay payment ID"),
            ("razorpay_signature", &self.razorpay_signature, "Razorpay signature"),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::new(field, format!("{label} is required")));
            }
        }

        // The backend keeps the raw callback for auditing.
        let gateway_response = serde_json::to_string(&self)
            .map_err(|err| ValidationError::new("gateway_response", err.to_string()))?;

        Ok(PaymentVerification {
            razorpay_order_id: self.razorpay_order_id,
            razorpay_payment_id: self.razorpay_payment_id,
            razorpay_signature: self.razorpay_signature,
            payment_method: self.payment_method.unwrap_or_else(|| "unknown".to_string()),
            gateway_response,
        })
    }
}

// Failure report forwarded to `POST /payments/failure` unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentFailure {
    pub razorpay_order_id: String,
    pub reason: String,
}
