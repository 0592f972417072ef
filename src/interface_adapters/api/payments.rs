use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::watch;

use crate::domain::errors::{ApiError, ValidationError};
use crate::domain::payments::{CheckoutOrder, CheckoutSuccess, PaymentFailure, PaymentOrderRequest};
use crate::domain::session::Role;
use crate::domain::validation::require_id;
use crate::interface_adapters::api::with_query;
use crate::interface_adapters::gateway::{ApiGateway, CallOptions};
use crate::interface_adapters::response::NormalizedResponse;
use crate::use_cases::polling::{PollHandle, spawn_poller};

// Latest result published by a watcher. `None` until the first fetch finishes.
pub type PollUpdate = Option<Result<NormalizedResponse, ApiError>>;

impl ApiGateway {
    /// Creates a checkout order for a booking and returns the descriptor the
    /// checkout widget needs.
    pub async fn create_payment_order(
        &self,
        request: &PaymentOrderRequest,
    ) -> Result<CheckoutOrder, ApiError> {
        request.validate()?;
        let response = self
            .call("/payments/create-order", CallOptions::post().json(request)?)
            .await?;
        Ok(response.data_as()?)
    }

    pub async fn verify_payment(&self, callback: CheckoutSuccess) -> Result<NormalizedResponse, ApiError> {
        let verification = callback.into_verification()?;
        self.call("/payments/verify", CallOptions::post().json(&verification)?)
            .await
    }

    pub async fn report_payment_failure(
        &self,
        failure: &PaymentFailure,
    ) -> Result<NormalizedResponse, ApiError> {
        tracing::warn!(order_id = %failure.razorpay_order_id, reason = %failure.reason, "payment failed.");
        self.call("/payments/failure", CallOptions::post().json(failure)?)
            .await
    }

    // Drivers see earnings, passengers see spending. Admins have no history of their own.
    pub async fn payment_history(&self, user_id: u64, role: Role) -> Result<NormalizedResponse, ApiError> {
        let user_id = require_id("user_id", user_id, "User ID")?;
        let path = match role {
            Role::Driver => format!("/payments/history/driver/{user_id}"),
            Role::Passenger => format!("/payments/history/passenger/{user_id}"),
            Role::Admin => {
                return Err(ValidationError::new(
                    "role",
                    "Payment history is only available for drivers and passengers",
                )
                .into());
            }
        };
        self.call(&path, CallOptions::get()).await
    }

    pub async fn payment_history_between(
        &self,
        user_id: u64,
        is_driver: bool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<NormalizedResponse, ApiError> {
        let user_id = require_id("user_id", user_id, "User ID")?;
        if end < start {
            return Err(ValidationError::new("end_date", "End date must not be before start date").into());
        }
        let path = with_query(
            &format!("/payments/history/{user_id}"),
            [
                ("isDriver", is_driver.to_string()),
                ("startDate", start.to_rfc3339_opts(SecondsFormat::Millis, true)),
                ("endDate", end.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ],
        );
        self.call(&path, CallOptions::get()).await
    }

    pub async fn release_payment(&self, booking_id: u64) -> Result<NormalizedResponse, ApiError> {
        let booking_id = require_id("booking_id", booking_id, "Booking ID")?;
        tracing::info!(booking_id, "releasing payment to driver.");
        self.call(&format!("/payments/release/{booking_id}"), CallOptions::post())
            .await
    }

    pub async fn earnings(&self, driver_id: u64) -> Result<NormalizedResponse, ApiError> {
        let driver_id = require_id("driver_id", driver_id, "Driver ID")?;
        self.call(&format!("/payments/earnings/{driver_id}"), CallOptions::get())
            .await
    }

    pub async fn spending(&self, passenger_id: u64) -> Result<NormalizedResponse, ApiError> {
        let passenger_id = require_id("passenger_id", passenger_id, "Passenger ID")?;
        self.call(&format!("/payments/spending/{passenger_id}"), CallOptions::get())
            .await
    }

    /// Refreshes a driver's earnings every `period` until the handle is
    /// dropped or stopped.
    pub fn watch_earnings(
        &self,
        driver_id: u64,
        period: Duration,
    ) -> (PollHandle, watch::Receiver<PollUpdate>) {
        self.watch_with(period, move |gateway| async move {
            gateway.earnings(driver_id).await
        })
    }

    pub fn watch_payment_history(
        &self,
        user_id: u64,
        role: Role,
        period: Duration,
    ) -> (PollHandle, watch::Receiver<PollUpdate>) {
        self.watch_with(period, move |gateway| async move {
            gateway.payment_history(user_id, role).await
        })
    }

    fn watch_with<F, Fut>(&self, period: Duration, fetch: F) -> (PollHandle, watch::Receiver<PollUpdate>)
    where
        F: Fn(ApiGateway) -> Fut + Send + 'static,
        Fut: Future<Output = Result<NormalizedResponse, ApiError>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);
        let gateway = self.clone();
        let handle = spawn_poller(period, move || {
            let pending = fetch(gateway.clone());
            let tx = Arc::clone(&tx);
            async move {
                let result = pending.await;
                if let Err(err) = &result {
                    tracing::warn!(error = %err, "poll fetch failed.");
                }
                tx.send_replace(Some(result));
            }
        });
        (handle, rx)
    }
}
