//! Collaborator seams: coupon validation and booking submission.
//!
//! The engine never talks to the network itself. Hosts plug in an HTTP
//! implementation (see the `lab-booking-api` crate) or the mock below.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{BookingRecord, CouponValidation};
use crate::payload::{BookingPayload, OperationPayload};
use crate::pricing::money;

/// Failures reported by a remote collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Rejected by server: {0}")]
    Rejected(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// Message the server itself supplied, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ServiceError::Rejected(msg) if !msg.trim().is_empty() => Some(msg.as_str()),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Validates a coupon code against an order's base total.
pub trait CouponValidator {
    fn validate_coupon(&self, code: &str, base_total: Decimal) -> ServiceResult<CouponValidation>;
}

/// Sends booking bodies to the server.
pub trait BookingGateway {
    /// `POST` a new booking.
    fn create_booking(&self, payload: &BookingPayload) -> ServiceResult<BookingRecord>;

    /// `PATCH` an existing booking.
    fn update_booking(
        &self,
        booking_id: &str,
        payload: &BookingPayload,
    ) -> ServiceResult<BookingRecord>;

    /// `PATCH` a status/payment/schedule operation onto a booking.
    fn apply_operation(
        &self,
        booking_id: &str,
        payload: &OperationPayload,
    ) -> ServiceResult<BookingRecord>;
}

#[derive(Debug, Clone)]
enum MockRule {
    Flat(Decimal),
    Percent(Decimal),
}

/// In-memory coupon validator for tests and offline hosts.
#[derive(Debug, Clone, Default)]
pub struct MockCouponValidator {
    rules: HashMap<String, MockRule>,
    failure: Option<ServiceError>,
}

impl MockCouponValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `code` with a flat discount.
    pub fn with_flat(mut self, code: &str, amount: Decimal) -> Self {
        self.rules.insert(code.to_uppercase(), MockRule::Flat(amount));
        self
    }

    /// Accept `code` with a percentage of the base total.
    pub fn with_percent(mut self, code: &str, percent: Decimal) -> Self {
        self.rules
            .insert(code.to_uppercase(), MockRule::Percent(percent));
        self
    }

    /// Fail every call with `error`.
    pub fn failing(mut self, error: ServiceError) -> Self {
        self.failure = Some(error);
        self
    }
}

impl CouponValidator for MockCouponValidator {
    fn validate_coupon(&self, code: &str, base_total: Decimal) -> ServiceResult<CouponValidation> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let validation = match self.rules.get(&code.to_uppercase()) {
            Some(MockRule::Flat(amount)) => CouponValidation::accepted(*amount),
            Some(MockRule::Percent(percent)) => CouponValidation::accepted(money::round_money(
                base_total * *percent / Decimal::ONE_HUNDRED,
            )),
            None => CouponValidation::rejected("Invalid coupon code."),
        };
        Ok(validation)
    }
}
