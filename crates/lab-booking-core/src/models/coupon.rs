//! Coupon models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::money;

/// A coupon as listed by the coupons endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponRef {
    pub id: i64,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    /// "percent" or "flat"; informational only, the server computes the discount
    #[serde(default)]
    pub discount_type: Option<String>,
}

impl CouponRef {
    pub fn new(id: i64, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            description: None,
            discount_type: None,
        }
    }
}

/// Request body for coupon validation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CouponValidationRequest {
    pub coupon_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_total: Decimal,
}

/// Server verdict on a coupon for a given order value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponValidation {
    pub valid: bool,
    #[serde(default, deserialize_with = "money::lenient")]
    pub discount: Decimal,
    #[serde(default)]
    pub message: Option<String>,
}

impl CouponValidation {
    pub fn accepted(discount: Decimal) -> Self {
        Self {
            valid: true,
            discount,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            discount: Decimal::ZERO,
            message: Some(message.into()),
        }
    }
}
