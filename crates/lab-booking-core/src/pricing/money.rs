//! Money helpers.
//!
//! Amounts arrive from the API as JSON strings (`"500.00"`), numbers, `null`
//! or not at all. Everything is coerced into `Decimal`; anything that cannot be
//! read as a number counts as zero. Amounts above [`MAX_AMOUNT`] are rejected.

use std::str::FromStr;

use rust_decimal::prelude::*;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Rounding precision for monetary values (2 decimal places, half-up).
const DECIMAL_PLACES: u32 = 2;

/// Largest accepted magnitude for a single amount (₹1,000,000,000).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// An amount that cannot be priced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} exceeds maximum allowed ({max}), got {value}", max = MAX_AMOUNT)]
    OutOfRange { field: &'static str, value: String },
}

/// Reject amounts whose magnitude exceeds [`MAX_AMOUNT`].
pub fn require_in_range(value: Decimal, field: &'static str) -> Result<Decimal, AmountError> {
    if value.abs() > MAX_AMOUNT {
        return Err(AmountError::OutOfRange {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// Strict f64 conversion for caller-supplied amounts.
pub fn checked_amount(value: f64, field: &'static str) -> Result<Decimal, AmountError> {
    if !value.is_finite() {
        return Err(AmountError::NotFinite { field, value });
    }
    if value.abs() > MAX_AMOUNT.to_f64().unwrap_or(f64::MAX) {
        return Err(AmountError::OutOfRange {
            field,
            value: value.to_string(),
        });
    }
    require_in_range(to_decimal(value), field)
}

/// Currency symbol used in human-readable change descriptions.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Convert f64 to Decimal via its shortest decimal representation.
///
/// NaN, infinities and values beyond `Decimal`'s range become zero.
/// Use [`checked_amount`] where such input must be rejected instead.
pub fn to_decimal(value: f64) -> Decimal {
    if !value.is_finite() {
        tracing::warn!(value, "non-finite amount coerced to zero");
        return Decimal::ZERO;
    }
    match Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
    {
        Some(decimal) => decimal,
        None => {
            tracing::warn!(value, "out-of-range amount coerced to zero");
            Decimal::ZERO
        }
    }
}

/// Convert Decimal back to f64, rounded to 2 decimal places.
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Round half away from zero to 2 decimal places.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a textual amount. Blank or malformed text yields `None`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(raw = trimmed, "unparsable amount coerced to zero");
            Some(Decimal::ZERO)
        }
    }
}

/// Format an amount for display, e.g. `₹412.5`.
pub fn format_money(value: Decimal) -> String {
    format!("{}{}", CURRENCY_SYMBOL, round_money(value).normalize())
}

/// Any JSON value that may carry an amount.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl RawAmount {
    fn into_decimal(self) -> Option<Decimal> {
        match self {
            RawAmount::Number(n) => Some(to_decimal(n)),
            RawAmount::Text(s) => parse_amount(&s),
            RawAmount::Other(_) => {
                tracing::warn!("non-numeric amount coerced to zero");
                Some(Decimal::ZERO)
            }
        }
    }
}

/// Deserialize an amount, treating missing/null/garbage as zero.
///
/// Use with `#[serde(default, deserialize_with = "money::lenient")]`.
pub fn lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt(deserializer)?.unwrap_or_default())
}

/// Deserialize an optional amount. `null` and blank strings are `None`.
/// Amounts above [`MAX_AMOUNT`] fail deserialization.
///
/// Use with `#[serde(default, deserialize_with = "money::lenient_opt")]`.
pub fn lenient_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    raw.and_then(RawAmount::into_decimal)
        .map(|value| require_in_range(value, "amount").map_err(D::Error::custom))
        .transpose()
}
