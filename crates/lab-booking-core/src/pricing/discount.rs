//! Discount resolution and the coupon validation protocol.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::round_money;
use crate::models::{CouponRef, CouponValidation};
use crate::service::{CouponValidator, ServiceResult};

/// Inputs to the discount resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscountInputs {
    pub base: Decimal,
    pub offer: Decimal,
    pub coupon_discount: Decimal,
    pub admin_discount: Decimal,
}

/// Fully resolved pricing. Always derived, never stored on its own.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingSnapshot {
    /// Sum of base prices
    pub base: Decimal,
    /// Sum of offer prices
    pub offer: Decimal,
    /// `base - offer`; negative when offers exceed catalog prices
    pub core_discount: Decimal,
    pub coupon_discount: Decimal,
    pub admin_discount: Decimal,
    /// `core + coupon + admin`
    pub total_discount: Decimal,
    /// `max(0, base - total_discount)`
    pub final_amount: Decimal,
    /// `base - final_amount`
    pub total_savings: Decimal,
}

/// Combine core, coupon and admin discounts into a final amount.
///
/// Inputs are rounded to 2 places first, so every derived field is exact and
/// `total_discount == core + coupon + admin` holds on the rounded values.
/// A negative core discount (offer above base) is added as-is and acts as a
/// surcharge. The final amount never drops below zero. Arithmetic saturates
/// instead of overflowing.
pub fn resolve(inputs: &DiscountInputs) -> PricingSnapshot {
    let base = round_money(inputs.base);
    let offer = round_money(inputs.offer);
    let coupon_discount = round_money(inputs.coupon_discount);
    let admin_discount = round_money(inputs.admin_discount);

    let core_discount = base.saturating_sub(offer);
    let total_discount = core_discount
        .saturating_add(coupon_discount)
        .saturating_add(admin_discount);
    let final_amount = base.saturating_sub(total_discount).max(Decimal::ZERO);

    PricingSnapshot {
        base,
        offer,
        core_discount,
        coupon_discount,
        admin_discount,
        total_discount,
        final_amount,
        total_savings: base.saturating_sub(final_amount),
    }
}

/// Coupon application errors. The message is also kept on [`CouponState`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CouponError {
    #[error("Please select a coupon.")]
    NoneSelected,

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Failed(String),
}

/// Selected coupon and the discount the server granted for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponState {
    selected: Option<CouponRef>,
    discount: Decimal,
    /// Base total the discount was granted for
    validated_base: Option<Decimal>,
    message: Option<String>,
}

impl CouponState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State as loaded from an existing booking, trusted for `base`.
    pub fn restored(coupon: Option<CouponRef>, discount: Decimal, base: Decimal) -> Self {
        Self {
            selected: coupon,
            discount: discount.max(Decimal::ZERO),
            validated_base: Some(base),
            message: None,
        }
    }

    pub fn selected(&self) -> Option<&CouponRef> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected.as_ref().map(|c| c.id)
    }

    /// Currently applied discount.
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Last user-facing message from a selection or validation.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Choose a coupon. Switching to a different coupon drops the applied discount.
    pub fn select(&mut self, coupon: Option<CouponRef>) {
        let same = match (&self.selected, &coupon) {
            (Some(a), Some(b)) => a.id == b.id,
            (None, None) => true,
            _ => false,
        };
        if !same {
            self.discount = Decimal::ZERO;
            self.validated_base = None;
            self.message = None;
        }
        self.selected = coupon;
    }

    /// Remove the coupon and its discount.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The applied discount was granted for a different base total.
    pub fn is_stale(&self, base: Decimal) -> bool {
        !self.discount.is_zero() && self.validated_base != Some(base)
    }

    /// Validate the selected coupon against `base` and apply the result.
    ///
    /// Any outcome other than an accepted coupon leaves the discount at zero.
    pub fn apply<V>(&mut self, validator: &V, base: Decimal) -> Result<Decimal, CouponError>
    where
        V: CouponValidator + ?Sized,
    {
        let Some(code) = self.selected.as_ref().map(|c| c.code.clone()) else {
            return Err(self.none_selected());
        };
        let outcome = validator.validate_coupon(&code, base);
        self.record(base, outcome)
    }

    /// Apply a validation outcome obtained elsewhere (e.g. by a host that
    /// performs the request itself).
    pub fn record(
        &mut self,
        base: Decimal,
        outcome: ServiceResult<CouponValidation>,
    ) -> Result<Decimal, CouponError> {
        let Some(code) = self.selected.as_ref().map(|c| c.code.clone()) else {
            return Err(self.none_selected());
        };

        match outcome {
            Ok(result) if result.valid => {
                self.discount = result.discount.max(Decimal::ZERO);
                self.validated_base = Some(base);
                self.message = Some(
                    result
                        .message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| "Coupon applied.".to_string()),
                );
                tracing::debug!(%code, discount = %self.discount, "coupon applied");
                Ok(self.discount)
            }
            Ok(result) => {
                self.reset_discount();
                let message = result
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Coupon not valid.".to_string());
                tracing::warn!(%code, %message, "coupon rejected");
                self.message = Some(message.clone());
                Err(CouponError::Invalid(message))
            }
            Err(err) => {
                self.reset_discount();
                let message = err
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| "Coupon validation failed.".to_string());
                tracing::warn!(%code, error = %err, "coupon validation failed");
                self.message = Some(message.clone());
                Err(CouponError::Failed(message))
            }
        }
    }

    fn none_selected(&mut self) -> CouponError {
        self.reset_discount();
        self.message = Some(CouponError::NoneSelected.to_string());
        CouponError::NoneSelected
    }

    fn reset_discount(&mut self) {
        self.discount = Decimal::ZERO;
        self.validated_base = None;
    }
}
