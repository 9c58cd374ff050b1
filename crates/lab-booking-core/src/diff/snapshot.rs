//! Load-time snapshot and the live state it is compared against.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BookingItemDraft, CouponRef, ProductRef, Schedule};
use crate::pricing::Priced;

/// Item fields that take part in change detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotItem {
    pub product: ProductRef,
    pub base_price: Decimal,
    pub offer_price: Decimal,
}

impl From<&BookingItemDraft> for SnapshotItem {
    fn from(item: &BookingItemDraft) -> Self {
        Self {
            product: item.product.clone(),
            base_price: item.base_price,
            offer_price: item.offer_price,
        }
    }
}

impl Priced for SnapshotItem {
    fn base_price(&self) -> Decimal {
        self.base_price
    }

    fn offer_price(&self) -> Decimal {
        self.offer_price
    }
}

/// Immutable copy of a booking as loaded from the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeSnapshot {
    schedule: Schedule,
    items: Vec<SnapshotItem>,
    coupon: Option<CouponRef>,
    admin_discount: Decimal,
}

impl ChangeSnapshot {
    /// Capture the current booking state.
    pub fn capture(
        schedule: &Schedule,
        items: &[BookingItemDraft],
        coupon: Option<&CouponRef>,
        admin_discount: Decimal,
    ) -> Self {
        Self {
            schedule: schedule.clone(),
            items: items.iter().map(SnapshotItem::from).collect(),
            coupon: coupon.cloned(),
            admin_discount,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn items(&self) -> &[SnapshotItem] {
        &self.items
    }

    pub fn coupon(&self) -> Option<&CouponRef> {
        self.coupon.as_ref()
    }

    pub fn admin_discount(&self) -> Decimal {
        self.admin_discount
    }
}

/// Borrowed view of the live, editable booking state.
#[derive(Debug, Clone, Copy)]
pub struct EditState<'a> {
    pub schedule: &'a Schedule,
    pub items: &'a [BookingItemDraft],
    pub coupon: Option<&'a CouponRef>,
    pub admin_discount: Decimal,
}
