//! Line-item aggregation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::BookingItemDraft;

/// Anything carrying a base and offer price.
pub trait Priced {
    fn base_price(&self) -> Decimal;
    fn offer_price(&self) -> Decimal;
}

impl Priced for BookingItemDraft {
    fn base_price(&self) -> Decimal {
        self.base_price
    }

    fn offer_price(&self) -> Decimal {
        self.offer_price
    }
}

/// Summed prices over a list of items.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineTotals {
    pub base: Decimal,
    pub offer: Decimal,
}

/// Sum base and offer prices. An empty list yields zero totals.
///
/// Sums saturate at `Decimal::MAX` instead of overflowing.
pub fn aggregate<T: Priced>(items: &[T]) -> LineTotals {
    items.iter().fold(LineTotals::default(), |acc, item| LineTotals {
        base: acc.base.saturating_add(item.base_price()),
        offer: acc.offer.saturating_add(item.offer_price()),
    })
}
