//! Booking pricing.
//!
//! Pipeline: Line items → Aggregation → Discount resolution → PricingSnapshot

mod aggregate;
mod discount;
pub mod money;

pub use aggregate::*;
pub use discount::*;

use rust_decimal::Decimal;

/// Price a list of items with the given coupon and admin discounts.
pub fn quote<T: Priced>(
    items: &[T],
    coupon_discount: Decimal,
    admin_discount: Decimal,
) -> PricingSnapshot {
    let totals = aggregate(items);
    let snapshot = resolve(&DiscountInputs {
        base: totals.base,
        offer: totals.offer,
        coupon_discount,
        admin_discount,
    });
    tracing::debug!(
        items = items.len(),
        base = %snapshot.base,
        final_amount = %snapshot.final_amount,
        "pricing recomputed"
    );
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingItemDraft, CatalogEntry, PatientRef, ProductKind};

    #[test]
    fn test_quote_combines_aggregate_and_resolve() {
        let entry = CatalogEntry {
            id: 1,
            name: "Thyroid Profile".into(),
            description: None,
            price: Decimal::from(500),
            offer_price: Some(Decimal::from(500)),
        };
        let items = vec![BookingItemDraft::from_catalog(
            PatientRef::new(1, "A", "B"),
            ProductKind::LabProfile,
            &entry,
        )];

        let p = quote(&items, Decimal::from(50), Decimal::from(25));
        assert_eq!(p.core_discount, Decimal::ZERO);
        assert_eq!(p.total_discount, Decimal::from(75));
        assert_eq!(p.final_amount, Decimal::from(425));
    }
}
