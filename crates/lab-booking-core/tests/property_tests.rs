//! Property tests for aggregation, discount resolution and change detection.

use lab_booking_core::models::{BookingItemDraft, PatientRef, ProductKind, ProductRef};
use lab_booking_core::pricing::{aggregate, resolve, DiscountInputs};
use lab_booking_core::{detect, ActionType, ChangeSnapshot, EditState, Schedule};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Amount in paise, 0 to 1,00,000.00
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|paise| Decimal::new(paise, 2))
}

/// Amount with sub-paisa precision, 0 to 1,00,000.000
fn fine_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|mills| Decimal::new(mills, 3))
}

fn kind() -> impl Strategy<Value = ProductKind> {
    prop_oneof![
        Just(ProductKind::LabTest),
        Just(ProductKind::LabProfile),
        Just(ProductKind::LabPackage),
    ]
}

fn items() -> impl Strategy<Value = Vec<BookingItemDraft>> {
    prop::collection::vec((kind(), 1i64..500, amount(), amount()), 0..8).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (kind, id, base, offer))| BookingItemDraft {
                id: format!("item-{}", i),
                patient: PatientRef::new(1, "Asha", "Rao"),
                product: ProductRef::new(kind, id, format!("Product {}", id)),
                base_price: base,
                offer_price: offer,
            })
            .collect()
    })
}

fn schedule() -> impl Strategy<Value = Schedule> {
    (1u32..=28, 6u32..20, prop_oneof![Just(0u32), Just(30u32)]).prop_map(|(day, hour, minute)| {
        Schedule::new(
            format!("2025-03-{:02}", day),
            format!("{:02}:{:02}", hour, minute),
        )
    })
}

proptest! {
    #[test]
    fn aggregate_sums_each_column(items in items()) {
        let totals = aggregate(&items);
        let base: Decimal = items.iter().map(|i| i.base_price).sum();
        let offer: Decimal = items.iter().map(|i| i.offer_price).sum();
        prop_assert_eq!(totals.base, base);
        prop_assert_eq!(totals.offer, offer);
    }

    #[test]
    fn final_amount_matches_formula_and_is_never_negative(
        base in amount(),
        offer in amount(),
        coupon in amount(),
        admin in amount(),
    ) {
        let p = resolve(&DiscountInputs { base, offer, coupon_discount: coupon, admin_discount: admin });
        let expected = (base - ((base - offer) + coupon + admin)).max(Decimal::ZERO);
        prop_assert_eq!(p.final_amount, expected);
        prop_assert!(p.final_amount >= Decimal::ZERO);
    }

    #[test]
    fn rounded_fields_stay_consistent(
        base in fine_amount(),
        offer in fine_amount(),
        coupon in fine_amount(),
        admin in fine_amount(),
    ) {
        let p = resolve(&DiscountInputs { base, offer, coupon_discount: coupon, admin_discount: admin });
        prop_assert_eq!(p.core_discount, p.base - p.offer);
        prop_assert_eq!(p.total_discount, p.core_discount + p.coupon_discount + p.admin_discount);
        prop_assert_eq!(p.final_amount, (p.base - p.total_discount).max(Decimal::ZERO));
        prop_assert_eq!(p.total_savings, p.base - p.final_amount);
    }

    #[test]
    fn resolver_is_idempotent(
        base in amount(),
        offer in amount(),
        coupon in amount(),
        admin in amount(),
    ) {
        let inputs = DiscountInputs { base, offer, coupon_discount: coupon, admin_discount: admin };
        prop_assert_eq!(resolve(&inputs), resolve(&inputs));
    }

    #[test]
    fn unchanged_state_has_no_changes(items in items(), schedule in schedule(), admin in amount()) {
        let snapshot = ChangeSnapshot::capture(&schedule, &items, None, admin);
        let set = detect(&snapshot, &EditState {
            schedule: &schedule,
            items: &items,
            coupon: None,
            admin_discount: admin,
        });
        prop_assert!(set.is_empty());
        prop_assert_eq!(set.action, None);
    }

    #[test]
    fn item_changes_outrank_schedule_changes(
        items in items(),
        extra in items(),
        old in schedule(),
        new in schedule(),
    ) {
        prop_assume!(!extra.is_empty());
        prop_assume!(old != new);

        let snapshot = ChangeSnapshot::capture(&old, &items, None, Decimal::ZERO);
        let mut grown = items.clone();
        grown.extend(extra);

        let set = detect(&snapshot, &EditState {
            schedule: &new,
            items: &grown,
            coupon: None,
            admin_discount: Decimal::ZERO,
        });
        prop_assert_eq!(set.action, Some(ActionType::UpdateItems));
    }
}
