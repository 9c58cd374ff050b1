//! Golden tests for booking pricing and change detection.
//!
//! These tests pin the arithmetic and diff output for known bookings.

use lab_booking_core::models::{BookingItemDraft, CouponRef, PatientRef, ProductKind, ProductRef};
use lab_booking_core::pricing::{quote, CouponState};
use lab_booking_core::{
    detect, ActionType, ChangeSnapshot, EditState, MockCouponValidator, Schedule, ServiceError,
};
use rust_decimal::Decimal;

/// Pricing case from the golden table.
struct GoldenCase {
    id: &'static str,
    /// (base, offer) per item
    items: &'static [(&'static str, &'static str)],
    coupon: &'static str,
    admin: &'static str,
    expected_base: &'static str,
    expected_offer: &'static str,
    expected_core: &'static str,
    expected_total_discount: &'static str,
    expected_final: &'static str,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "offer-only",
            items: &[("500", "400")],
            coupon: "0",
            admin: "0",
            expected_base: "500",
            expected_offer: "400",
            expected_core: "100",
            expected_total_discount: "100",
            expected_final: "400",
        },
        GoldenCase {
            id: "coupon-and-admin",
            items: &[("500", "500")],
            coupon: "50",
            admin: "25",
            expected_base: "500",
            expected_offer: "500",
            expected_core: "0",
            expected_total_discount: "75",
            expected_final: "425",
        },
        GoldenCase {
            id: "discounts-exceed-base",
            items: &[("100", "100")],
            coupon: "60",
            admin: "60",
            expected_base: "100",
            expected_offer: "100",
            expected_core: "0",
            expected_total_discount: "120",
            expected_final: "0",
        },
        GoldenCase {
            id: "offer-above-base",
            items: &[("100", "130"), ("200", "150")],
            coupon: "0",
            admin: "0",
            expected_base: "300",
            expected_offer: "280",
            expected_core: "20",
            expected_total_discount: "20",
            expected_final: "280",
        },
        GoldenCase {
            id: "fractional-prices",
            items: &[("499.99", "399.995"), ("0.01", "0.01")],
            coupon: "10.005",
            admin: "0",
            expected_base: "500.00",
            expected_offer: "400.01",
            expected_core: "99.99",
            expected_total_discount: "110.00",
            expected_final: "390.00",
        },
        GoldenCase {
            id: "empty-booking",
            items: &[],
            coupon: "0",
            admin: "0",
            expected_base: "0",
            expected_offer: "0",
            expected_core: "0",
            expected_total_discount: "0",
            expected_final: "0",
        },
    ]
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn item(index: usize, base: &str, offer: &str) -> BookingItemDraft {
    BookingItemDraft {
        id: format!("item-{}", index),
        patient: PatientRef::new(1, "Asha", "Rao"),
        product: ProductRef::new(ProductKind::LabTest, index as i64 + 1, format!("Test {}", index)),
        base_price: dec(base),
        offer_price: dec(offer),
    }
}

#[test]
fn test_golden_pricing() {
    for case in get_golden_cases() {
        let items: Vec<_> = case
            .items
            .iter()
            .enumerate()
            .map(|(i, (base, offer))| item(i, base, offer))
            .collect();

        let p = quote(&items, dec(case.coupon), dec(case.admin));

        assert_eq!(p.base, dec(case.expected_base), "{}: base", case.id);
        assert_eq!(p.offer, dec(case.expected_offer), "{}: offer", case.id);
        assert_eq!(p.core_discount, dec(case.expected_core), "{}: core", case.id);
        assert_eq!(
            p.total_discount,
            dec(case.expected_total_discount),
            "{}: total discount",
            case.id
        );
        assert_eq!(p.final_amount, dec(case.expected_final), "{}: final", case.id);
        assert_eq!(p.total_savings, p.base - p.final_amount, "{}: savings", case.id);
    }
}

#[test]
fn test_schedule_date_change_only() {
    let items = vec![item(0, "500", "400")];
    let old = Schedule::new("2025-01-01", "");
    let new = Schedule::new("2025-01-02", "");
    let snapshot = ChangeSnapshot::capture(&old, &items, None, Decimal::ZERO);

    let set = detect(
        &snapshot,
        &EditState {
            schedule: &new,
            items: &items,
            coupon: None,
            admin_discount: Decimal::ZERO,
        },
    );

    assert_eq!(set.action, Some(ActionType::UpdateSchedule));
    assert_eq!(
        set.changes,
        vec!["Scheduled date changed from 2025-01-01 → 2025-01-02".to_string()]
    );
    assert_eq!(set.warning(), None);
}

#[test]
fn test_items_take_precedence_over_schedule_and_discounts() {
    let items = vec![item(0, "500", "400"), item(1, "300", "300")];
    let schedule = Schedule::new("2025-01-01", "09:00");
    let coupon = CouponRef::new(2, "SAVE10");
    let snapshot = ChangeSnapshot::capture(&schedule, &items, Some(&coupon), Decimal::ZERO);

    let fewer = vec![items[0].clone()];
    let moved = Schedule::new("2025-01-03", "11:00");
    let set = detect(
        &snapshot,
        &EditState {
            schedule: &moved,
            items: &fewer,
            coupon: None,
            admin_discount: Decimal::from(40),
        },
    );

    assert_eq!(set.action, Some(ActionType::UpdateItems));
    assert_eq!(
        set.changes,
        vec![
            "Item count changed (2 → 1)".to_string(),
            "Scheduled date changed from 2025-01-01 → 2025-01-03".to_string(),
            "Scheduled time changed from 09:00 → 11:00".to_string(),
            "Coupon changed (SAVE10 → none)".to_string(),
            "Admin discount changed from ₹0 → ₹40".to_string(),
        ]
    );
    assert_eq!(
        set.warning().as_deref(),
        Some("Multiple changes detected; only \"update_items\" will be recorded.")
    );
}

#[test]
fn test_failed_revalidation_clears_applied_discount() {
    let items = vec![item(0, "500", "500")];
    let base = quote(&items, Decimal::ZERO, Decimal::ZERO).base;
    let mut coupon = CouponState::restored(Some(CouponRef::new(1, "SAVE50")), dec("50"), base);
    assert_eq!(quote(&items, coupon.discount(), Decimal::ZERO).final_amount, dec("450"));

    let offline = MockCouponValidator::new().failing(ServiceError::Transport("timeout".into()));
    assert!(coupon.apply(&offline, base).is_err());

    assert_eq!(coupon.discount(), Decimal::ZERO);
    assert_eq!(coupon.message(), Some("Coupon validation failed."));
    assert_eq!(quote(&items, coupon.discount(), Decimal::ZERO).final_amount, dec("500"));
}
