//! Request bodies for the booking endpoints.
//!
//! Nothing here touches the network; it only shapes data for the gateway.

mod operations;

pub use operations::*;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ActionType, BookingItemDraft, CouponRef, ProductKind, Schedule};
use crate::pricing::PricingSnapshot;

/// One booking item as the server expects it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadItem {
    pub patient: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub offer_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lab_test: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<i64>,
    /// Redundant with the id field above; lets the server validate the pair
    pub product_type: ProductKind,
    pub product_id: i64,
}

impl From<&BookingItemDraft> for PayloadItem {
    fn from(item: &BookingItemDraft) -> Self {
        let id = item.product.id;
        let (lab_test, profile, package) = match item.product.kind {
            ProductKind::LabTest => (Some(id), None, None),
            ProductKind::LabProfile => (None, Some(id), None),
            ProductKind::LabPackage => (None, None, Some(id)),
        };

        Self {
            patient: item.patient.id,
            base_price: item.base_price,
            offer_price: item.offer_price,
            lab_test,
            profile,
            package,
            product_type: item.product.kind,
            product_id: id,
        }
    }
}

/// Create (`POST`) or update (`PATCH`) body for a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingPayload {
    /// Customer; only sent on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
    pub address: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    /// Coupon id, explicitly `null` when none is applied
    pub coupon: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub offer_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
    /// Total discount (core + coupon + admin)
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub coupon_discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub admin_discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_savings: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub items: Vec<PayloadItem>,
}

/// Everything the payload is built from.
#[derive(Debug, Clone, Copy)]
pub struct PayloadInput<'a> {
    pub items: &'a [BookingItemDraft],
    pub pricing: &'a PricingSnapshot,
    pub coupon: Option<&'a CouponRef>,
    pub address: Option<i64>,
    pub schedule: &'a Schedule,
}

/// Audit information attached to an update with detected changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeNote {
    pub action: ActionType,
    pub remarks: String,
}

impl BookingPayload {
    /// Body for creating a booking for `user`.
    pub fn for_create(input: &PayloadInput<'_>, user: Option<i64>) -> Self {
        let mut payload = Self::base(input);
        payload.user = user;
        payload
    }

    /// Body for updating a booking. `note` is present only when changes were detected.
    pub fn for_update(input: &PayloadInput<'_>, note: Option<ChangeNote>) -> Self {
        let mut payload = Self::base(input);
        if let Some(note) = note {
            payload.action_type = Some(note.action);
            payload.remarks = Some(note.remarks);
        }
        payload
    }

    fn base(input: &PayloadInput<'_>) -> Self {
        let pricing = input.pricing;
        Self {
            user: None,
            address: input.address,
            scheduled_date: non_empty(&input.schedule.date),
            scheduled_time: non_empty(&input.schedule.time),
            coupon: input.coupon.map(|c| c.id),
            base_total: pricing.base,
            offer_total: pricing.offer,
            final_amount: pricing.final_amount,
            discount_amount: pricing.total_discount,
            coupon_discount: pricing.coupon_discount,
            admin_discount: pricing.admin_discount,
            total_savings: pricing.total_savings,
            action_type: None,
            remarks: None,
            items: input.items.iter().map(PayloadItem::from).collect(),
        }
    }

    /// Serialize to the JSON body.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatientRef, ProductRef};
    use crate::pricing::quote;

    fn items() -> Vec<BookingItemDraft> {
        vec![
            BookingItemDraft {
                id: "a".into(),
                patient: PatientRef::new(1, "Asha", "Rao"),
                product: ProductRef::new(ProductKind::LabTest, 10, "CBC"),
                base_price: Decimal::from(500),
                offer_price: Decimal::from(400),
            },
            BookingItemDraft {
                id: "b".into(),
                patient: PatientRef::new(2, "Ravi", "Rao"),
                product: ProductRef::new(ProductKind::LabPackage, 3, "Full Body"),
                base_price: Decimal::from(2000),
                offer_price: Decimal::from(1500),
            },
        ]
    }

    #[test]
    fn test_item_carries_exactly_one_product_key() {
        let items = items();
        let json = serde_json::to_value(PayloadItem::from(&items[1])).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["package"], 3);
        assert!(!obj.contains_key("lab_test"));
        assert!(!obj.contains_key("profile"));
        assert_eq!(obj["product_type"], "lab_package");
        assert_eq!(obj["product_id"], 3);
        assert_eq!(obj["base_price"], 2000.0);
        assert_eq!(obj["offer_price"], 1500.0);
    }

    #[test]
    fn test_create_payload_totals() {
        let items = items();
        let pricing = quote(&items, Decimal::from(100), Decimal::from(50));
        let schedule = Schedule::new("2025-10-16", "10:10:00");
        let coupon = CouponRef::new(7, "SAVE100");

        let payload = BookingPayload::for_create(
            &PayloadInput {
                items: &items,
                pricing: &pricing,
                coupon: Some(&coupon),
                address: Some(2),
                schedule: &schedule,
            },
            Some(1),
        );

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["user"], 1);
        assert_eq!(json["address"], 2);
        assert_eq!(json["coupon"], 7);
        assert_eq!(json["scheduled_date"], "2025-10-16");
        assert_eq!(json["base_total"], 2500.0);
        assert_eq!(json["offer_total"], 1900.0);
        assert_eq!(json["discount_amount"], 750.0);
        assert_eq!(json["final_amount"], 1750.0);
        assert_eq!(json["coupon_discount"], 100.0);
        assert_eq!(json["admin_discount"], 50.0);
        assert_eq!(json["total_savings"], 750.0);
        assert!(json.get("action_type").is_none());
        assert!(json.get("remarks").is_none());
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_update_payload_action_fields() {
        let items = items();
        let pricing = quote(&items, Decimal::ZERO, Decimal::ZERO);
        let schedule = Schedule::default();
        let input = PayloadInput {
            items: &items,
            pricing: &pricing,
            coupon: None,
            address: Some(2),
            schedule: &schedule,
        };

        let silent = serde_json::to_value(BookingPayload::for_update(&input, None)).unwrap();
        assert!(silent.get("action_type").is_none());
        assert!(silent.get("user").is_none());
        assert!(silent.get("scheduled_date").is_none());
        assert!(silent["coupon"].is_null());

        let noted = BookingPayload::for_update(
            &input,
            Some(ChangeNote {
                action: ActionType::UpdateItems,
                remarks: "removed duplicate test".into(),
            }),
        );
        let json = serde_json::to_value(&noted).unwrap();
        assert_eq!(json["action_type"], "update_items");
        assert_eq!(json["remarks"], "removed duplicate test");
    }
}
