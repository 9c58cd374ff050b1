//! Lab Booking Core Library
//!
//! Pricing, change detection and request shaping for diagnostic-lab bookings.
//!
//! # Architecture
//!
//! ```text
//! Catalog selections ──► BookingItemDraft ──► Aggregation ──► Discount resolution
//!                                                                   │
//!                              coupon validation (CouponValidator) ─┤
//!                                                                   ▼
//!                                                           PricingSnapshot
//!                                                                   │
//!                        ┌──────────────────────────────────────────┤
//!                        │ edit mode only                           │
//!                        ▼                                          ▼
//!          ChangeSnapshot vs EditState                      BookingPayload
//!          (changes + single action tag)  ──remarks──►     (create / update)
//!                                                                   │
//!                                                                   ▼
//!                                                           BookingGateway
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (catalog entries, patients, coupons, booking records)
//! - [`pricing`]: Aggregation, discount resolution and money helpers
//! - [`diff`]: Snapshot comparison and action tagging
//! - [`payload`]: Create/update bodies and booking operations
//! - [`draft`]: The booking editor tying the above together
//! - [`service`]: Coupon validation and submission seams

pub mod diff;
pub mod draft;
pub mod models;
pub mod payload;
pub mod pricing;
pub mod service;

// Re-export commonly used types
pub use diff::{detect, ChangeCategory, ChangeSet, ChangeSnapshot, EditState};
pub use draft::{BookingDraft, DraftError, DraftMode, ValidationError};
pub use models::{
    ActionType, BookingItemDraft, BookingRecord, CatalogEntry, CouponRef, CouponValidation,
    PatientRef, ProductKind, ProductRef, Schedule,
};
pub use payload::{BookingOperation, BookingPayload, BookingStatus, OperationPayload, PaymentMethod};
pub use pricing::{quote, CouponError, CouponState, PricingSnapshot};
pub use service::{BookingGateway, CouponValidator, MockCouponValidator, ServiceError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use pricing::money::{checked_amount, to_f64, AmountError};
use rust_decimal::Decimal;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum LabBookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Coupon error: {0}")]
    Coupon(String),

    #[error("Invalid booking record: {0}")]
    Record(String),

    #[error("Submission error: {0}")]
    Submission(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for LabBookingError {
    fn from(e: ValidationError) -> Self {
        LabBookingError::Validation(e.to_string())
    }
}

impl From<CouponError> for LabBookingError {
    fn from(e: CouponError) -> Self {
        LabBookingError::Coupon(e.to_string())
    }
}

impl From<DraftError> for LabBookingError {
    fn from(e: DraftError) -> Self {
        match e {
            DraftError::Validation(e) => e.into(),
            DraftError::Coupon(e) => e.into(),
            DraftError::Record(e) => LabBookingError::Record(e.to_string()),
            DraftError::Submission(e) => LabBookingError::Submission(e.to_string()),
        }
    }
}

impl From<AmountError> for LabBookingError {
    fn from(e: AmountError) -> Self {
        LabBookingError::InvalidInput(e.to_string())
    }
}

impl From<serde_json::Error> for LabBookingError {
    fn from(e: serde_json::Error) -> Self {
        LabBookingError::Serialization(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for LabBookingError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        LabBookingError::Internal(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Stateless Functions (exported to FFI)
// =========================================================================

/// Price a list of line items. Non-finite or out-of-range amounts are rejected.
#[uniffi::export]
pub fn compute_pricing(
    items: Vec<FfiLineItem>,
    coupon_discount: f64,
    admin_discount: f64,
) -> Result<FfiPricing, LabBookingError> {
    let lines = items
        .iter()
        .map(CheckedLineItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let coupon_discount = checked_amount(coupon_discount, "coupon_discount")?;
    let admin_discount = checked_amount(admin_discount, "admin_discount")?;
    Ok(quote(&lines, coupon_discount, admin_discount).into())
}

/// Validate a booking operation and return its JSON body.
#[uniffi::export]
pub fn build_operation_payload(
    operation: FfiOperation,
    remarks: String,
) -> Result<String, LabBookingError> {
    let operation = BookingOperation::try_from(operation)?;
    let payload = operation.into_payload(&remarks)?;
    Ok(serde_json::to_string(&payload)?)
}

/// Start a draft for a new booking.
#[uniffi::export]
pub fn new_booking_draft(user: i64, address: Option<i64>) -> Arc<DraftHandle> {
    Arc::new(DraftHandle {
        draft: Arc::new(Mutex::new(BookingDraft::create(user, address))),
    })
}

/// Start a draft editing a booking, from the JSON the bookings endpoint returned.
#[uniffi::export]
pub fn edit_booking_draft(record_json: String) -> Result<Arc<DraftHandle>, LabBookingError> {
    let record: BookingRecord = serde_json::from_str(&record_json)?;
    let draft = BookingDraft::edit(&record)?;
    Ok(Arc::new(DraftHandle {
        draft: Arc::new(Mutex::new(draft)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe booking draft wrapper for FFI.
///
/// Network calls are left to the host: it validates coupons and sends the
/// JSON body from [`DraftHandle::build_payload_json`] itself.
#[derive(uniffi::Object)]
pub struct DraftHandle {
    draft: Arc<Mutex<BookingDraft>>,
}

#[uniffi::export]
impl DraftHandle {
    // =========================================================================
    // Items
    // =========================================================================

    /// Add a catalog selection. Returns the new item's local id.
    pub fn add_item(&self, item: FfiNewItem) -> Result<String, LabBookingError> {
        let draft_item = BookingItemDraft::try_from(item)?;
        let id = draft_item.id.clone();
        self.draft.lock()?.add_item(draft_item);
        Ok(id)
    }

    pub fn remove_item(&self, id: String) -> Result<bool, LabBookingError> {
        Ok(self.draft.lock()?.remove_item(&id))
    }

    pub fn items(&self) -> Result<Vec<FfiDraftItem>, LabBookingError> {
        let draft = self.draft.lock()?;
        Ok(draft.items().iter().map(FfiDraftItem::from).collect())
    }

    // =========================================================================
    // Schedule & Address
    // =========================================================================

    pub fn set_schedule(&self, date: String, time: String) -> Result<(), LabBookingError> {
        self.draft.lock()?.set_schedule(Schedule::new(date, time));
        Ok(())
    }

    pub fn set_address(&self, address: Option<i64>) -> Result<(), LabBookingError> {
        self.draft.lock()?.set_address(address);
        Ok(())
    }

    // =========================================================================
    // Discounts
    // =========================================================================

    pub fn select_coupon(&self, coupon: Option<FfiCoupon>) -> Result<(), LabBookingError> {
        self.draft
            .lock()?
            .select_coupon(coupon.map(|c| CouponRef::new(c.id, c.code)));
        Ok(())
    }

    /// Current base total, to send along with a coupon validation request.
    pub fn coupon_base_total(&self) -> Result<f64, LabBookingError> {
        Ok(to_f64(self.draft.lock()?.pricing().base))
    }

    /// Apply the server's verdict on the selected coupon. Returns the granted discount.
    pub fn record_coupon_validation(
        &self,
        validation: FfiCouponValidation,
    ) -> Result<f64, LabBookingError> {
        let outcome = Ok(CouponValidation {
            valid: validation.valid,
            discount: checked_amount(validation.discount, "discount")?,
            message: validation.message,
        });
        let discount = self.draft.lock()?.record_coupon_outcome(outcome)?;
        Ok(to_f64(discount))
    }

    /// Record that the validation request itself failed.
    pub fn record_coupon_failure(&self, message: Option<String>) -> Result<(), LabBookingError> {
        let error = match message {
            Some(msg) => ServiceError::Rejected(msg),
            None => ServiceError::Transport("request failed".to_string()),
        };
        // Always an Err; the message is kept on the coupon state
        let _ = self.draft.lock()?.record_coupon_outcome(Err(error));
        Ok(())
    }

    pub fn coupon_message(&self) -> Result<Option<String>, LabBookingError> {
        Ok(self.draft.lock()?.coupon().message().map(str::to_string))
    }

    pub fn clear_coupon(&self) -> Result<(), LabBookingError> {
        self.draft.lock()?.clear_coupon();
        Ok(())
    }

    pub fn apply_admin_discount(&self, amount: f64) -> Result<(), LabBookingError> {
        let amount = checked_amount(amount, "admin_discount")?;
        self.draft.lock()?.apply_admin_discount(amount)?;
        Ok(())
    }

    // =========================================================================
    // Review & Submit
    // =========================================================================

    pub fn pricing(&self) -> Result<FfiPricing, LabBookingError> {
        Ok(self.draft.lock()?.pricing().into())
    }

    pub fn validate(&self) -> Result<(), LabBookingError> {
        self.draft.lock()?.validate()?;
        Ok(())
    }

    /// Changes since load; `None` for a new booking.
    pub fn review(&self) -> Result<Option<FfiChangeSet>, LabBookingError> {
        Ok(self.draft.lock()?.review().map(FfiChangeSet::from))
    }

    /// Server id of the edited booking, if any.
    pub fn booking_id(&self) -> Result<Option<String>, LabBookingError> {
        Ok(self.draft.lock()?.booking_id().map(str::to_string))
    }

    /// Validated request body as JSON.
    pub fn build_payload_json(&self, remarks: String) -> Result<String, LabBookingError> {
        let payload = self.draft.lock()?.build_payload(&remarks)?;
        Ok(payload.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe priced line item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLineItem {
    pub base_price: f64,
    pub offer_price: f64,
}

/// A line item whose amounts passed the range checks.
struct CheckedLineItem {
    base_price: Decimal,
    offer_price: Decimal,
}

impl TryFrom<&FfiLineItem> for CheckedLineItem {
    type Error = AmountError;

    fn try_from(item: &FfiLineItem) -> Result<Self, Self::Error> {
        Ok(Self {
            base_price: checked_amount(item.base_price, "base_price")?,
            offer_price: checked_amount(item.offer_price, "offer_price")?,
        })
    }
}

impl pricing::Priced for CheckedLineItem {
    fn base_price(&self) -> Decimal {
        self.base_price
    }

    fn offer_price(&self) -> Decimal {
        self.offer_price
    }
}

/// FFI-safe pricing snapshot.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiPricing {
    pub base: f64,
    pub offer: f64,
    pub core_discount: f64,
    pub coupon_discount: f64,
    pub admin_discount: f64,
    pub total_discount: f64,
    pub final_amount: f64,
    pub total_savings: f64,
}

impl From<PricingSnapshot> for FfiPricing {
    fn from(p: PricingSnapshot) -> Self {
        Self {
            base: to_f64(p.base),
            offer: to_f64(p.offer),
            core_discount: to_f64(p.core_discount),
            coupon_discount: to_f64(p.coupon_discount),
            admin_discount: to_f64(p.admin_discount),
            total_discount: to_f64(p.total_discount),
            final_amount: to_f64(p.final_amount),
            total_savings: to_f64(p.total_savings),
        }
    }
}

/// A catalog selection to add to a draft.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewItem {
    pub patient_id: i64,
    pub patient_first_name: String,
    pub patient_last_name: String,
    /// `lab_test`, `lab_profile` or `lab_package`
    pub product_type: String,
    pub product_id: i64,
    pub product_name: String,
    pub price: f64,
    pub offer_price: Option<f64>,
}

impl TryFrom<FfiNewItem> for BookingItemDraft {
    type Error = LabBookingError;

    fn try_from(item: FfiNewItem) -> Result<Self, Self::Error> {
        let kind = ProductKind::parse(&item.product_type).ok_or_else(|| {
            LabBookingError::InvalidInput(format!("Unknown product type: {}", item.product_type))
        })?;
        let entry = CatalogEntry {
            id: item.product_id,
            name: item.product_name,
            description: None,
            price: checked_amount(item.price, "price")?,
            offer_price: item
                .offer_price
                .map(|offer| checked_amount(offer, "offer_price"))
                .transpose()?,
        };
        let patient = PatientRef::new(
            item.patient_id,
            item.patient_first_name,
            item.patient_last_name,
        );
        Ok(BookingItemDraft::from_catalog(patient, kind, &entry))
    }
}

/// FFI-safe draft item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDraftItem {
    pub id: String,
    pub patient_id: i64,
    pub patient_name: String,
    pub product_type: String,
    pub product_id: i64,
    pub product_name: String,
    pub base_price: f64,
    pub offer_price: f64,
}

impl From<&BookingItemDraft> for FfiDraftItem {
    fn from(item: &BookingItemDraft) -> Self {
        Self {
            id: item.id.clone(),
            patient_id: item.patient.id,
            patient_name: item.patient.display_name(),
            product_type: item.product.kind.to_string(),
            product_id: item.product.id,
            product_name: item.product.name.clone(),
            base_price: to_f64(item.base_price),
            offer_price: to_f64(item.offer_price),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCoupon {
    pub id: i64,
    pub code: String,
}

/// Coupon validation response as received by the host.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCouponValidation {
    pub valid: bool,
    pub discount: f64,
    pub message: Option<String>,
}

/// FFI-safe change set.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiChangeSet {
    pub changes: Vec<String>,
    pub action_type: Option<String>,
    pub requires_confirmation: bool,
    pub warning: Option<String>,
}

impl From<ChangeSet> for FfiChangeSet {
    fn from(set: ChangeSet) -> Self {
        Self {
            requires_confirmation: set.requires_confirmation(),
            warning: set.warning(),
            action_type: set.action.map(|a| a.to_string()),
            changes: set.changes,
        }
    }
}

/// FFI-safe booking operation.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiOperation {
    UpdateStatus { status: Option<String> },
    UpdatePayment { method: Option<String> },
    Reschedule { date: String, time: String },
}

impl TryFrom<FfiOperation> for BookingOperation {
    type Error = LabBookingError;

    fn try_from(op: FfiOperation) -> Result<Self, Self::Error> {
        Ok(match op {
            FfiOperation::UpdateStatus { status } => BookingOperation::UpdateStatus {
                status: parse_optional(status, BookingStatus::parse, "status")?,
            },
            FfiOperation::UpdatePayment { method } => BookingOperation::UpdatePayment {
                method: parse_optional(method, PaymentMethod::parse, "payment method")?,
            },
            FfiOperation::Reschedule { date, time } => BookingOperation::Reschedule {
                schedule: Schedule::new(date, time),
            },
        })
    }
}

/// Blank means "not chosen"; anything else must parse.
fn parse_optional<T>(
    value: Option<String>,
    parse: fn(&str) -> Option<T>,
    what: &str,
) -> Result<Option<T>, LabBookingError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse(raw)
            .map(Some)
            .ok_or_else(|| LabBookingError::InvalidInput(format!("Unknown {}: {}", what, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(product_type: &str, price: f64, offer: Option<f64>) -> FfiNewItem {
        FfiNewItem {
            patient_id: 1,
            patient_first_name: "Asha".into(),
            patient_last_name: "Rao".into(),
            product_type: product_type.into(),
            product_id: 10,
            product_name: "CBC".into(),
            price,
            offer_price: offer,
        }
    }

    #[test]
    fn test_compute_pricing() {
        let p = compute_pricing(
            vec![
                FfiLineItem {
                    base_price: 500.0,
                    offer_price: 400.0,
                },
                FfiLineItem {
                    base_price: 300.0,
                    offer_price: 300.0,
                },
            ],
            50.0,
            25.0,
        )
        .unwrap();
        assert_eq!(p.base, 800.0);
        assert_eq!(p.total_discount, 175.0);
        assert_eq!(p.final_amount, 625.0);
    }

    #[test]
    fn test_compute_pricing_rejects_out_of_range_amounts() {
        let huge = FfiLineItem {
            base_price: 1e29,
            offer_price: 0.0,
        };
        assert!(matches!(
            compute_pricing(vec![huge], 0.0, 0.0),
            Err(LabBookingError::InvalidInput(_))
        ));

        let fits = FfiLineItem {
            base_price: 5e8,
            offer_price: 5e8,
        };
        assert!(matches!(
            compute_pricing(vec![fits], f64::NAN, 0.0),
            Err(LabBookingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_out_of_range_new_item_is_rejected() {
        let handle = new_booking_draft(1, Some(2));
        assert!(matches!(
            handle.add_item(new_item("lab_test", 1e29, None)),
            Err(LabBookingError::InvalidInput(_))
        ));
        assert!(matches!(
            handle.add_item(new_item("lab_test", 500.0, Some(f64::INFINITY))),
            Err(LabBookingError::InvalidInput(_))
        ));
        assert!(handle.items().unwrap().is_empty());
        assert!(matches!(
            handle.apply_admin_discount(1e12),
            Err(LabBookingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_draft_handle_flow() {
        let handle = new_booking_draft(1, Some(2));
        assert!(matches!(handle.validate(), Err(LabBookingError::Validation(_))));

        let id = handle.add_item(new_item("lab_test", 500.0, Some(450.0))).unwrap();
        assert_eq!(handle.items().unwrap()[0].id, id);
        handle
            .set_schedule("2025-10-16".into(), "10:10".into())
            .unwrap();

        handle
            .select_coupon(Some(FfiCoupon {
                id: 3,
                code: "FLAT20".into(),
            }))
            .unwrap();
        let granted = handle
            .record_coupon_validation(FfiCouponValidation {
                valid: true,
                discount: 20.0,
                message: None,
            })
            .unwrap();
        assert_eq!(granted, 20.0);
        assert_eq!(handle.coupon_message().unwrap().as_deref(), Some("Coupon applied."));
        assert_eq!(handle.pricing().unwrap().final_amount, 430.0);

        let json = handle.build_payload_json(String::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["coupon"], 3);
        assert_eq!(value["final_amount"], 430.0);
        assert!(handle.review().unwrap().is_none());
    }

    #[test]
    fn test_coupon_failure_resets_discount() {
        let handle = new_booking_draft(1, Some(2));
        handle.add_item(new_item("lab_profile", 900.0, None)).unwrap();
        handle
            .select_coupon(Some(FfiCoupon {
                id: 3,
                code: "X".into(),
            }))
            .unwrap();
        handle.record_coupon_failure(None).unwrap();

        assert_eq!(
            handle.coupon_message().unwrap().as_deref(),
            Some("Coupon validation failed.")
        );
        assert_eq!(handle.pricing().unwrap().coupon_discount, 0.0);
    }

    #[test]
    fn test_unknown_product_type() {
        let handle = new_booking_draft(1, None);
        assert!(matches!(
            handle.add_item(new_item("vaccine", 1.0, None)),
            Err(LabBookingError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_operation_payload_json() {
        let json = build_operation_payload(
            FfiOperation::UpdatePayment {
                method: Some("cash".into()),
            },
            "collected".into(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["payment_status"], "success");

        assert!(matches!(
            build_operation_payload(FfiOperation::UpdateStatus { status: None }, "x".into()),
            Err(LabBookingError::Validation(_))
        ));
        assert!(matches!(
            build_operation_payload(
                FfiOperation::UpdateStatus {
                    status: Some("lost".into())
                },
                "x".into()
            ),
            Err(LabBookingError::InvalidInput(_))
        ));
    }
}
