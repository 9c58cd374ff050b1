//! Booking models: draft line items, schedule and the server's booking record.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::{CatalogEntry, ProductKind, ProductRef};
use super::coupon::CouponRef;
use super::patient::{AddressRef, CustomerRef, PatientRef};
use crate::pricing::money;

/// Errors mapping a server booking record into drafts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Booking item {0} references no lab test, profile or package")]
    MissingProduct(String),

    #[error("Booking item {0} has no patient")]
    MissingPatient(String),
}

pub type RecordResult<T> = Result<T, RecordError>;

/// One line item being edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingItemDraft {
    /// Local id for new items, server id for loaded ones
    pub id: String,
    /// Patient this test is for
    pub patient: PatientRef,
    /// The catalog product (kind decides lab_test/profile/package)
    pub product: ProductRef,
    /// Catalog price
    pub base_price: Decimal,
    /// Price actually charged before coupon/admin discounts
    pub offer_price: Decimal,
}

impl BookingItemDraft {
    /// Create a draft item from a catalog selection.
    pub fn from_catalog(patient: PatientRef, kind: ProductKind, entry: &CatalogEntry) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient,
            product: entry.to_ref(kind),
            base_price: entry.price,
            offer_price: entry.effective_offer_price(),
        }
    }

    /// Product kind of this item.
    pub fn kind(&self) -> ProductKind {
        self.product.kind
    }
}

/// Collection slot. Empty strings mean "not chosen yet".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schedule {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM` or `HH:MM:SS`
    pub time: String,
}

impl Schedule {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }

    /// Both date and time are filled in.
    pub fn is_complete(&self) -> bool {
        !self.date.trim().is_empty() && !self.time.trim().is_empty()
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    pub fn parsed_time(&self) -> Option<NaiveTime> {
        let time = self.time.trim();
        NaiveTime::parse_from_str(time, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .ok()
    }
}

/// A booking item as returned by the bookings endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingItemRecord {
    pub id: String,
    #[serde(default)]
    pub patient: Option<i64>,
    #[serde(default)]
    pub patient_detail: Option<PatientRef>,
    #[serde(default)]
    pub lab_test: Option<i64>,
    #[serde(default)]
    pub lab_test_detail: Option<CatalogEntry>,
    #[serde(default)]
    pub profile: Option<i64>,
    #[serde(default)]
    pub profile_detail: Option<CatalogEntry>,
    #[serde(default)]
    pub package: Option<i64>,
    #[serde(default)]
    pub package_detail: Option<CatalogEntry>,
    #[serde(default, deserialize_with = "money::lenient_opt")]
    pub base_price: Option<Decimal>,
    #[serde(default, deserialize_with = "money::lenient_opt")]
    pub offer_price: Option<Decimal>,
}

impl BookingItemRecord {
    /// Map into an editable draft item.
    ///
    /// The product kind follows the first id set in `lab_test`, `profile`,
    /// `package` order. Prices fall back to the catalog detail when the item
    /// does not carry its own.
    pub fn to_draft(&self) -> RecordResult<BookingItemDraft> {
        let (kind, product_id, detail) = if let Some(id) = self.lab_test {
            (ProductKind::LabTest, id, self.lab_test_detail.as_ref())
        } else if let Some(id) = self.profile {
            (ProductKind::LabProfile, id, self.profile_detail.as_ref())
        } else if let Some(id) = self.package {
            (ProductKind::LabPackage, id, self.package_detail.as_ref())
        } else {
            return Err(RecordError::MissingProduct(self.id.clone()));
        };

        let patient = match (&self.patient_detail, self.patient) {
            (Some(detail), _) => detail.clone(),
            (None, Some(id)) => PatientRef::new(id, "", ""),
            (None, None) => return Err(RecordError::MissingPatient(self.id.clone())),
        };

        let base_price = self
            .base_price
            .or_else(|| detail.map(|d| d.price))
            .unwrap_or_default();
        let offer_price = self
            .offer_price
            .or_else(|| detail.map(CatalogEntry::effective_offer_price))
            .unwrap_or_default();

        Ok(BookingItemDraft {
            id: self.id.clone(),
            patient,
            product: ProductRef::new(
                kind,
                product_id,
                detail.map(|d| d.name.clone()).unwrap_or_default(),
            ),
            base_price,
            offer_price,
        })
    }
}

/// A booking as returned by the bookings endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRecord {
    pub id: String,
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub user: Option<i64>,
    #[serde(default)]
    pub user_detail: Option<CustomerRef>,
    #[serde(default)]
    pub address: Option<i64>,
    #[serde(default)]
    pub address_detail: Option<AddressRef>,
    #[serde(default)]
    pub coupon: Option<i64>,
    #[serde(default)]
    pub coupon_detail: Option<CouponRef>,
    #[serde(default, deserialize_with = "money::lenient")]
    pub base_total: Decimal,
    #[serde(default, deserialize_with = "money::lenient")]
    pub offer_total: Decimal,
    #[serde(default, deserialize_with = "money::lenient")]
    pub discount_amount: Decimal,
    #[serde(default, deserialize_with = "money::lenient")]
    pub coupon_discount: Decimal,
    #[serde(default, deserialize_with = "money::lenient")]
    pub admin_discount: Decimal,
    #[serde(default, deserialize_with = "money::lenient")]
    pub final_amount: Decimal,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<String>,
    #[serde(default)]
    pub scheduled_time: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub items: Vec<BookingItemRecord>,
}

impl BookingRecord {
    /// Map all items into drafts, preserving server order.
    pub fn to_items(&self) -> RecordResult<Vec<BookingItemDraft>> {
        self.items.iter().map(BookingItemRecord::to_draft).collect()
    }

    pub fn schedule(&self) -> Schedule {
        Schedule::new(
            self.scheduled_date.clone().unwrap_or_default(),
            self.scheduled_time.clone().unwrap_or_default(),
        )
    }

    /// Applied coupon; a bare id is kept even when the detail is missing.
    pub fn coupon_ref(&self) -> Option<CouponRef> {
        match (&self.coupon_detail, self.coupon) {
            (Some(detail), _) => Some(detail.clone()),
            (None, Some(id)) => Some(CouponRef::new(id, "")),
            (None, None) => None,
        }
    }

    /// Address id, from the plain field or the detail.
    pub fn address_id(&self) -> Option<i64> {
        self.address
            .or_else(|| self.address_detail.as_ref().map(|a| a.id))
    }

    /// Customer id, from the plain field or the detail.
    pub fn user_id(&self) -> Option<i64> {
        self.user.or_else(|| self.user_detail.as_ref().map(|u| u.id))
    }
}
