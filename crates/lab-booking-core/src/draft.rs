//! Booking draft: the single editor behind both "new booking" and "edit booking".
//!
//! A draft owns the editable state (items, schedule, coupon, admin discount,
//! address). In edit mode it also owns the snapshot taken at load time, which
//! decides whether a submit needs confirmation and which action tag it carries.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::diff::{detect, ChangeSet, ChangeSnapshot, EditState};
use crate::models::{
    BookingItemDraft, BookingRecord, CouponRef, CouponValidation, RecordError, Schedule,
};
use crate::payload::{BookingPayload, ChangeNote, PayloadInput};
use crate::pricing::money::{require_in_range, round_money, AmountError};
use crate::pricing::{aggregate, quote, CouponError, CouponState, PricingSnapshot};
use crate::service::{BookingGateway, CouponValidator, ServiceError, ServiceResult};

/// Local validation failures. Nothing is sent while one is outstanding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Add at least one test, profile or package")]
    NoItems,

    #[error("Select a collection date and time")]
    MissingSchedule,

    #[error("Invalid collection date: {0}")]
    InvalidScheduleDate(String),

    #[error("Invalid collection time: {0}")]
    InvalidScheduleTime(String),

    #[error("Select a collection address")]
    MissingAddress,

    #[error("The order changed since the coupon was applied; apply it again")]
    CouponStale,

    #[error("Remarks are required")]
    MissingRemarks,

    #[error("Admin discount cannot be negative")]
    NegativeAdminDiscount,

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error("Select a status")]
    MissingStatus,

    #[error("Select a payment method")]
    MissingPaymentMethod,
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DraftError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Coupon(#[from] CouponError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Submission failed: {0}")]
    Submission(#[from] ServiceError),
}

pub type DraftResult<T> = Result<T, DraftError>;

/// What the draft will do on submit.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftMode {
    /// New booking for a customer
    Create { user: i64 },
    /// Existing booking, with its load-time snapshot
    Edit {
        booking_id: String,
        snapshot: ChangeSnapshot,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    mode: DraftMode,
    items: Vec<BookingItemDraft>,
    schedule: Schedule,
    coupon: CouponState,
    admin_discount: Decimal,
    address: Option<i64>,
    created_at: String,
    updated_at: String,
}

impl BookingDraft {
    /// Empty draft for a new booking.
    pub fn create(user: i64, address: Option<i64>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            mode: DraftMode::Create { user },
            items: Vec::new(),
            schedule: Schedule::default(),
            coupon: CouponState::new(),
            admin_discount: Decimal::ZERO,
            address,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Draft for editing a loaded booking. The snapshot is taken here.
    pub fn edit(record: &BookingRecord) -> DraftResult<Self> {
        let items = record.to_items()?;
        let schedule = record.schedule();
        let coupon_ref = record.coupon_ref();
        let admin_discount = record.admin_discount;

        let snapshot =
            ChangeSnapshot::capture(&schedule, &items, coupon_ref.as_ref(), admin_discount);
        let base = round_money(aggregate(&items).base);
        let coupon = CouponState::restored(coupon_ref, record.coupon_discount, base);

        tracing::debug!(booking_id = %record.id, items = items.len(), "booking loaded for edit");

        let now = chrono::Utc::now().to_rfc3339();
        Ok(Self {
            mode: DraftMode::Edit {
                booking_id: record.id.clone(),
                snapshot,
            },
            items,
            schedule,
            coupon,
            admin_discount,
            address: record.address_id(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn mode(&self) -> &DraftMode {
        &self.mode
    }

    /// Server id of the booking being edited.
    pub fn booking_id(&self) -> Option<&str> {
        match &self.mode {
            DraftMode::Edit { booking_id, .. } => Some(booking_id),
            DraftMode::Create { .. } => None,
        }
    }

    pub fn items(&self) -> &[BookingItemDraft] {
        &self.items
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn coupon(&self) -> &CouponState {
        &self.coupon
    }

    pub fn admin_discount(&self) -> Decimal {
        self.admin_discount
    }

    pub fn address(&self) -> Option<i64> {
        self.address
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn updated_at(&self) -> &str {
        &self.updated_at
    }

    pub fn add_item(&mut self, item: BookingItemDraft) {
        self.items.push(item);
        self.touch();
    }

    /// Remove an item by id. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn set_schedule(&mut self, schedule: Schedule) {
        self.schedule = schedule;
        self.touch();
    }

    pub fn set_address(&mut self, address: Option<i64>) {
        self.address = address;
        self.touch();
    }

    pub fn select_coupon(&mut self, coupon: Option<CouponRef>) {
        self.coupon.select(coupon);
        self.touch();
    }

    /// Validate the selected coupon against the current base total.
    pub fn apply_coupon<V>(&mut self, validator: &V) -> Result<Decimal, CouponError>
    where
        V: CouponValidator + ?Sized,
    {
        let base = self.base_total();
        self.touch();
        self.coupon.apply(validator, base)
    }

    /// Apply a coupon validation the host performed itself.
    pub fn record_coupon_outcome(
        &mut self,
        outcome: ServiceResult<CouponValidation>,
    ) -> Result<Decimal, CouponError> {
        let base = self.base_total();
        self.touch();
        self.coupon.record(base, outcome)
    }

    pub fn clear_coupon(&mut self) {
        self.coupon.clear();
        self.touch();
    }

    pub fn apply_admin_discount(&mut self, amount: Decimal) -> ValidationResult<()> {
        if amount < Decimal::ZERO {
            return Err(ValidationError::NegativeAdminDiscount);
        }
        self.admin_discount = round_money(require_in_range(amount, "admin_discount")?);
        self.touch();
        Ok(())
    }

    /// Current pricing, recomputed from scratch.
    pub fn pricing(&self) -> PricingSnapshot {
        quote(&self.items, self.coupon.discount(), self.admin_discount)
    }

    /// First local rule the draft breaks, if any.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.items.is_empty() {
            return Err(ValidationError::NoItems);
        }
        if !self.schedule.is_complete() {
            return Err(ValidationError::MissingSchedule);
        }
        if self.schedule.parsed_date().is_none() {
            return Err(ValidationError::InvalidScheduleDate(self.schedule.date.clone()));
        }
        if self.schedule.parsed_time().is_none() {
            return Err(ValidationError::InvalidScheduleTime(self.schedule.time.clone()));
        }
        if self.address.is_none() {
            return Err(ValidationError::MissingAddress);
        }
        if self.coupon.is_stale(self.base_total()) {
            return Err(ValidationError::CouponStale);
        }
        Ok(())
    }

    /// Changes since load. Always `None` for a new booking.
    pub fn review(&self) -> Option<ChangeSet> {
        match &self.mode {
            DraftMode::Edit { snapshot, .. } => Some(detect(snapshot, &self.edit_state())),
            DraftMode::Create { .. } => None,
        }
    }

    /// Validate and build the request body.
    ///
    /// In edit mode, detected changes must be confirmed with non-empty
    /// remarks; the primary action tag and the remarks are then attached.
    pub fn build_payload(&self, remarks: &str) -> DraftResult<BookingPayload> {
        self.validate()?;

        let pricing = self.pricing();
        let input = PayloadInput {
            items: &self.items,
            pricing: &pricing,
            coupon: self.coupon.selected(),
            address: self.address,
            schedule: &self.schedule,
        };

        let payload = match &self.mode {
            DraftMode::Create { user } => BookingPayload::for_create(&input, Some(*user)),
            DraftMode::Edit { snapshot, .. } => {
                let changes = detect(snapshot, &self.edit_state());
                changes.confirm(remarks)?;
                let note = changes.action.map(|action| ChangeNote {
                    action,
                    remarks: remarks.trim().to_string(),
                });
                BookingPayload::for_update(&input, note)
            }
        };
        Ok(payload)
    }

    /// Build the body and send it. The draft is left as it was on failure.
    pub fn submit<G>(&self, gateway: &G, remarks: &str) -> DraftResult<BookingRecord>
    where
        G: BookingGateway + ?Sized,
    {
        let payload = self.build_payload(remarks)?;

        let result = match &self.mode {
            DraftMode::Create { user } => {
                tracing::info!(user, items = payload.items.len(), "creating booking");
                gateway.create_booking(&payload)
            }
            DraftMode::Edit { booking_id, .. } => {
                tracing::info!(
                    %booking_id,
                    action = ?payload.action_type,
                    "updating booking"
                );
                gateway.update_booking(booking_id, &payload)
            }
        };

        result.map_err(|err| {
            tracing::warn!(error = %err, "booking submission failed");
            DraftError::Submission(err)
        })
    }

    fn base_total(&self) -> Decimal {
        round_money(aggregate(&self.items).base)
    }

    fn edit_state(&self) -> EditState<'_> {
        EditState {
            schedule: &self.schedule,
            items: &self.items,
            coupon: self.coupon.selected(),
            admin_discount: self.admin_discount,
        }
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}
