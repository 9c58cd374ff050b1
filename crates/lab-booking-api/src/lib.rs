//! Lab Booking API Client
//!
//! Blocking HTTP collaborator for [`lab_booking_core`]: validates coupons,
//! loads and submits bookings, and looks up the catalog. Credentials live in
//! an explicit [`Session`] handed to the client at construction.
//!
//! ```text
//! BookingDraft ──► CouponValidator / BookingGateway ──► LabApi ──► HttpClient ──► REST API
//!                                                                     │
//!                                                          Session (Bearer token,
//!                                                           cleared on 401)
//! ```

pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod session;

pub use config::ApiConfig;
pub use entity::EntityType;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use session::Session;

use lab_booking_core::models::{CouponValidationRequest, Page};
use lab_booking_core::service::ServiceResult;
use lab_booking_core::{
    BookingGateway, BookingPayload, BookingRecord, CatalogEntry, CouponRef, CouponValidation,
    CouponValidator, OperationPayload, ProductKind,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Filters for a catalog or coupon listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub ordering: Option<String>,
    /// Catalog category id (catalog endpoints only)
    pub category: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            search: None,
            ordering: None,
            category: None,
        }
    }
}

impl ListQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn with_ordering(mut self, ordering: impl Into<String>) -> Self {
        self.ordering = Some(ordering.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Query pairs; blank filters are left out.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        let optional = [
            ("search", &self.search),
            ("ordering", &self.ordering),
            ("category", &self.category),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                params.push((key, value.to_string()));
            }
        }
        params
    }
}

/// A catalog category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabCategory {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub entity_type: Option<String>,
}

/// High-level client for the lab booking API.
#[derive(Debug, Clone)]
pub struct LabApi {
    http: HttpClient,
}

impl LabApi {
    pub fn new(config: ApiConfig, session: Session) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config, session)?,
        })
    }

    /// Client configured from `LAB_BOOKING_API_*` environment variables.
    pub fn from_env(session: Session) -> ClientResult<Self> {
        Self::new(ApiConfig::from_env(), session)
    }

    pub fn session(&self) -> &Session {
        self.http.session()
    }

    // ========== Catalog ==========

    /// List tests, profiles or packages.
    pub fn list_catalog(
        &self,
        kind: ProductKind,
        query: &ListQuery,
    ) -> ClientResult<Page<CatalogEntry>> {
        let params = query.to_params();
        self.http.get(EntityType::from(kind).path(), &params)
    }

    pub fn list_categories(&self, query: &ListQuery) -> ClientResult<Page<LabCategory>> {
        self.http.get(EntityType::LabCategory.path(), &query.to_params())
    }

    // ========== Coupons ==========

    pub fn list_coupons(&self, query: &ListQuery) -> ClientResult<Page<CouponRef>> {
        self.http.get(EntityType::Coupon.path(), &query.to_params())
    }

    pub fn validate(&self, code: &str, base_total: Decimal) -> ClientResult<CouponValidation> {
        let request = CouponValidationRequest {
            coupon_code: code.to_string(),
            base_total,
        };
        self.http.post(entity::COUPON_VALIDATE_PATH, &request)
    }

    // ========== Bookings ==========

    pub fn get_booking(&self, id: &str) -> ClientResult<BookingRecord> {
        self.http.get(&EntityType::Booking.detail_path(id), &[])
    }

    pub fn create(&self, payload: &BookingPayload) -> ClientResult<BookingRecord> {
        self.http.post(EntityType::Booking.path(), payload)
    }

    pub fn update(&self, id: &str, payload: &BookingPayload) -> ClientResult<BookingRecord> {
        self.http.patch(&EntityType::Booking.detail_path(id), payload)
    }

    pub fn operate(&self, id: &str, payload: &OperationPayload) -> ClientResult<BookingRecord> {
        self.http.patch(&EntityType::Booking.detail_path(id), payload)
    }
}

impl CouponValidator for LabApi {
    fn validate_coupon(&self, code: &str, base_total: Decimal) -> ServiceResult<CouponValidation> {
        Ok(self.validate(code, base_total)?)
    }
}

impl BookingGateway for LabApi {
    fn create_booking(&self, payload: &BookingPayload) -> ServiceResult<BookingRecord> {
        let record = self.create(payload)?;
        tracing::info!(booking_id = %record.id, "booking created");
        Ok(record)
    }

    fn update_booking(
        &self,
        booking_id: &str,
        payload: &BookingPayload,
    ) -> ServiceResult<BookingRecord> {
        let record = self.update(booking_id, payload)?;
        tracing::info!(%booking_id, action = ?payload.action_type, "booking updated");
        Ok(record)
    }

    fn apply_operation(
        &self,
        booking_id: &str,
        payload: &OperationPayload,
    ) -> ServiceResult<BookingRecord> {
        let record = self.operate(booking_id, payload)?;
        tracing::info!(%booking_id, action = %payload.action_type, "booking operation applied");
        Ok(record)
    }
}
