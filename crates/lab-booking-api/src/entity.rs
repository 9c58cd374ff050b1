//! Typed API resources.

use lab_booking_core::ProductKind;

/// Every resource the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    LabTest,
    LabProfile,
    LabPackage,
    LabCategory,
    Coupon,
    Booking,
}

impl EntityType {
    /// Collection path relative to the API root.
    pub fn path(&self) -> &'static str {
        match self {
            EntityType::LabTest => "crm/lab-tests/",
            EntityType::LabProfile => "crm/lab-profiles/",
            EntityType::LabPackage => "crm/lab-packages/",
            EntityType::LabCategory => "crm/lab-category/",
            EntityType::Coupon => "coupons/",
            EntityType::Booking => "bookings/",
        }
    }

    /// Path of a single resource.
    pub fn detail_path(&self, id: &str) -> String {
        format!("{}{}/", self.path(), id.trim_matches('/'))
    }
}

impl From<ProductKind> for EntityType {
    fn from(kind: ProductKind) -> Self {
        match kind {
            ProductKind::LabTest => EntityType::LabTest,
            ProductKind::LabProfile => EntityType::LabProfile,
            ProductKind::LabPackage => EntityType::LabPackage,
        }
    }
}

/// Coupon validation endpoint.
pub const COUPON_VALIDATE_PATH: &str = "coupons/validate/";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(EntityType::from(ProductKind::LabProfile).path(), "crm/lab-profiles/");
        assert_eq!(EntityType::LabCategory.path(), "crm/lab-category/");
        assert_eq!(EntityType::Booking.detail_path("bk-1"), "bookings/bk-1/");
    }
}
