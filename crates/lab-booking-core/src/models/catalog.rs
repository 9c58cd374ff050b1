//! Lab catalog models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::money;

/// Kind of catalog product a booking item points at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// A single lab test
    LabTest,
    /// A profile (bundle of tests)
    LabProfile,
    /// A package (bundle of tests and profiles)
    LabPackage,
}

impl ProductKind {
    /// Wire name, as used in `product_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::LabTest => "lab_test",
            ProductKind::LabProfile => "lab_profile",
            ProductKind::LabPackage => "lab_package",
        }
    }

    /// Name of the item field carrying the product id (`lab_test`, `profile`, `package`).
    pub fn item_field(&self) -> &'static str {
        match self {
            ProductKind::LabTest => "lab_test",
            ProductKind::LabProfile => "profile",
            ProductKind::LabPackage => "package",
        }
    }

    /// Parse a wire name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lab_test" => Some(ProductKind::LabTest),
            "lab_profile" => Some(ProductKind::LabProfile),
            "lab_package" => Some(ProductKind::LabPackage),
            _ => None,
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to exactly one catalog entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductRef {
    pub kind: ProductKind,
    pub id: i64,
    /// Display name (not part of identity)
    pub name: String,
}

impl ProductRef {
    pub fn new(kind: ProductKind, id: i64, name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            name: name.into(),
        }
    }

    /// Two references point at the same catalog entity.
    pub fn same_entity(&self, other: &ProductRef) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

/// A test, profile or package as returned by the catalog endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Catalog (base) price
    #[serde(default, deserialize_with = "money::lenient")]
    pub price: Decimal,
    /// Discounted price, when the catalog offers one
    #[serde(default, deserialize_with = "money::lenient_opt")]
    pub offer_price: Option<Decimal>,
}

impl CatalogEntry {
    /// Offer price, falling back to the base price.
    pub fn effective_offer_price(&self) -> Decimal {
        self.offer_price.unwrap_or(self.price)
    }

    /// Reference to this entry as a product of the given kind.
    pub fn to_ref(&self, kind: ProductKind) -> ProductRef {
        ProductRef::new(kind, self.id, self.name.clone())
    }
}

/// Paginated list response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}
