//! Patient, customer and address references.
//!
//! The booking engine never owns these entities; it only carries the id and
//! enough display fields to describe an item.

use serde::{Deserialize, Serialize};

/// A patient a booking item is for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientRef {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl PatientRef {
    pub fn new(id: i64, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last", trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// The customer (account holder) a booking belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerRef {
    pub id: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Sample collection address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressRef {
    pub id: i64,
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub pincode: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(PatientRef::new(1, "Asha", "Rao").display_name(), "Asha Rao");
        assert_eq!(PatientRef::new(2, "Asha", "").display_name(), "Asha");
    }

    #[test]
    fn test_patient_detail_decoding_ignores_extra_fields() {
        let patient: PatientRef = serde_json::from_str(
            r#"{"id": 3, "first_name": "Ravi", "last_name": "K", "gender": "M"}"#,
        )
        .unwrap();
        assert_eq!(patient.id, 3);
        assert_eq!(patient.display_name(), "Ravi K");
    }
}
