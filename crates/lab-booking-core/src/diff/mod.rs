//! Change detection for booking edits.
//!
//! A [`ChangeSnapshot`] is taken when a booking is loaded. On submit it is
//! compared against the live [`EditState`]; the resulting [`ChangeSet`] gates
//! submission behind a confirmation with remarks and carries the single
//! action tag recorded for audit.

mod detector;
mod snapshot;

pub use detector::*;
pub use snapshot::*;

use serde::{Deserialize, Serialize};

use crate::draft::ValidationError;
use crate::models::ActionType;

/// Category of a detected change, in precedence order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeCategory {
    Items,
    Schedule,
    Discounts,
}

impl ChangeCategory {
    /// Action tag recorded when this is the primary category.
    pub fn action(&self) -> ActionType {
        match self {
            ChangeCategory::Items => ActionType::UpdateItems,
            ChangeCategory::Schedule => ActionType::UpdateSchedule,
            ChangeCategory::Discounts => ActionType::UpdateDiscounts,
        }
    }
}

/// Outcome of comparing a snapshot with the live state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChangeSet {
    /// Human-readable descriptions, in category order
    pub changes: Vec<String>,
    /// Categories that changed, in precedence order
    pub categories: Vec<ChangeCategory>,
    /// Primary action tag; `None` when nothing changed
    pub action: Option<ActionType>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Changes exist, so the user must confirm them with remarks.
    pub fn requires_confirmation(&self) -> bool {
        !self.is_empty()
    }

    /// Notice shown when several categories changed but only one tag is recorded.
    pub fn warning(&self) -> Option<String> {
        if self.categories.len() < 2 {
            return None;
        }
        self.action.map(|action| {
            format!(
                "Multiple changes detected; only \"{}\" will be recorded.",
                action
            )
        })
    }

    /// Check the confirmation remarks. Remarks are mandatory when anything changed.
    pub fn confirm(&self, remarks: &str) -> Result<(), ValidationError> {
        if self.requires_confirmation() && remarks.trim().is_empty() {
            return Err(ValidationError::MissingRemarks);
        }
        Ok(())
    }
}
