//! Audit action types recorded with booking updates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classifying label the server records for a booking change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Items added, removed or repriced
    UpdateItems,
    /// Collection date/time moved
    UpdateSchedule,
    /// Coupon or admin discount changed
    UpdateDiscounts,
    /// Booking status changed
    UpdateStatus,
    /// Payment method/status recorded
    UpdatePayment,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::UpdateItems => "update_items",
            ActionType::UpdateSchedule => "update_schedule",
            ActionType::UpdateDiscounts => "update_discounts",
            ActionType::UpdateStatus => "update_status",
            ActionType::UpdatePayment => "update_payment",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
