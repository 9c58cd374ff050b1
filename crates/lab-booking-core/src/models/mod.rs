//! Domain models for lab bookings.

mod action;
mod booking;
mod catalog;
mod coupon;
mod patient;

pub use action::*;
pub use booking::*;
pub use catalog::*;
pub use coupon::*;
pub use patient::*;
