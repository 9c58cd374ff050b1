//! Positional change detection between a snapshot and the live state.

use super::snapshot::{ChangeSnapshot, EditState};
use super::{ChangeCategory, ChangeSet};
use crate::models::{CouponRef, Schedule};
use crate::pricing::money::format_money;

/// Compare the load-time snapshot against the live state.
///
/// Items are compared index by index, so a reordered list reads as a set of
/// replacements. Entries are listed items first, then schedule, then
/// discounts; the action tag follows the same precedence.
pub fn detect(old: &ChangeSnapshot, new: &EditState<'_>) -> ChangeSet {
    let mut changes = Vec::new();
    let mut categories = Vec::new();

    let item_changes = item_changes(old, new);
    if !item_changes.is_empty() {
        categories.push(ChangeCategory::Items);
        changes.extend(item_changes);
    }

    let schedule_changes = schedule_changes(old.schedule(), new.schedule);
    if !schedule_changes.is_empty() {
        categories.push(ChangeCategory::Schedule);
        changes.extend(schedule_changes);
    }

    let discount_changes = discount_changes(old, new);
    if !discount_changes.is_empty() {
        categories.push(ChangeCategory::Discounts);
        changes.extend(discount_changes);
    }

    let action = categories.first().map(ChangeCategory::action);
    tracing::debug!(changes = changes.len(), action = ?action, "booking changes detected");

    ChangeSet {
        changes,
        categories,
        action,
    }
}

fn item_changes(old: &ChangeSnapshot, new: &EditState<'_>) -> Vec<String> {
    let before = old.items();
    let after = new.items;

    if before.len() != after.len() {
        return vec![format!(
            "Item count changed ({} → {})",
            before.len(),
            after.len()
        )];
    }

    let mut changes = Vec::new();
    for (index, (was, now)) in before.iter().zip(after.iter()).enumerate() {
        let position = index + 1;
        if !was.product.same_entity(&now.product) {
            changes.push(format!(
                "Item #{} changed ({} → {})",
                position, was.product.name, now.product.name
            ));
        }
        if was.base_price != now.base_price || was.offer_price != now.offer_price {
            changes.push(format!(
                "Item #{} price changed (Base {} → {}, Offer {} → {})",
                position,
                format_money(was.base_price),
                format_money(now.base_price),
                format_money(was.offer_price),
                format_money(now.offer_price),
            ));
        }
    }
    changes
}

fn schedule_changes(old: &Schedule, new: &Schedule) -> Vec<String> {
    let mut changes = Vec::new();

    let same_date = match (old.parsed_date(), new.parsed_date()) {
        (Some(a), Some(b)) => a == b,
        _ => old.date.trim() == new.date.trim(),
    };
    if !same_date {
        changes.push(format!(
            "Scheduled date changed from {} → {}",
            display_or_unset(&old.date),
            display_or_unset(&new.date)
        ));
    }

    let same_time = match (old.parsed_time(), new.parsed_time()) {
        (Some(a), Some(b)) => a == b,
        _ => old.time.trim() == new.time.trim(),
    };
    if !same_time {
        changes.push(format!(
            "Scheduled time changed from {} → {}",
            display_or_unset(&old.time),
            display_or_unset(&new.time)
        ));
    }

    changes
}

fn discount_changes(old: &ChangeSnapshot, new: &EditState<'_>) -> Vec<String> {
    let mut changes = Vec::new();

    let old_coupon = old.coupon().map(|c| c.id);
    let new_coupon = new.coupon.map(|c| c.id);
    if old_coupon != new_coupon {
        changes.push(format!(
            "Coupon changed ({} → {})",
            coupon_label(old.coupon()),
            coupon_label(new.coupon)
        ));
    }

    if old.admin_discount() != new.admin_discount {
        changes.push(format!(
            "Admin discount changed from {} → {}",
            format_money(old.admin_discount()),
            format_money(new.admin_discount)
        ));
    }

    changes
}

fn coupon_label(coupon: Option<&CouponRef>) -> String {
    match coupon {
        Some(c) if !c.code.trim().is_empty() => c.code.clone(),
        Some(c) => format!("#{}", c.id),
        None => "none".to_string(),
    }
}

fn display_or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not set)"
    } else {
        value
    }
}
