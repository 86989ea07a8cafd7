//! Store records: items, users and transactions, plus the table projections built from them.
//!
//! Each record is built only from raw form values that its [`Form`] already accepted;
//! the builders re-check every field anyway and return [`EntityError`] on mismatch.

pub mod error;
pub mod item;
pub mod table;
pub mod transaction;
pub mod user;

pub use error::EntityError;
pub use item::{ApplianceType, HardwareCategory, Item, ItemDetails, ItemId, ItemKind};
pub use table::{Table, TableKind};
pub use transaction::{Transaction, TransactionDraft};
pub use user::{User, UserId, UserKind, UserRole};

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::framework::PromptSequence;

/// Forms in this crate validate against a [`StoreView`].
pub type Form = PromptSequence<StoreView>;

/// Read-only copy of the item and user collections, as the rules see them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreView {
    pub items: Vec<Item>,
    pub users: Vec<User>,
}

impl StoreView {
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Looks up an item by the text typed into an id field, ignoring case.
    pub fn item_by_raw(&self, raw: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id.as_str().eq_ignore_ascii_case(raw))
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn user_by_raw(&self, raw: &str) -> Option<&User> {
        parse_user_id(raw).and_then(|id| self.user(id))
    }
}

pub(crate) fn non_empty(raw: &str) -> bool {
    !raw.is_empty()
}

/// Strictly positive integer.
pub(crate) fn parse_positive(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|n| *n > 0)
}

pub(crate) fn parse_user_id(raw: &str) -> Option<UserId> {
    raw.parse::<u32>().ok().map(UserId)
}

/// Strictly positive decimal with no more than `max_scale` fractional digits.
pub(crate) fn parse_positive_decimal(raw: &str, max_scale: Option<u32>) -> Option<Decimal> {
    let value = Decimal::from_str(raw).ok()?;
    if value <= Decimal::ZERO {
        return None;
    }
    match max_scale {
        Some(max) if value.normalize().scale() > max => None,
        _ => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("7"), Some(7));
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive("-3"), None);
        assert_eq!(parse_positive("2.5"), None);
        assert_eq!(parse_positive(""), None);
    }

    #[test]
    fn test_parse_positive_decimal_scale() {
        assert!(parse_positive_decimal("4.5", Some(2)).is_some());
        assert!(parse_positive_decimal("4.50", Some(2)).is_some());
        assert!(parse_positive_decimal("4.500", Some(2)).is_some());
        assert!(parse_positive_decimal("4.505", Some(2)).is_none());
        assert!(parse_positive_decimal("0", Some(2)).is_none());
        assert!(parse_positive_decimal("-1.00", Some(2)).is_none());
        assert!(parse_positive_decimal("abc", None).is_none());
        assert!(parse_positive_decimal("52000.125", None).is_some());
    }
}
