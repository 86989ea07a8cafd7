//! # Tabular Entities & Closed Label Sets
//!
//! Every record the store manages (items, users, transactions) projects itself onto a
//! fixed five-column row for display, and sorts by an identity key. The variant enums
//! (item kinds, appliance types, hardware categories, user kinds) are closed label sets
//! that the forms parse user text against.

use std::fmt::Debug;

/// Number of columns in every projected row.
pub const COLUMNS: usize = 5;

/// A projected table row. Column meaning depends on the table kind.
pub type Row = [String; COLUMNS];

/// Trait that any record shown in a table must implement.
///
/// # Architecture Note
/// The surrounding UI never looks inside an entity. It only asks for the sort key and
/// the row, so the same rendering path works for items, users and transactions.
pub trait Tabular {
    /// Identity key used for ordering (string order for items, numeric for users).
    type Key: Ord + Clone + Debug;

    fn sort_key(&self) -> Self::Key;

    /// Canonical row projection.
    fn to_row(&self) -> Row;
}

/// A closed set of variants, each with a fixed human-readable label.
///
/// Lookup is a linear scan over [`Labeled::ALL`]; an unknown label yields `None`,
/// which the owning form rule treats as a validation failure.
pub trait Labeled: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Every variant, in presentation order.
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Exact, case-sensitive match against the fixed labels.
    fn from_label(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|variant| variant.label() == text)
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|variant| variant.label()).collect()
    }

    /// Joins the labels as `"A, B, or C"` for error messages.
    fn label_list() -> String {
        match Self::labels().split_last() {
            Some((last, [])) => (*last).to_string(),
            Some((last, rest)) => format!("{}, or {}", rest.join(", "), last),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Shade {
        Light,
        Dark,
        Mid,
    }

    impl Labeled for Shade {
        const ALL: &'static [Self] = &[Self::Light, Self::Dark, Self::Mid];

        fn label(self) -> &'static str {
            match self {
                Self::Light => "Light",
                Self::Dark => "Dark",
                Self::Mid => "Mid Tone",
            }
        }
    }

    #[test]
    fn test_from_label_requires_exact_match() {
        assert_eq!(Shade::from_label("Dark"), Some(Shade::Dark));
        assert_eq!(Shade::from_label("Mid Tone"), Some(Shade::Mid));
        assert_eq!(Shade::from_label("dark"), None);
        assert_eq!(Shade::from_label(" Dark"), None);
        assert_eq!(Shade::from_label(""), None);
    }

    #[test]
    fn test_label_list_formatting() {
        assert_eq!(Shade::label_list(), "Light, Dark, or Mid Tone");
    }
}
