//! Inventory items: appliances and hardware items.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::framework::{FieldRule, Labeled, PromptSequence, Row, Tabular};
use crate::model::{non_empty, parse_positive, parse_positive_decimal, EntityError, Form, StoreView};

lazy_static! {
    static ref ITEM_ID: Regex = Regex::new(r"^[a-zA-Z0-9]{5}$").expect("item id pattern");
}

const PRICE_SCALE: u32 = 2;

/// Five alphanumeric characters, always stored upper case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn parse(raw: &str) -> Result<Self, EntityError> {
        if ITEM_ID.is_match(raw) {
            Ok(Self(raw.to_uppercase()))
        } else {
            Err(EntityError::invalid("ID", "Please enter 5 alphanumeric characters."))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplianceType {
    Refrigerators,
    WashersAndDryers,
    RangesAndOvens,
    SmallAppliances,
}

impl Labeled for ApplianceType {
    const ALL: &'static [Self] = &[
        Self::Refrigerators,
        Self::WashersAndDryers,
        Self::RangesAndOvens,
        Self::SmallAppliances,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Refrigerators => "Refrigerators",
            Self::WashersAndDryers => "Washers&Dryers",
            Self::RangesAndOvens => "Ranges&Ovens",
            Self::SmallAppliances => "Small Appliances",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HardwareCategory {
    DoorAndWindow,
    CabinetAndFurniture,
    Fasteners,
    Structural,
    Other,
}

impl Labeled for HardwareCategory {
    const ALL: &'static [Self] = &[
        Self::DoorAndWindow,
        Self::CabinetAndFurniture,
        Self::Fasteners,
        Self::Structural,
        Self::Other,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::DoorAndWindow => "Door&Window",
            Self::CabinetAndFurniture => "Cabinet&Furniture",
            Self::Fasteners => "Fasteners",
            Self::Structural => "Structural",
            Self::Other => "Other",
        }
    }
}

/// Which item variant a create workflow builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Appliance,
    Hardware,
}

impl Labeled for ItemKind {
    const ALL: &'static [Self] = &[Self::Appliance, Self::Hardware];

    fn label(self) -> &'static str {
        match self {
            Self::Appliance => "Appliance",
            Self::Hardware => "Hardware Item",
        }
    }
}

impl ItemKind {
    /// The create form for this variant: the four shared fields, then the variant's own.
    pub fn form(self) -> Form {
        let mut rules = shared_rules();
        match self {
            Self::Appliance => {
                rules.push(FieldRule::simple(
                    "Brand",
                    "Please enter a brand with at least 1 character.",
                    non_empty,
                ));
                rules.push(FieldRule::simple(
                    "Type",
                    format!("Please enter the type from {}", ApplianceType::label_list()),
                    |raw| ApplianceType::from_label(raw).is_some(),
                ));
            }
            Self::Hardware => {
                rules.push(FieldRule::simple(
                    "Category",
                    format!("Please enter a category from {}", HardwareCategory::label_list()),
                    |raw| HardwareCategory::from_label(raw).is_some(),
                ));
            }
        }
        PromptSequence::new(format!("New {}", self.label()), rules)
    }

    pub fn field_count(self) -> usize {
        match self {
            Self::Appliance => 6,
            Self::Hardware => 5,
        }
    }
}

fn shared_rules() -> Vec<FieldRule<StoreView>> {
    vec![
        FieldRule::simple("ID", "Please enter 5 alphanumeric characters.", |raw| {
            ITEM_ID.is_match(raw)
        }),
        FieldRule::simple("Name", "Please enter a name with at least 1 character.", non_empty),
        FieldRule::simple("Quantity", "Please enter a positive integer quantity.", |raw| {
            parse_positive(raw).is_some()
        }),
        FieldRule::simple(
            "Price",
            "Please enter a price with at most 2 decimal digit accuracy.",
            |raw| parse_positive_decimal(raw, Some(PRICE_SCALE)).is_some(),
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant")]
pub enum ItemDetails {
    Appliance { brand: String, kind: ApplianceType },
    Hardware { category: HardwareCategory },
}

/// A stocked product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub quantity: u32,
    /// Always carries exactly two fractional digits.
    pub price: Decimal,
    pub details: ItemDetails,
}

impl Item {
    /// Builds an item from the raw values of its variant's form, in field order.
    pub fn from_fields(kind: ItemKind, fields: &[String]) -> Result<Self, EntityError> {
        if fields.len() != kind.field_count() {
            return Err(EntityError::FieldCount {
                expected: kind.field_count(),
                actual: fields.len(),
            });
        }

        let details = match (kind, &fields[4..]) {
            (ItemKind::Appliance, [brand, type_label]) => {
                if !non_empty(brand) {
                    return Err(EntityError::invalid("Brand", "must not be empty"));
                }
                ItemDetails::Appliance {
                    brand: brand.clone(),
                    kind: ApplianceType::from_label(type_label)
                        .ok_or_else(|| EntityError::invalid("Type", format!("unknown type '{type_label}'")))?,
                }
            }
            (ItemKind::Hardware, [category]) => ItemDetails::Hardware {
                category: HardwareCategory::from_label(category)
                    .ok_or_else(|| EntityError::invalid("Category", format!("unknown category '{category}'")))?,
            },
            (_, rest) => {
                return Err(EntityError::FieldCount {
                    expected: kind.field_count(),
                    actual: 4 + rest.len(),
                })
            }
        };

        let name = &fields[1];
        if !non_empty(name) {
            return Err(EntityError::invalid("Name", "must not be empty"));
        }
        let quantity = parse_positive(&fields[2])
            .ok_or_else(|| EntityError::invalid("Quantity", "must be a positive integer"))?;
        let mut price = parse_positive_decimal(&fields[3], Some(PRICE_SCALE))
            .ok_or_else(|| EntityError::invalid("Price", "must be positive with at most 2 decimals"))?;
        price.rescale(PRICE_SCALE);

        Ok(Self {
            id: ItemId::parse(&fields[0])?,
            name: name.clone(),
            quantity,
            price,
            details,
        })
    }

    pub fn kind(&self) -> ItemKind {
        match self.details {
            ItemDetails::Appliance { .. } => ItemKind::Appliance,
            ItemDetails::Hardware { .. } => ItemKind::Hardware,
        }
    }

    /// Case-insensitive substring match on the name.
    pub fn name_contains(&self, term: &str) -> bool {
        self.name.to_uppercase().contains(&term.to_uppercase())
    }

    pub fn formatted_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

impl Tabular for Item {
    type Key = ItemId;

    fn sort_key(&self) -> ItemId {
        self.id.clone()
    }

    fn to_row(&self) -> Row {
        let other = match &self.details {
            ItemDetails::Appliance { brand, kind } => format!("Brand: {} Type: {}", brand, kind.label()),
            ItemDetails::Hardware { category } => format!("Category: {}", category.label()),
        };
        [
            self.id.to_string(),
            self.name.clone(),
            self.quantity.to_string(),
            self.formatted_price(),
            other,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_id_is_normalized_to_upper_case() {
        let item = Item::from_fields(ItemKind::Hardware, &fields(&["ab12c", "Hinge", "3", "4.5", "Door&Window"])).unwrap();
        assert_eq!(item.id.as_str(), "AB12C");
        assert_eq!(item.to_row()[0], "AB12C");
    }

    #[test]
    fn test_rows_per_variant() {
        let hinge = Item::from_fields(ItemKind::Hardware, &fields(&["H1NGE", "Hinge", "3", "4.5", "Door&Window"])).unwrap();
        assert_eq!(hinge.to_row(), ["H1NGE", "Hinge", "3", "$4.50", "Category: Door&Window"].map(String::from));

        let fridge = Item::from_fields(
            ItemKind::Appliance,
            &fields(&["FR1DG", "Fridge", "2", "899.99", "Coolco", "Refrigerators"]),
        )
        .unwrap();
        assert_eq!(fridge.to_row()[3], "$899.99");
        assert_eq!(fridge.to_row()[4], "Brand: Coolco Type: Refrigerators");
        assert_eq!(fridge.kind(), ItemKind::Appliance);
    }

    #[test]
    fn test_whole_price_displays_two_decimals() {
        let item = Item::from_fields(ItemKind::Hardware, &fields(&["NAILS", "Nails", "100", "3", "Fasteners"])).unwrap();
        assert_eq!(item.formatted_price(), "$3.00");
    }

    #[test]
    fn test_form_rules_match_builder() {
        let view = StoreView::default();
        let form = ItemKind::Appliance.form();
        assert_eq!(form.labels(), vec!["ID", "Name", "Quantity", "Price", "Brand", "Type"]);

        let bad_type = fields(&["A1B2C", "Drill", "10", "49.99", "Brand", "washers&dryers"]);
        assert_eq!(form.validate(&bad_type, &view).unwrap_err().label, "Type");

        let bad_price = fields(&["A1B2C", "Drill", "10", "49.999", "Brand", "Ranges&Ovens"]);
        assert_eq!(form.validate(&bad_price, &view).unwrap_err().label, "Price");

        let bad_id = fields(&["A1B2", "Drill", "10", "49.99", "Brand", "Ranges&Ovens"]);
        assert_eq!(form.validate(&bad_id, &view).unwrap_err().label, "ID");

        let good = fields(&["A1B2C", "Drill", "10", "49.99", "Brand", "Ranges&Ovens"]);
        assert!(form.validate(&good, &view).is_ok());
        assert!(Item::from_fields(ItemKind::Appliance, &good).is_ok());
    }

    #[test]
    fn test_category_message_lists_all_labels() {
        let form = ItemKind::Hardware.form();
        let failure = form
            .validate(&fields(&["A1B2C", "Bolt", "1", "1", "Lumber"]), &StoreView::default())
            .unwrap_err();
        assert_eq!(
            failure.message,
            "Please enter a category from Door&Window, Cabinet&Furniture, Fasteners, Structural, or Other"
        );
    }

    #[test]
    fn test_builder_rejects_wrong_field_count() {
        let err = Item::from_fields(ItemKind::Hardware, &fields(&["A1B2C", "Bolt", "1"])).unwrap_err();
        assert_eq!(err, EntityError::FieldCount { expected: 5, actual: 3 });
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let item = Item::from_fields(ItemKind::Hardware, &fields(&["A1B2C", "Wood Screw", "1", "1", "Fasteners"])).unwrap();
        assert!(item.name_contains("screw"));
        assert!(item.name_contains("OD S"));
        assert!(item.name_contains(""));
        assert!(!item.name_contains("nail"));
    }
}
