//! Completed sales. Immutable once committed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::framework::{FieldRule, PromptSequence, Row, RuleContext, Tabular};
use crate::model::{parse_positive, parse_user_id, EntityError, Form, ItemId, StoreView, UserId, UserKind};

const DATE_FORMAT: &str = "%a %b %d %H:%M:%S UTC %Y";

/// A sale as entered in the form, before the store accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub item_id: ItemId,
    pub quantity: u32,
    pub customer_id: UserId,
    pub employee_id: UserId,
}

impl TransactionDraft {
    /// Item id, quantity, customer id and employee id, each checked against the live store view.
    ///
    /// The quantity rule reads whatever is typed in the item id field right now.
    pub fn form() -> Form {
        PromptSequence::new(
            "New Transaction",
            vec![
                FieldRule::new(
                    "Item ID",
                    "Please enter a valid item ID. (Refer to table for valid options)",
                    |raw, ctx: &RuleContext<'_, StoreView>| ctx.view().item_by_raw(raw).is_some(),
                ),
                FieldRule::new(
                    "Quantity",
                    "Please enter a positive integer quantity less than or equal to the remaining stock.",
                    |raw, ctx: &RuleContext<'_, StoreView>| {
                        let stock = ctx
                            .earlier(0)
                            .and_then(|item_id| ctx.view().item_by_raw(item_id))
                            .map(|item| item.quantity);
                        matches!((stock, parse_positive(raw)), (Some(stock), Some(wanted)) if wanted <= stock)
                    },
                ),
                FieldRule::new(
                    "Customer ID",
                    "Please enter a valid customer ID. (Refer to table for valid options)",
                    |raw, ctx: &RuleContext<'_, StoreView>| {
                        ctx.view().user_by_raw(raw).is_some_and(|user| user.is(UserKind::Customer))
                    },
                ),
                FieldRule::new(
                    "Employee ID",
                    "Please enter a valid employee ID. (Refer to table for valid options)",
                    |raw, ctx: &RuleContext<'_, StoreView>| {
                        ctx.view().user_by_raw(raw).is_some_and(|user| user.is(UserKind::Employee))
                    },
                ),
            ],
        )
    }

    pub fn from_fields(fields: &[String]) -> Result<Self, EntityError> {
        let [item_id, quantity, customer_id, employee_id] = fields else {
            return Err(EntityError::FieldCount {
                expected: 4,
                actual: fields.len(),
            });
        };
        Ok(Self {
            item_id: ItemId::parse(item_id)?,
            quantity: parse_positive(quantity)
                .ok_or_else(|| EntityError::invalid("Quantity", "must be a positive integer"))?,
            customer_id: parse_user_id(customer_id)
                .ok_or_else(|| EntityError::invalid("Customer ID", "must be a number"))?,
            employee_id: parse_user_id(employee_id)
                .ok_or_else(|| EntityError::invalid("Employee ID", "must be a number"))?,
        })
    }

    pub fn commit(self, timestamp: DateTime<Utc>) -> Transaction {
        Transaction {
            item_id: self.item_id,
            quantity: self.quantity,
            customer_id: self.customer_id,
            employee_id: self.employee_id,
            timestamp,
        }
    }
}

/// A committed sale. References items and users by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub item_id: ItemId,
    pub quantity: u32,
    pub customer_id: UserId,
    pub employee_id: UserId,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub fn sale_date(&self) -> String {
        self.timestamp.format(DATE_FORMAT).to_string()
    }
}

impl Tabular for Transaction {
    type Key = DateTime<Utc>;

    fn sort_key(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn to_row(&self) -> Row {
        [
            self.item_id.to_string(),
            self.sale_date(),
            self.quantity.to_string(),
            self.customer_id.to_string(),
            self.employee_id.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, ItemKind, User};
    use chrono::TimeZone;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn view() -> StoreView {
        StoreView {
            items: vec![Item::from_fields(ItemKind::Hardware, &fields(&["A1B2C", "Drill", "10", "49.99", "Other"])).unwrap()],
            users: vec![
                User::from_fields(UserId(1), UserKind::Customer, &fields(&["Bo", "Diaz", "555-123-4567", "1 Main"])).unwrap(),
                User::from_fields(UserId(2), UserKind::Employee, &fields(&["Ann", "Lee", "123456789", "52000"])).unwrap(),
            ],
        }
    }

    #[test]
    fn test_valid_sale_passes() {
        let form = TransactionDraft::form();
        assert!(form.validate(&fields(&["a1b2c", "3", "1", "2"]), &view()).is_ok());
    }

    #[test]
    fn test_quantity_is_bounded_by_stock() {
        let form = TransactionDraft::form();
        assert!(form.validate(&fields(&["A1B2C", "10", "1", "2"]), &view()).is_ok());
        let failure = form.validate(&fields(&["A1B2C", "11", "1", "2"]), &view()).unwrap_err();
        assert_eq!(failure.label, "Quantity");
        assert_eq!(form.validate(&fields(&["A1B2C", "0", "1", "2"]), &view()).unwrap_err().label, "Quantity");
    }

    #[test]
    fn test_user_roles_are_checked() {
        let form = TransactionDraft::form();
        // Customer and employee swapped.
        assert_eq!(form.validate(&fields(&["A1B2C", "1", "2", "1"]), &view()).unwrap_err().label, "Customer ID");
        assert_eq!(form.validate(&fields(&["A1B2C", "1", "1", "1"]), &view()).unwrap_err().label, "Employee ID");
        assert_eq!(form.validate(&fields(&["A1B2C", "1", "9", "2"]), &view()).unwrap_err().label, "Customer ID");
    }

    #[test]
    fn test_unknown_item_fails_first() {
        let form = TransactionDraft::form();
        assert_eq!(form.validate(&fields(&["ZZZZZ", "1", "1", "2"]), &view()).unwrap_err().label, "Item ID");
    }

    #[test]
    fn test_row_and_date_format() {
        let draft = TransactionDraft::from_fields(&fields(&["a1b2c", "3", "1", "2"])).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let sale = draft.commit(at);
        assert_eq!(
            sale.to_row(),
            ["A1B2C", "Tue Mar 05 14:07:09 UTC 2024", "3", "1", "2"].map(String::from)
        );
    }
}
