//! Selection forms that pick the target of an edit workflow.

use crate::framework::{FieldRule, PromptSequence, RuleContext};
use crate::model::{parse_positive, Form, StoreView};

fn existing_item(message: &'static str) -> FieldRule<StoreView> {
    FieldRule::new("Item ID", message, |raw, ctx: &RuleContext<'_, StoreView>| {
        ctx.view().item_by_raw(raw).is_some()
    })
}

/// Item id (must exist) and a positive amount.
pub fn add_quantity() -> Form {
    PromptSequence::new(
        "Add Quantity",
        vec![
            existing_item("Please enter the item ID of the item you would like to add quantity to."),
            // Bounded by what the item's stock can still hold.
            FieldRule::new(
                "Quantity",
                "Please enter a positive integer value.",
                |raw, ctx: &RuleContext<'_, StoreView>| {
                    let stock = ctx
                        .earlier(0)
                        .and_then(|item_id| ctx.view().item_by_raw(item_id))
                        .map(|item| item.quantity);
                    matches!((stock, parse_positive(raw)), (Some(stock), Some(added)) if stock.checked_add(added).is_some())
                },
            ),
        ],
    )
}

pub fn delete_item() -> Form {
    PromptSequence::new(
        "Delete Item",
        vec![existing_item(
            "Please enter an item ID for the item you wish to delete. (Use the table)",
        )],
    )
}

pub fn select_user() -> Form {
    PromptSequence::new(
        "Update User",
        vec![FieldRule::new(
            "User ID",
            "Please choose an existing user ID. (Use the table.)",
            |raw, ctx: &RuleContext<'_, StoreView>| ctx.view().user_by_raw(raw).is_some(),
        )],
    )
}
