use crate::model::{parse_positive, EntityError, Item, ItemId, ItemKind};
use crate::workflow::{choose, forms, WorkflowContext, WorkflowError};

pub(super) async fn create_item(ctx: &WorkflowContext) -> Result<(), WorkflowError> {
    let kind: ItemKind = choose(&ctx.input, "Which kind of item?").await?;
    let values = kind.form().run(&ctx.input, &ctx.store, None).await?;
    let item = Item::from_fields(kind, &values)?;
    ctx.store.add_item(item).await?;
    Ok(())
}

pub(super) async fn add_quantity(ctx: &WorkflowContext) -> Result<(), WorkflowError> {
    let values = forms::add_quantity().run(&ctx.input, &ctx.store, None).await?;
    let [id, amount] = values.as_slice() else {
        return Err(EntityError::FieldCount { expected: 2, actual: values.len() }.into());
    };
    let id = ItemId::parse(id)?;
    let delta = parse_positive(amount)
        .ok_or_else(|| EntityError::invalid("Quantity", "must be a positive integer"))?;
    ctx.store.increase_quantity(id, delta).await?;
    Ok(())
}

pub(super) async fn delete_item(ctx: &WorkflowContext) -> Result<(), WorkflowError> {
    let values = forms::delete_item().run(&ctx.input, &ctx.store, None).await?;
    let [id] = values.as_slice() else {
        return Err(EntityError::FieldCount { expected: 1, actual: values.len() }.into());
    };
    ctx.store.remove_item(ItemId::parse(id)?).await?;
    Ok(())
}
