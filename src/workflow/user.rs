use tracing::{debug, warn};

use crate::framework::Labeled;
use crate::model::{parse_user_id, EntityError, User, UserId, UserKind};
use crate::store_actor::StoreError;
use crate::workflow::{choose, forms, WorkflowContext, WorkflowError};

/// Reserves the next id up front and gives it back unless the user is actually added.
pub(super) async fn create_user(ctx: &WorkflowContext) -> Result<(), WorkflowError> {
    let id = ctx.store.reserve_user_id().await?;
    let result = build_and_add(ctx, id).await;
    if result.is_err() {
        match ctx.store.release_user_id(id).await {
            Ok(true) => debug!(%id, "Reserved user id rolled back"),
            Ok(false) => warn!(%id, "Reserved user id could not be rolled back"),
            Err(e) => warn!(%id, error = %e, "Reserved user id could not be rolled back"),
        }
    }
    result
}

async fn build_and_add(ctx: &WorkflowContext, id: UserId) -> Result<(), WorkflowError> {
    let kind: UserKind = choose(&ctx.input, "Which kind of user?").await?;
    let values = kind
        .form(format!("New {}", kind.label()))
        .run(&ctx.input, &ctx.store, None)
        .await?;
    let user = User::from_fields(id, kind, &values)?;
    ctx.store.add_user(user).await?;
    Ok(())
}

/// Picks an existing user, then re-runs that user's form pre-filled with the current values.
pub(super) async fn update_user(ctx: &WorkflowContext) -> Result<(), WorkflowError> {
    let values = forms::select_user().run(&ctx.input, &ctx.store, None).await?;
    let id = values
        .first()
        .and_then(|raw| parse_user_id(raw))
        .ok_or_else(|| EntityError::invalid("User ID", "must be a number"))?;

    let view = ctx.store.view().await?;
    let current = view.user(id).ok_or(StoreError::UserNotFound(id))?;
    let kind = current.kind();
    let seed = current.seed_values();

    let values = kind
        .form(format!("Update {} {}", kind.label(), id))
        .run(&ctx.input, &ctx.store, Some(&seed))
        .await?;
    ctx.store.replace_user(id, kind, values).await?;
    Ok(())
}
