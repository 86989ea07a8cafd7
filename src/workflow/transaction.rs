use crate::model::TransactionDraft;
use crate::workflow::{WorkflowContext, WorkflowError};

/// The form checks against the live view; the store re-checks stock and roles on commit.
pub(super) async fn create_transaction(ctx: &WorkflowContext) -> Result<(), WorkflowError> {
    let values = TransactionDraft::form().run(&ctx.input, &ctx.store, None).await?;
    let draft = TransactionDraft::from_fields(&values)?;
    ctx.store.commit_transaction(draft).await?;
    Ok(())
}
