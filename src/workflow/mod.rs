//! # Interactive Workflows
//!
//! One async function per action trigger. Each runs inside a gate session, asks the
//! interaction role for input through its [`InputClient`], and applies its result to the
//! store only at the very end. A cancel at any prompt returns before anything is applied,
//! apart from the user id reservation in [`create_user`](user::create_user), which is
//! released on every non-commit path.
//!
//! ## Flow
//! ```text
//! trigger ─▶ gate.try_begin ─▶ [chooser] ─▶ form (repeat until valid) ─▶ store mutation
//!                 │                 │                │
//!              Busy ◀─┘          cancel ──────────▶ Cancelled (nothing applied)
//! ```

pub mod error;
pub mod forms;
mod item;
mod transaction;
mod user;

pub use error::WorkflowError;

use tracing::{info, warn};

use crate::clients::StoreClient;
use crate::framework::{InputClient, Labeled};

/// Every action the UI can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    CreateItem,
    CreateUser,
    CreateTransaction,
    AddQuantity,
    DeleteItem,
    UpdateUser,
}

impl WorkflowKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateItem => "create item",
            Self::CreateUser => "create user",
            Self::CreateTransaction => "create transaction",
            Self::AddQuantity => "add quantity",
            Self::DeleteItem => "delete item",
            Self::UpdateUser => "update user",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Committed,
    Cancelled,
    /// Another workflow held the gate (or the store was shutting down).
    Busy,
}

/// What a workflow may touch: the store, and its own session-bound input channel.
#[derive(Clone)]
pub struct WorkflowContext {
    pub store: StoreClient,
    pub input: InputClient,
}

/// Runs one workflow to completion. Cancellation is an outcome, not an error.
pub async fn run(kind: WorkflowKind, ctx: &WorkflowContext) -> Result<WorkflowOutcome, WorkflowError> {
    info!(workflow = kind.name(), "User chose {}", kind.name());
    let result = match kind {
        WorkflowKind::CreateItem => item::create_item(ctx).await,
        WorkflowKind::CreateUser => user::create_user(ctx).await,
        WorkflowKind::CreateTransaction => transaction::create_transaction(ctx).await,
        WorkflowKind::AddQuantity => item::add_quantity(ctx).await,
        WorkflowKind::DeleteItem => item::delete_item(ctx).await,
        WorkflowKind::UpdateUser => user::update_user(ctx).await,
    };

    match result {
        Ok(()) => Ok(WorkflowOutcome::Committed),
        Err(WorkflowError::Cancelled) => {
            warn!(workflow = kind.name(), "User cancelled, nothing applied");
            Ok(WorkflowOutcome::Cancelled)
        }
        Err(e) => {
            warn!(workflow = kind.name(), error = %e, "Workflow failed");
            Err(e)
        }
    }
}

/// Asks which variant to build. A cancel here cancels the workflow.
async fn choose<L: Labeled>(input: &InputClient, title: &str) -> Result<L, WorkflowError> {
    let index = input.choose(title, L::labels()).await?;
    L::ALL.get(index).copied().ok_or(WorkflowError::Cancelled)
}
