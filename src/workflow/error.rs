use thiserror::Error;

use crate::framework::{Cancelled, PromptError};
use crate::model::EntityError;
use crate::store_actor::StoreError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Not a failure: the user (or shutdown) aborted. Mapped to an outcome by [`run`](super::run).
    #[error("Workflow cancelled")]
    Cancelled,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error("Workflow task failed: {0}")]
    Task(String),
}

impl From<Cancelled> for WorkflowError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl From<PromptError<StoreError>> for WorkflowError {
    fn from(error: PromptError<StoreError>) -> Self {
        match error {
            PromptError::Cancelled => Self::Cancelled,
            PromptError::Source(e) => Self::Store(e),
        }
    }
}
