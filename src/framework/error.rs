//! # Framework Errors
//!
//! Errors raised by the prompt engine and the input hand-off, shared by every workflow.

use thiserror::Error;

/// The user (or a shutdown) aborted the running workflow.
///
/// Carries no data: a cancelled workflow applies nothing, so there is nothing to report
/// beyond the fact that it stopped.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Workflow cancelled")]
pub struct Cancelled;

/// Errors that can end a [`PromptSequence`](crate::framework::PromptSequence) run.
///
/// `E` is the error type of the view source the rules validate against.
#[derive(Debug, Error, PartialEq)]
pub enum PromptError<E> {
    #[error("Workflow cancelled")]
    Cancelled,
    #[error("View source failed: {0}")]
    Source(E),
}

impl<E> From<Cancelled> for PromptError<E> {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
