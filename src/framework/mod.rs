//! Building blocks shared by every workflow.
//!
//! # Main Components
//!
//! - [`Tabular`] / [`Labeled`] - Row projection and closed label sets for entities
//! - [`FieldRule`] / [`PromptSequence`] - Validated, re-prompting forms
//! - [`InputClient`] - Hand-off from a workflow to the interaction role
//! - [`SessionGate`] - At most one interactive workflow at a time
//! - [`Cancelled`] / [`PromptError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for a scripted stand-in for the interaction role.

pub mod entity;
pub mod error;
pub mod gate;
pub mod input;
pub mod mock;
pub mod prompt;

pub use entity::{Labeled, Row, Tabular, COLUMNS};
pub use error::{Cancelled, PromptError};
pub use gate::{CancelSignal, GateError, GateState, SessionGate, SessionTicket};
pub use input::{ChoiceReply, FieldPrompt, FormReply, InputClient, InputRequest};
pub use prompt::{FieldRule, PromptSequence, RuleContext, RuleFailure, ViewSource};
