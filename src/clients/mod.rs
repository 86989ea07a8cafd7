//! Typed handles the rest of the program uses instead of raw channels.

pub mod action_client;
pub mod store_client;

pub use action_client::*;
pub use store_client::*;
