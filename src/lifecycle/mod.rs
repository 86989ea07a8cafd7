//! Runtime orchestration and lifecycle management.
//!
//! # Main Components
//!
//! - [`StoreSystem`] - Loads the snapshot, runs the store actor, saves on shutdown
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod store_system;
pub mod tracing;

pub use self::tracing::*;
pub use store_system::*;
