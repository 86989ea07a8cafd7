//! # Hardware Store
//!
//! > **Inventory, people and sales for a single store, behind one actor.**
//!
//! The crate tracks items (appliances and hardware), users (employees and customers) and
//! sales transactions. Every change comes from an interactive *workflow* that collects
//! validated input through a form, and at most one workflow runs at a time.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### One owner for the data
//! The collections live inside a single [`StoreActor`](store_actor::StoreActor) task.
//! Workflows and display code only ever hold a [`StoreClient`](clients::StoreClient), so
//! a table render always sees the state between two complete mutations.
//!
//! ### Forms that cannot be half-applied
//! A workflow gathers everything first and applies it last. Cancelling a form, or the
//! chooser in front of it, returns before anything is written. The only speculative
//! change (the reserved id of a new user) is rolled back on every non-commit path.
//!
//! ### Waiting without polling
//! A workflow asks for input by sending an [`InputRequest`](framework::InputRequest) and
//! awaiting a `oneshot` reply. Between prompts it is parked; cancellation arrives through a
//! `watch` channel owned by the [`SessionGate`](framework::SessionGate).
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Generic pieces with no store knowledge.
//! - **Key items**: [`PromptSequence`](framework::PromptSequence), [`FieldRule`](framework::FieldRule),
//!   [`SessionGate`](framework::SessionGate), [`InputClient`](framework::InputClient).
//!
//! ### 2. The Records ([`model`])
//! Items, users, transactions, their forms, and the table projections built from them.
//!
//! ### 3. The Owner ([`store_actor`])
//! The [`Store`](store_actor::Store) and the actor loop around it.
//!
//! ### 4. The Interface ([`clients`], [`workflow`])
//! [`ActionClient`](clients::ActionClient) is what a UI calls: six action triggers, the
//! four tables, and search. Each trigger runs one function from [`workflow`].
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`persistence`], [`config`])
//! [`StoreSystem`](lifecycle::StoreSystem) loads the snapshot, wires everything together,
//! and saves on shutdown.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Console driver, info logs on stderr
//! RUST_LOG=info cargo run
//!
//! # Use another snapshot file
//! HARDWARE_STORE_SNAPSHOT=/tmp/store.json cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod persistence;
pub mod store_actor;
pub mod workflow;
