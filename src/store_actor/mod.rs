//! The single owner of the store's collections.
//!
//! ```text
//! StoreClient ──StoreRequest──▶ StoreActor::run (one message at a time)
//!      ▲                               │
//!      └────── oneshot Result ─────────┘
//! ```
//!
//! Requests are handled sequentially, so a display read always sees the state between two
//! complete mutations. The actor stops when it receives [`StoreRequest::Shutdown`] or when
//! every client is dropped, and returns the final [`Store`] either way.

pub mod actions;
pub mod error;
pub mod store;

pub use actions::{Response, StoreRequest};
pub use error::StoreError;
pub use store::Store;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clients::StoreClient;

pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    store: Store,
}

impl StoreActor {
    pub fn new(buffer_size: usize, store: Store) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { receiver, store }, StoreClient::new(sender))
    }

    /// Processes requests until shutdown, then returns the final state.
    pub async fn run(mut self) -> Store {
        info!(
            items = self.store.items().len(),
            users = self.store.users().len(),
            transactions = self.store.transactions().len(),
            "Store actor started"
        );

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::View { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.view()));
                }
                StoreRequest::Project { kind, term, respond_to } => {
                    debug!(?kind, %term, "Project");
                    let _ = respond_to.send(Ok(self.store.project(kind, &term)));
                }
                StoreRequest::Search { term, respond_to } => {
                    let found = self.store.search(&term);
                    debug!(%term, found = found.len(), "Search");
                    let _ = respond_to.send(Ok(found));
                }
                StoreRequest::AddItem { item, respond_to } => {
                    let id = item.id.clone();
                    self.store.add_item(item);
                    info!(%id, size = self.store.items().len(), "Item created");
                    let _ = respond_to.send(Ok(()));
                }
                StoreRequest::RemoveItem { id, respond_to } => {
                    let result = self.store.remove_item(&id);
                    match &result {
                        Ok(_) => info!(%id, size = self.store.items().len(), "Item deleted"),
                        Err(e) => warn!(%id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::IncreaseQuantity { id, delta, respond_to } => {
                    let result = self.store.increase_quantity(&id, delta);
                    match &result {
                        Ok(quantity) => info!(%id, delta, quantity, "Quantity added"),
                        Err(e) => warn!(%id, delta, error = %e, "Add quantity failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::ReserveUserId { respond_to } => {
                    let result = self.store.reserve_user_id();
                    match &result {
                        Ok(id) => debug!(%id, "User id reserved"),
                        Err(e) => warn!(error = %e, "User id not reserved"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::ReleaseUserId { id, respond_to } => {
                    let released = self.store.release_user_id(id);
                    if released {
                        debug!(%id, "User id released");
                    } else {
                        warn!(%id, next = %self.store.next_user_id(), "User id not released");
                    }
                    let _ = respond_to.send(Ok(released));
                }
                StoreRequest::AddUser { user, respond_to } => {
                    let id = user.id;
                    let kind = user.kind();
                    self.store.add_user(user);
                    info!(%id, ?kind, size = self.store.users().len(), "User created");
                    let _ = respond_to.send(Ok(()));
                }
                StoreRequest::ReplaceUser { id, kind, fields, respond_to } => {
                    let result = self.store.replace_user(id, kind, &fields);
                    match &result {
                        Ok(_) => info!(%id, ?kind, "User updated"),
                        Err(e) => warn!(%id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::CommitTransaction { draft, respond_to } => {
                    debug!(?draft, "Commit transaction");
                    let result = self.store.commit_transaction(draft, Utc::now());
                    match &result {
                        Ok(sale) => info!(
                            item = %sale.item_id,
                            quantity = sale.quantity,
                            size = self.store.transactions().len(),
                            "Transaction committed"
                        ),
                        Err(e) => warn!(error = %e, "Transaction rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Shutdown { respond_to } => {
                    info!("Store actor received shutdown");
                    let _ = respond_to.send(Ok(self.store.clone()));
                    break;
                }
            }
        }

        info!(
            items = self.store.items().len(),
            users = self.store.users().len(),
            transactions = self.store.transactions().len(),
            "Shutdown"
        );
        self.store
    }
}
