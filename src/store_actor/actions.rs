use tokio::sync::oneshot;

use crate::model::{Item, ItemId, StoreView, Table, TableKind, Transaction, TransactionDraft, User, UserId, UserKind};
use crate::store_actor::{Store, StoreError};

/// Type alias for the response channel.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Messages understood by the [`StoreActor`](crate::store_actor::StoreActor).
///
/// Each variant carries its own `respond_to` channel; the actor answers every request
/// exactly once, in arrival order.
#[derive(Debug)]
pub enum StoreRequest {
    View {
        respond_to: Response<StoreView>,
    },
    Project {
        kind: TableKind,
        term: String,
        respond_to: Response<Table>,
    },
    Search {
        term: String,
        respond_to: Response<Vec<Item>>,
    },
    AddItem {
        item: Item,
        respond_to: Response<()>,
    },
    RemoveItem {
        id: ItemId,
        respond_to: Response<Item>,
    },
    IncreaseQuantity {
        id: ItemId,
        delta: u32,
        respond_to: Response<u32>,
    },
    ReserveUserId {
        respond_to: Response<UserId>,
    },
    ReleaseUserId {
        id: UserId,
        respond_to: Response<bool>,
    },
    AddUser {
        user: User,
        respond_to: Response<()>,
    },
    ReplaceUser {
        id: UserId,
        kind: UserKind,
        fields: Vec<String>,
        respond_to: Response<User>,
    },
    CommitTransaction {
        draft: TransactionDraft,
        respond_to: Response<Transaction>,
    },
    /// Stops the actor and hands back the final state.
    Shutdown {
        respond_to: Response<Store>,
    },
}
