use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::framework::ViewSource;
use crate::model::{Item, ItemId, StoreView, Table, TableKind, Transaction, TransactionDraft, User, UserId, UserKind};
use crate::store_actor::{Response, Store, StoreError, StoreRequest};

/// Client for interacting with the [`StoreActor`](crate::store_actor::StoreActor).
///
/// Cheap to clone; every clone talks to the same actor.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(&self, build: impl FnOnce(Response<T>) -> StoreRequest) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }

    pub async fn view(&self) -> Result<StoreView, StoreError> {
        self.request(|respond_to| StoreRequest::View { respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn project(&self, kind: TableKind, term: &str) -> Result<Table, StoreError> {
        let term = term.to_string();
        self.request(|respond_to| StoreRequest::Project { kind, term, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<Item>, StoreError> {
        let term = term.to_string();
        self.request(|respond_to| StoreRequest::Search { term, respond_to }).await
    }

    #[instrument(skip(self, item), fields(id = %item.id))]
    pub async fn add_item(&self, item: Item) -> Result<(), StoreError> {
        debug!(?item, "Sending add_item");
        self.request(|respond_to| StoreRequest::AddItem { item, respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, id: ItemId) -> Result<Item, StoreError> {
        self.request(|respond_to| StoreRequest::RemoveItem { id, respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn increase_quantity(&self, id: ItemId, delta: u32) -> Result<u32, StoreError> {
        self.request(|respond_to| StoreRequest::IncreaseQuantity { id, delta, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn reserve_user_id(&self) -> Result<UserId, StoreError> {
        self.request(|respond_to| StoreRequest::ReserveUserId { respond_to }).await
    }

    #[instrument(skip(self))]
    pub async fn release_user_id(&self, id: UserId) -> Result<bool, StoreError> {
        self.request(|respond_to| StoreRequest::ReleaseUserId { id, respond_to }).await
    }

    #[instrument(skip(self, user), fields(id = %user.id))]
    pub async fn add_user(&self, user: User) -> Result<(), StoreError> {
        debug!(?user, "Sending add_user");
        self.request(|respond_to| StoreRequest::AddUser { user, respond_to }).await
    }

    #[instrument(skip(self, fields))]
    pub async fn replace_user(&self, id: UserId, kind: UserKind, fields: Vec<String>) -> Result<User, StoreError> {
        self.request(|respond_to| StoreRequest::ReplaceUser {
            id,
            kind,
            fields,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn commit_transaction(&self, draft: TransactionDraft) -> Result<Transaction, StoreError> {
        self.request(|respond_to| StoreRequest::CommitTransaction { draft, respond_to })
            .await
    }

    /// Asks the actor to stop; resolves to the final state.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<Store, StoreError> {
        self.request(|respond_to| StoreRequest::Shutdown { respond_to }).await
    }
}

#[async_trait]
impl ViewSource<StoreView> for StoreClient {
    type Error = StoreError;

    async fn current_view(&self) -> Result<StoreView, StoreError> {
        self.view().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_closed_actor_maps_to_error() {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        let client = StoreClient::new(sender);
        assert_eq!(client.reserve_user_id().await, Err(StoreError::ActorClosed));
    }

    #[tokio::test]
    async fn test_dropped_responder_maps_to_error() {
        let (sender, mut receiver) = mpsc::channel(1);
        let client = StoreClient::new(sender);
        let task = tokio::spawn(async move { client.view().await });

        // Receive the request and drop its responder unanswered.
        drop(receiver.recv().await);

        assert_eq!(task.await.unwrap(), Err(StoreError::ActorDropped));
    }
}
