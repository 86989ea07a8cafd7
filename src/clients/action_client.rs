use tokio::task::JoinHandle;
use tracing::{error, instrument};

use crate::clients::StoreClient;
use crate::framework::{GateState, InputClient, SessionGate};
use crate::model::{Item, Table, TableKind};
use crate::store_actor::StoreError;
use crate::workflow::{self, WorkflowContext, WorkflowError, WorkflowKind, WorkflowOutcome};

/// What the surrounding UI talks to: action triggers, table projections and search.
///
/// Triggers pass through the [`SessionGate`]; reads do not. Cloning is cheap, so a UI can
/// hand copies to whichever button or command handler needs one.
#[derive(Clone)]
pub struct ActionClient {
    store: StoreClient,
    gate: SessionGate,
    input: InputClient,
}

impl ActionClient {
    pub fn new(store: StoreClient, gate: SessionGate, input: InputClient) -> Self {
        Self { store, gate, input }
    }

    /// Starts `kind` if no other workflow is running and waits for it to finish.
    ///
    /// The workflow runs on its own task, so dropping this future does not abort it.
    pub async fn trigger(&self, kind: WorkflowKind) -> Result<WorkflowOutcome, WorkflowError> {
        match self.spawn(kind) {
            Some(handle) => handle.await.map_err(|e| {
                error!(workflow = kind.name(), "Workflow task failed: {:?}", e);
                WorkflowError::Task(e.to_string())
            })?,
            None => Ok(WorkflowOutcome::Busy),
        }
    }

    /// Starts `kind` in the background. `None` means the gate refused it.
    pub fn spawn(&self, kind: WorkflowKind) -> Option<JoinHandle<Result<WorkflowOutcome, WorkflowError>>> {
        let ticket = self.gate.try_begin(kind.name()).ok()?;
        let ctx = WorkflowContext {
            store: self.store.clone(),
            input: self.input.clone().with_cancel(ticket.cancel_signal()),
        };
        Some(tokio::spawn(async move {
            // Held for the whole run; dropping it returns the gate to Idle.
            let _ticket = ticket;
            workflow::run(kind, &ctx).await
        }))
    }

    pub async fn create_item(&self) -> Result<WorkflowOutcome, WorkflowError> {
        self.trigger(WorkflowKind::CreateItem).await
    }

    pub async fn create_user(&self) -> Result<WorkflowOutcome, WorkflowError> {
        self.trigger(WorkflowKind::CreateUser).await
    }

    pub async fn create_transaction(&self) -> Result<WorkflowOutcome, WorkflowError> {
        self.trigger(WorkflowKind::CreateTransaction).await
    }

    pub async fn add_quantity(&self) -> Result<WorkflowOutcome, WorkflowError> {
        self.trigger(WorkflowKind::AddQuantity).await
    }

    pub async fn delete_item(&self) -> Result<WorkflowOutcome, WorkflowError> {
        self.trigger(WorkflowKind::DeleteItem).await
    }

    pub async fn update_user(&self) -> Result<WorkflowOutcome, WorkflowError> {
        self.trigger(WorkflowKind::UpdateUser).await
    }

    #[instrument(skip(self))]
    pub async fn table(&self, kind: TableKind) -> Result<Table, StoreError> {
        self.store.project(kind, "").await
    }

    /// Search table for `term`: matching items, ordered by id.
    #[instrument(skip(self))]
    pub async fn search_table(&self, term: &str) -> Result<Table, StoreError> {
        self.store.project(TableKind::Search, term).await
    }

    pub async fn search(&self, term: &str) -> Result<Vec<Item>, StoreError> {
        self.store.search(term).await
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Aborts the running workflow, if any. Returns `false` when nothing was running.
    pub fn cancel_active(&self) -> bool {
        self.gate.cancel_active()
    }
}
