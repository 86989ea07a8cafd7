use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::clients::{ActionClient, StoreClient};
use crate::config::Config;
use crate::framework::{InputClient, InputRequest, SessionGate};
use crate::persistence;
use crate::store_actor::{Store, StoreActor, StoreError};

/// The runtime orchestrator for the store.
///
/// `StoreSystem` is responsible for:
/// - **Lifecycle Management**: loading the snapshot, spawning the store actor, and saving on shutdown
/// - **Dependency Wiring**: one [`SessionGate`] and one input channel shared by every trigger
///
/// The interaction role receives the [`InputRequest`] receiver returned by the constructor and
/// must keep draining it while workflows run.
///
/// # Example
///
/// ```ignore
/// let (system, mut requests) = StoreSystem::start(&config);
///
/// // Something must answer requests (see `main.rs`, or `ScriptedInput` in tests).
/// tokio::spawn(async move { while let Some(request) = requests.recv().await { /* render, reply */ } });
///
/// let outcome = system.actions.create_item().await?;
/// let items = system.actions.table(TableKind::Items).await?;
///
/// // Cancels any running workflow, stops the actor, writes the snapshot.
/// system.shutdown().await?;
/// ```
pub struct StoreSystem {
    /// Action triggers, table projections and search for the UI.
    pub actions: ActionClient,

    /// Direct access to the store actor (reads and tests).
    pub store_client: StoreClient,

    gate: SessionGate,
    snapshot_path: Option<PathBuf>,
    handle: JoinHandle<Store>,
}

impl StoreSystem {
    /// Loads the configured snapshot (or starts empty) and spawns the store actor.
    pub fn start(config: &Config) -> (Self, mpsc::Receiver<InputRequest>) {
        let store = persistence::load_or_default(&config.snapshot_path);
        Self::with_store(store, config.channel_buffer, Some(config.snapshot_path.clone()))
    }

    /// Starts from an in-memory store. With `snapshot_path` set, shutdown saves there.
    pub fn with_store(
        store: Store,
        buffer_size: usize,
        snapshot_path: Option<PathBuf>,
    ) -> (Self, mpsc::Receiver<InputRequest>) {
        let (actor, store_client) = StoreActor::new(buffer_size, store);
        let handle = tokio::spawn(actor.run());

        let (input, requests) = InputClient::channel(buffer_size);
        let gate = SessionGate::new();
        let actions = ActionClient::new(store_client.clone(), gate.clone(), input);

        info!(snapshot = ?snapshot_path, "Store system started");
        let system = Self {
            actions,
            store_client,
            gate,
            snapshot_path,
            handle,
        };
        (system, requests)
    }

    /// Gracefully shuts down the store.
    ///
    /// 1. Closes the gate: an active workflow is cancelled and unwinds through its
    ///    normal cancel path (rolling back any reserved user id) before the gate closes.
    /// 2. Stops the store actor and takes its final state.
    /// 3. Writes the snapshot, if a path was configured. A failed save is logged only.
    pub async fn shutdown(self) -> Result<Store, StoreError> {
        info!("Shutting down system...");

        self.gate.close().await;

        let store = self.store_client.shutdown().await.map_err(|e| {
            error!(error = %e, "Store actor did not hand back its state");
            e
        })?;

        drop(self.actions);
        drop(self.store_client);
        if let Err(e) = self.handle.await {
            error!("Store actor task failed: {:?}", e);
        }

        if let Some(path) = &self.snapshot_path {
            if let Err(e) = persistence::save(path, &store) {
                error!(error = %e, "Failed to save database");
            }
        }

        info!("System shutdown complete.");
        Ok(store)
    }
}
