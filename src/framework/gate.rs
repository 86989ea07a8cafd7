//! # Session Gate
//!
//! Admits at most one interactive workflow at a time.
//!
//! ```text
//!            try_begin (admitted)
//!   Idle ─────────────────────────▶ Active
//!    ▲                                │
//!    └──── ticket dropped ────────────┘   (completion, cancel, or panic)
//!
//!   Idle ── close() ──▶ Closed            (shutdown; no further sessions)
//! ```
//!
//! A request while `Active` is refused at once; nothing is queued. The state lives in a
//! `tokio::sync::watch` channel, so transitions are atomic (`send_if_modified`) and
//! anyone can await a transition without polling.
//!
//! The gate does not guard display reads; those go straight to the store actor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Active,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Idle,
    Active {
        session: u64,
        workflow: &'static str,
        cancelled: bool,
    },
    Closed,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Cannot start '{requested}': '{active}' is already running")]
    Busy {
        requested: &'static str,
        active: &'static str,
    },
    #[error("Cannot start '{0}': store is shutting down")]
    Closed(&'static str),
}

/// Shared handle to the single-session slot.
#[derive(Clone)]
pub struct SessionGate {
    slot: Arc<watch::Sender<Slot>>,
    sessions: Arc<AtomicU64>,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGate {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(Slot::Idle);
        Self {
            slot: Arc::new(slot),
            sessions: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> GateState {
        match *self.slot.borrow() {
            Slot::Idle => GateState::Idle,
            Slot::Active { .. } => GateState::Active,
            Slot::Closed => GateState::Closed,
        }
    }

    /// Name of the running workflow, if any.
    pub fn active_workflow(&self) -> Option<&'static str> {
        match *self.slot.borrow() {
            Slot::Active { workflow, .. } => Some(workflow),
            _ => None,
        }
    }

    /// Moves `Idle → Active`. The returned ticket releases the gate when dropped.
    pub fn try_begin(&self, workflow: &'static str) -> Result<SessionTicket, GateError> {
        let session = self.sessions.fetch_add(1, Ordering::Relaxed) + 1;
        let mut refusal = None;

        let admitted = self.slot.send_if_modified(|slot| match *slot {
            Slot::Idle => {
                *slot = Slot::Active {
                    session,
                    workflow,
                    cancelled: false,
                };
                true
            }
            Slot::Active { workflow: active, .. } => {
                refusal = Some(GateError::Busy {
                    requested: workflow,
                    active,
                });
                false
            }
            Slot::Closed => {
                refusal = Some(GateError::Closed(workflow));
                false
            }
        });

        match refusal {
            None if admitted => {
                info!(workflow, session, "Thread started");
                Ok(SessionTicket {
                    slot: Arc::clone(&self.slot),
                    session,
                    workflow,
                })
            }
            Some(error) => {
                warn!(%error, "Workflow already running, request rejected");
                Err(error)
            }
            None => Err(GateError::Closed(workflow)),
        }
    }

    /// Raises the cancel signal of the active session. Returns `false` when idle.
    pub fn cancel_active(&self) -> bool {
        self.slot.send_if_modified(|slot| match slot {
            Slot::Active {
                workflow, cancelled, ..
            } if !*cancelled => {
                warn!(workflow = *workflow, "Cancelling active workflow");
                *cancelled = true;
                true
            }
            _ => false,
        })
    }

    /// Resolves once no session is active.
    pub async fn wait_idle(&self) {
        let mut receiver = self.slot.subscribe();
        let _ = receiver
            .wait_for(|slot| !matches!(slot, Slot::Active { .. }))
            .await;
    }

    /// Cancels any active session, waits for it to unwind, then refuses all new ones.
    pub async fn close(&self) {
        loop {
            let mut closed = false;
            self.slot.send_if_modified(|slot| match *slot {
                Slot::Idle => {
                    *slot = Slot::Closed;
                    closed = true;
                    true
                }
                Slot::Closed => {
                    closed = true;
                    false
                }
                Slot::Active { .. } => false,
            });
            if closed {
                info!("Session gate closed");
                return;
            }
            self.cancel_active();
            self.wait_idle().await;
        }
    }
}

/// Proof of admission. Dropping it returns the gate to `Idle`.
#[derive(Debug)]
pub struct SessionTicket {
    slot: Arc<watch::Sender<Slot>>,
    session: u64,
    workflow: &'static str,
}

impl SessionTicket {
    pub fn workflow(&self) -> &'static str {
        self.workflow
    }

    pub fn cancel_signal(&self) -> CancelSignal {
        CancelSignal {
            receiver: self.slot.subscribe(),
            session: self.session,
        }
    }
}

impl Drop for SessionTicket {
    fn drop(&mut self) {
        let session = self.session;
        self.slot.send_if_modified(|slot| match *slot {
            Slot::Active { session: active, .. } if active == session => {
                *slot = Slot::Idle;
                true
            }
            _ => false,
        });
        info!(workflow = self.workflow, session, "Thread ended");
    }
}

/// Resolves when the owning session is cancelled.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    receiver: watch::Receiver<Slot>,
    session: u64,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        Self::matches(&self.receiver.borrow(), self.session)
    }

    /// Waits for the cancel flag. Pends forever if the session ends without one.
    pub async fn cancelled(&mut self) {
        let session = self.session;
        if self
            .receiver
            .wait_for(|slot| Self::matches(slot, session))
            .await
            .is_err()
        {
            std::future::pending::<()>().await;
        }
    }

    fn matches(slot: &Slot, session: u64) -> bool {
        matches!(slot, Slot::Active { session: s, cancelled: true, .. } if *s == session)
    }
}
