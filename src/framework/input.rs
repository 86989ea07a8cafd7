//! # Input Hand-off
//!
//! A workflow never touches the terminal (or any widget) directly. It sends an
//! [`InputRequest`] to the interaction role and suspends on the `oneshot` reply,
//! the same request/`respond_to` shape the store actor uses.
//!
//! ```text
//! Workflow task                      Interaction role
//!     │  InputRequest::Form{..} ──────────▶ │ renders fields
//!     │   (awaits oneshot, no polling)      │ collects text
//!     │ ◀────────── FormReply::Submit(..)   │
//! ```
//!
//! A dropped responder, a closed channel, or the session cancel signal all surface
//! as [`Cancelled`].

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::framework::error::Cancelled;
use crate::framework::gate::CancelSignal;

/// One field as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPrompt {
    pub label: &'static str,
    /// Current text (blank, seeded, or what the user typed last time).
    pub value: String,
    /// Set when this field failed validation on the previous submit.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormReply {
    Submit(Vec<String>),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceReply {
    Selected(usize),
    Cancel,
}

/// Messages sent from a workflow to the interaction role.
#[derive(Debug)]
pub enum InputRequest {
    Form {
        title: String,
        fields: Vec<FieldPrompt>,
        respond_to: oneshot::Sender<FormReply>,
    },
    Choice {
        title: String,
        options: Vec<&'static str>,
        respond_to: oneshot::Sender<ChoiceReply>,
    },
}

impl InputRequest {
    /// True once the asking workflow stopped waiting (cancelled or finished).
    pub fn is_abandoned(&self) -> bool {
        match self {
            Self::Form { respond_to, .. } => respond_to.is_closed(),
            Self::Choice { respond_to, .. } => respond_to.is_closed(),
        }
    }
}

/// Cloneable handle a workflow uses to ask the interaction role for input.
#[derive(Clone)]
pub struct InputClient {
    sender: mpsc::Sender<InputRequest>,
    cancel: Option<CancelSignal>,
}

impl InputClient {
    pub fn new(sender: mpsc::Sender<InputRequest>) -> Self {
        Self { sender, cancel: None }
    }

    /// Creates a client together with the receiver the interaction role drains.
    pub fn channel(buffer_size: usize) -> (Self, mpsc::Receiver<InputRequest>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self::new(sender), receiver)
    }

    /// Binds this client to a session; every pending reply races the session's cancel signal.
    pub fn with_cancel(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }

    /// Presents a whole form and waits for the submitted values.
    pub async fn form(&self, title: &str, fields: Vec<FieldPrompt>) -> Result<Vec<String>, Cancelled> {
        let (respond_to, response) = oneshot::channel();
        debug!(title, fields = fields.len(), "Presenting form");
        let request = InputRequest::Form {
            title: title.to_string(),
            fields,
            respond_to,
        };
        match self.exchange(request, response).await? {
            FormReply::Submit(values) => Ok(values),
            FormReply::Cancel => Err(Cancelled),
        }
    }

    /// Presents a fixed list of options and waits for the chosen index.
    pub async fn choose(&self, title: &str, options: Vec<&'static str>) -> Result<usize, Cancelled> {
        let (respond_to, response) = oneshot::channel();
        let count = options.len();
        debug!(title, options = count, "Presenting choice");
        let request = InputRequest::Choice {
            title: title.to_string(),
            options,
            respond_to,
        };
        match self.exchange(request, response).await? {
            ChoiceReply::Selected(index) if index < count => Ok(index),
            ChoiceReply::Selected(index) => {
                warn!(index, count, "Choice out of range, treating as cancel");
                Err(Cancelled)
            }
            ChoiceReply::Cancel => Err(Cancelled),
        }
    }

    async fn exchange<R>(&self, request: InputRequest, response: oneshot::Receiver<R>) -> Result<R, Cancelled> {
        let round_trip = async {
            if self.sender.send(request).await.is_err() {
                warn!("Interaction role is gone");
                return Err(Cancelled);
            }
            response.await.map_err(|_| {
                warn!("Interaction role dropped the reply");
                Cancelled
            })
        };

        match &self.cancel {
            Some(signal) => {
                let mut signal = signal.clone();
                tokio::select! {
                    reply = round_trip => reply,
                    () = signal.cancelled() => Err(Cancelled),
                }
            }
            None => round_trip.await,
        }
    }
}
