//! # Scripted Input
//!
//! Stands in for the interaction role in tests. Queue the replies a user would give,
//! hand the receiver to [`ScriptedInput::new`], and every [`InputRequest`] a workflow
//! sends is answered from the script in order.
//!
//! ```ignore
//! let (system, requests) = StoreSystem::with_store(Store::new(), 8, None);
//! let script = ScriptedInput::new(requests);
//! script.choose(0).submit(&["A1B2C", "Drill", "10", "49.99", "Other"]);
//!
//! assert_eq!(system.actions.create_item().await?, WorkflowOutcome::Committed);
//! script.verify(); // every scripted reply was consumed
//! ```
//!
//! When the script runs dry the request is *parked*: its responder is held, so the
//! workflow stays suspended (and the gate stays `Active`) until the session is cancelled
//! or the script is dropped. [`ScriptedInput::wait_parked`] lets a test wait for that.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, Notify};

use crate::framework::input::{ChoiceReply, FieldPrompt, FormReply, InputRequest};

#[derive(Debug)]
enum Scripted {
    Submit(Vec<String>),
    Choose(usize),
    Cancel,
}

/// A request as the scripted user saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeenRequest {
    Form {
        title: String,
        fields: Vec<FieldPrompt>,
    },
    Choice {
        title: String,
        options: Vec<&'static str>,
    },
}

impl SeenRequest {
    pub fn title(&self) -> &str {
        match self {
            Self::Form { title, .. } | Self::Choice { title, .. } => title,
        }
    }

    /// Fields of a form request, empty for a choice.
    pub fn fields(&self) -> &[FieldPrompt] {
        match self {
            Self::Form { fields, .. } => fields,
            Self::Choice { .. } => &[],
        }
    }
}

pub struct ScriptedInput {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    parked: Arc<Notify>,
    _handle: tokio::task::JoinHandle<()>,
}

impl ScriptedInput {
    /// Spawns the responder task draining `receiver`.
    pub fn new(mut receiver: mpsc::Receiver<InputRequest>) -> Self {
        let script = Arc::new(Mutex::new(VecDeque::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let parked = Arc::new(Notify::new());

        let script_clone = Arc::clone(&script);
        let seen_clone = Arc::clone(&seen);
        let parked_clone = Arc::clone(&parked);

        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Some(request) = receiver.recv().await {
                seen_clone.lock().unwrap().push(match &request {
                    InputRequest::Form { title, fields, .. } => SeenRequest::Form {
                        title: title.clone(),
                        fields: fields.clone(),
                    },
                    InputRequest::Choice { title, options, .. } => SeenRequest::Choice {
                        title: title.clone(),
                        options: options.clone(),
                    },
                });

                let next = script_clone.lock().unwrap().pop_front();

                match (request, next) {
                    (InputRequest::Form { respond_to, .. }, Some(Scripted::Submit(values))) => {
                        let _ = respond_to.send(FormReply::Submit(values));
                    }
                    (InputRequest::Form { respond_to, .. }, Some(Scripted::Cancel)) => {
                        let _ = respond_to.send(FormReply::Cancel);
                    }
                    (InputRequest::Choice { respond_to, .. }, Some(Scripted::Choose(index))) => {
                        let _ = respond_to.send(ChoiceReply::Selected(index));
                    }
                    (InputRequest::Choice { respond_to, .. }, Some(Scripted::Cancel)) => {
                        let _ = respond_to.send(ChoiceReply::Cancel);
                    }
                    (request, None) => {
                        held.push(request);
                        parked_clone.notify_one();
                    }
                    (request, Some(expected)) => {
                        panic!("Unexpected input request {request:?}, script expected {expected:?}");
                    }
                }
            }
        });

        Self {
            script,
            seen,
            parked,
            _handle: handle,
        }
    }

    /// Queues a form submission.
    pub fn submit(&self, values: &[&str]) -> &Self {
        let values = values.iter().map(|v| v.to_string()).collect();
        self.script.lock().unwrap().push_back(Scripted::Submit(values));
        self
    }

    /// Queues a chooser selection by index.
    pub fn choose(&self, index: usize) -> &Self {
        self.script.lock().unwrap().push_back(Scripted::Choose(index));
        self
    }

    /// Queues a cancel for the next form or chooser.
    pub fn cancel(&self) -> &Self {
        self.script.lock().unwrap().push_back(Scripted::Cancel);
        self
    }

    /// Resolves once a request arrived with nothing left to answer it.
    pub async fn wait_parked(&self) {
        self.parked.notified().await;
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Verifies that every scripted reply was consumed.
    pub fn verify(&self) {
        let script = self.script.lock().unwrap();
        if !script.is_empty() {
            panic!("Not all scripted replies were used. {} remaining", script.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::input::InputClient;

    #[tokio::test]
    async fn test_script_answers_in_order() {
        let (client, receiver) = InputClient::channel(4);
        let script = ScriptedInput::new(receiver);
        script.choose(1).submit(&["x", "y"]).cancel();

        assert_eq!(client.choose("Kind", vec!["A", "B"]).await, Ok(1));
        let fields = vec![FieldPrompt { label: "F", value: String::new(), error: None }];
        assert_eq!(client.form("Form", fields.clone()).await, Ok(vec!["x".to_string(), "y".to_string()]));
        assert!(client.form("Form", fields).await.is_err());

        script.verify();
        let seen = script.seen();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].title(), "Kind");
        assert_eq!(seen[1].fields()[0].label, "F");
    }

    #[tokio::test]
    async fn test_empty_script_parks_request() {
        let (client, receiver) = InputClient::channel(4);
        let script = ScriptedInput::new(receiver);

        let pending = tokio::spawn(async move { client.choose("Kind", vec!["A"]).await });
        script.wait_parked().await;

        assert!(!pending.is_finished());
        pending.abort();
    }
}
