//! Status events reported by running playbook tasks.
//!
//! Tasks push [`StatusEvent`]s onto a bounded mpsc channel; the dispatcher
//! owns the consuming side, decoupling task execution from store mutation.

use runbook_core::types::JobId;
use tokio::sync::mpsc;

/// Buffer size of the status channel between tasks and the dispatcher.
const STATUS_CHANNEL_CAPACITY: usize = 256;

/// Raw progress payload reported by an execution engine.
///
/// The `status` string is validated against the job state machine by the
/// dispatcher's reducer; unrecognized values are rejected there rather
/// than persisted.
#[derive(Debug, Clone)]
pub struct RawStatus {
    pub status: String,
    /// Structured outcome payload; only meaningful on terminal events.
    pub result: Option<serde_json::Value>,
}

impl RawStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            result: None,
        }
    }

    /// Attach an outcome payload to the event.
    pub fn with_result(mut self, result: serde_json::Value) -> Self {
        self.result = Some(result);
        self
    }

    pub fn starting() -> Self {
        Self::new("starting")
    }

    pub fn running() -> Self {
        Self::new("running")
    }

    pub fn successful() -> Self {
        Self::new("successful")
    }

    pub fn timeout() -> Self {
        Self::new("timeout")
    }

    pub fn failed() -> Self {
        Self::new("failed")
    }

    pub fn canceled() -> Self {
        Self::new("canceled")
    }
}

/// A status event tagged with the job it originated from.
#[derive(Debug, Clone)]
pub struct StatusEvent {
    pub identifier: JobId,
    pub payload: RawStatus,
}

/// Sending half of the status channel, cloned into each task.
pub type StatusSender = mpsc::Sender<StatusEvent>;

/// Receiving half of the status channel, owned by the dispatcher.
pub type StatusReceiver = mpsc::Receiver<StatusEvent>;

/// Create the status channel connecting tasks to the dispatcher.
pub fn status_channel() -> (StatusSender, StatusReceiver) {
    mpsc::channel(STATUS_CHANNEL_CAPACITY)
}

/// Context-bound event emitter handed to a running task.
///
/// Wraps the shared channel with the identifier of the owning job so the
/// engine cannot mis-attribute events.
#[derive(Debug, Clone)]
pub struct EventSink {
    identifier: JobId,
    tx: StatusSender,
}

impl EventSink {
    pub fn new(identifier: JobId, tx: StatusSender) -> Self {
        Self { identifier, tx }
    }

    /// Identifier of the job this sink reports for.
    pub fn identifier(&self) -> JobId {
        self.identifier
    }

    /// Push a status event to the dispatcher.
    ///
    /// A closed channel means the dispatcher is gone; the event is dropped
    /// with a warning.
    pub async fn emit(&self, payload: RawStatus) {
        let event = StatusEvent {
            identifier: self.identifier,
            payload,
        };
        if self.tx.send(event).await.is_err() {
            tracing::warn!(identifier = %self.identifier, "Status channel closed; event dropped");
        }
    }
}
