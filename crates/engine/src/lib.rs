//! Playbook execution boundary.
//!
//! The dispatcher treats playbook execution as an opaque long-running task
//! behind [`PlaybookEngine`]: submit a request, receive status events over
//! a channel, and get back an outcome exposing the originating job
//! identifier for cleanup bookkeeping.

pub mod config;
pub mod event;
pub mod process;
pub mod request;

pub use config::EngineConfig;
pub use event::{
    status_channel, EventSink, RawStatus, StatusEvent, StatusReceiver, StatusSender,
};
pub use process::ProcessEngine;
pub use request::ExecutionRequest;

use async_trait::async_trait;
use runbook_core::types::JobId;

/// Resolution value of a finished task.
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub identifier: JobId,
    /// Exit code of the underlying process, when one ran to completion.
    pub rc: Option<i32>,
}

/// Failure of the execution machinery itself, not of the playbook.
///
/// A run that fails this way has not reported a terminal status event; the
/// dispatcher is responsible for surfacing `failed` on its behalf.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to stage execution inputs: {0}")]
    Staging(#[source] std::io::Error),

    #[error("Failed to encode extravars: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to spawn playbook runner: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to wait on playbook runner: {0}")]
    Wait(#[source] std::io::Error),
}

/// A playbook execution engine.
///
/// Implementations report progress through the [`EventSink`] zero or more
/// times and resolve exactly once. On a normal run the engine itself emits
/// the terminal status; the dispatcher guards the abnormal paths.
#[async_trait]
pub trait PlaybookEngine: Send + Sync + 'static {
    async fn run(
        &self,
        request: ExecutionRequest,
        sink: EventSink,
    ) -> Result<EngineOutcome, EngineError>;
}
