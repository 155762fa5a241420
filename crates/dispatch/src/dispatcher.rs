//! Asynchronous execution dispatcher.
//!
//! Owns the bounded worker pool, the in-flight map, and the consuming side
//! of the status-event channel. Tasks report progress over the channel; a
//! single consumer applies each event through the reducer, preserving
//! per-job event order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::{AbortHandle, JoinHandle};
use tokio_util::sync::CancellationToken;

use runbook_core::error::CoreError;
use runbook_core::types::JobId;
use runbook_db::JobStore;
use runbook_engine::request::ExtraVars;
use runbook_engine::{
    status_channel, EventSink, ExecutionRequest, PlaybookEngine, RawStatus, StatusEvent,
    StatusReceiver, StatusSender,
};

use crate::config::DispatcherConfig;
use crate::reducer;

/// Poll interval while waiting for in-flight jobs to wind down at shutdown.
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Dispatches playbook tasks onto a bounded worker pool and tracks them
/// until completion.
///
/// Created once at application startup via [`Dispatcher::new`]. The
/// returned `Arc` can be cheaply cloned into request handlers.
pub struct Dispatcher {
    engine: Arc<dyn PlaybookEngine>,
    config: DispatcherConfig,
    /// Worker-pool permits; closed on shutdown.
    permits: Arc<Semaphore>,
    /// Jobs whose task has not completed yet, by identifier.
    in_flight: Arc<Mutex<HashMap<JobId, AbortHandle>>>,
    events_tx: StatusSender,
    /// Stops the status consumer once shutdown has drained.
    cancel: CancellationToken,
}

impl Dispatcher {
    /// Create a dispatcher and start its status-event consumer.
    pub fn new(engine: Arc<dyn PlaybookEngine>, pool: PgPool, config: DispatcherConfig) -> Arc<Self> {
        let (events_tx, events_rx) = status_channel();
        let cancel = CancellationToken::new();

        tokio::spawn(consume_status_events(pool, events_rx, cancel.clone()));

        Arc::new(Self {
            permits: Arc::new(Semaphore::new(config.max_workers)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            engine,
            config,
            events_tx,
            cancel,
        })
    }

    /// Number of jobs whose task has not completed yet.
    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    /// Whether the given job's task has not completed yet.
    pub async fn is_in_flight(&self, identifier: JobId) -> bool {
        self.in_flight.lock().await.contains_key(&identifier)
    }

    /// Enqueue a playbook run for an already-created job row.
    ///
    /// Returns as soon as the task is spawned; pool saturation queues
    /// inside the worker task, never on this path. Task-level failures do
    /// not surface here; they arrive through the status channel as
    /// terminal states. Submission after shutdown fails synchronously with
    /// [`CoreError::DispatchFailure`] and touches nothing.
    pub async fn submit(
        &self,
        identifier: JobId,
        playbook: &str,
        extravars: Option<ExtraVars>,
        tags: Option<Vec<String>>,
    ) -> Result<(), CoreError> {
        if self.permits.is_closed() {
            return Err(CoreError::DispatchFailure {
                identifier,
                reason: "dispatcher is shut down".to_string(),
            });
        }

        let request = ExecutionRequest::new(identifier, playbook, extravars, tags);
        let sink = EventSink::new(identifier, self.events_tx.clone());

        let task = tokio::spawn(run_job(
            Arc::clone(&self.engine),
            Arc::clone(&self.permits),
            self.config.job_timeout,
            request,
            sink,
        ));

        // Register before the completion hook can possibly fire, so the
        // insert always precedes the remove.
        self.in_flight
            .lock()
            .await
            .insert(identifier, task.abort_handle());
        tokio::spawn(on_task_complete(
            Arc::clone(&self.in_flight),
            identifier,
            task,
        ));

        tracing::info!(%identifier, playbook, "Submitted job");
        Ok(())
    }

    /// Stop intake and wait for in-flight work to wind down.
    ///
    /// Queued tasks that have not acquired a permit yet observe the closed
    /// pool and surface `canceled` through the status channel; running
    /// tasks get `drain_timeout` to finish. The status consumer is stopped
    /// last so queued events still reach the store.
    pub async fn shutdown(&self) {
        self.permits.close();

        let deadline = tokio::time::Instant::now() + self.config.drain_timeout;
        loop {
            let drained = self.in_flight.lock().await.is_empty()
                && self.events_tx.capacity() == self.events_tx.max_capacity();
            if drained {
                break;
            }
            if tokio::time::Instant::now() >= deadline {
                let remaining = self.in_flight.lock().await.len();
                tracing::warn!(remaining, "Drain timed out with jobs still in flight");
                break;
            }
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }

        self.cancel.cancel();
    }
}

/// Worker-side wrapper around a single engine run.
///
/// Acquires a pool permit (queuing while the pool is saturated) and guards
/// the paths where the engine resolves without having reported a terminal
/// status: engine errors surface `failed`, watchdog expiry surfaces
/// `timeout`, and a shutdown overtaking a still-queued task surfaces
/// `canceled`, all through the normal status channel.
async fn run_job(
    engine: Arc<dyn PlaybookEngine>,
    permits: Arc<Semaphore>,
    job_timeout: Option<Duration>,
    request: ExecutionRequest,
    sink: EventSink,
) {
    let identifier = request.identifier;

    let Ok(_permit) = permits.acquire_owned().await else {
        tracing::warn!(%identifier, "Dispatcher shut down before job started");
        sink.emit(RawStatus::canceled()).await;
        return;
    };

    let run = engine.run(request, sink.clone());
    let outcome = match job_timeout {
        Some(limit) => match tokio::time::timeout(limit, run).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => {
                tracing::warn!(
                    %identifier,
                    timeout_secs = limit.as_secs(),
                    "Job exceeded its supervising timeout",
                );
                sink.emit(RawStatus::timeout()).await;
                return;
            }
        },
        None => run.await,
    };

    if let Err(err) = outcome {
        // The engine failed before reporting a terminal status.
        tracing::error!(%identifier, error = %err, "Playbook engine failed");
        let result = serde_json::json!({ "error": err.to_string() });
        sink.emit(RawStatus::failed().with_result(result)).await;
    }
}

/// Completion hook: awaits the wrapped task and retires the identifier.
///
/// This is the only place an identifier leaves the in-flight map, and it
/// runs exactly once per task, including when the task panicked.
async fn on_task_complete(
    in_flight: Arc<Mutex<HashMap<JobId, AbortHandle>>>,
    identifier: JobId,
    task: JoinHandle<()>,
) {
    if let Err(err) = task.await {
        tracing::error!(%identifier, error = %err, "Job task aborted or panicked");
    }
    in_flight.lock().await.remove(&identifier);
    tracing::info!(%identifier, "Finished job");
}

/// Single consumer draining the status channel.
///
/// Parse and reduce failures drop the event without touching the store;
/// store misses are logged (the row may have been deleted administratively
/// while its task was still running).
async fn consume_status_events(
    pool: PgPool,
    mut events_rx: StatusReceiver,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            maybe = events_rx.recv() => {
                let Some(event) = maybe else { break };
                apply_status_event(&pool, event).await;
            }
            () = cancel.cancelled() => break,
        }
    }
}

async fn apply_status_event(pool: &PgPool, event: StatusEvent) {
    let update = match reducer::reduce(&event.payload, Utc::now()) {
        Ok(update) => update,
        Err(err) => {
            tracing::warn!(identifier = %event.identifier, error = %err, "Dropped status event");
            return;
        }
    };

    tracing::debug!(
        identifier = %event.identifier,
        status = %event.payload.status,
        "Applying status event",
    );

    if let Err(err) = JobStore::update(pool, event.identifier, &update).await {
        tracing::error!(identifier = %event.identifier, error = %err, "Failed to persist status event");
    }
}
