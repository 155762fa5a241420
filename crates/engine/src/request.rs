//! Execution request construction.

use runbook_core::types::JobId;

/// Extra variables forwarded to a playbook run.
pub type ExtraVars = serde_json::Map<String, serde_json::Value>;

/// Everything an engine needs to run one playbook.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub identifier: JobId,
    pub playbook: String,
    pub extravars: ExtraVars,
    /// Extra arguments appended to the underlying command line.
    pub cmdline: String,
}

impl ExecutionRequest {
    /// Build a request, merging free-form parameters and an optional tag
    /// filter into the invocation arguments.
    ///
    /// Absent (or empty) tags produce no filter; present tags are joined
    /// into a single `--tags` expression.
    pub fn new(
        identifier: JobId,
        playbook: impl Into<String>,
        extravars: Option<ExtraVars>,
        tags: Option<Vec<String>>,
    ) -> Self {
        let cmdline = match tags.as_deref() {
            Some(tags) if !tags.is_empty() => format!("--tags {}", tags.join(",")),
            _ => String::new(),
        };

        Self {
            identifier,
            playbook: playbook.into(),
            extravars: extravars.unwrap_or_default(),
            cmdline,
        }
    }
}
