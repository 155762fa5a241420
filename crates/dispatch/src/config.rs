//! Dispatcher configuration.

use std::time::Duration;

/// Worker-pool and supervision settings, loaded once at process start.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Number of playbook tasks allowed to run in parallel.
    pub max_workers: usize,
    /// Supervising timeout for a single run; `None` disables the watchdog.
    pub job_timeout: Option<Duration>,
    /// How long shutdown waits for in-flight jobs to wind down.
    pub drain_timeout: Duration,
}

impl DispatcherConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default |
    /// |----------------------|---------|
    /// | `MAX_WORKERS`        | `1`     |
    /// | `JOB_TIMEOUT_SECS`   | unset   |
    /// | `DRAIN_TIMEOUT_SECS` | `30`    |
    pub fn from_env() -> Self {
        let max_workers: usize = std::env::var("MAX_WORKERS")
            .unwrap_or_else(|_| "1".into())
            .parse()
            .expect("MAX_WORKERS must be a positive integer");

        let job_timeout = std::env::var("JOB_TIMEOUT_SECS").ok().map(|raw| {
            let secs: u64 = raw.parse().expect("JOB_TIMEOUT_SECS must be a valid u64");
            Duration::from_secs(secs)
        });

        let drain_timeout_secs: u64 = std::env::var("DRAIN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("DRAIN_TIMEOUT_SECS must be a valid u64");

        Self {
            max_workers,
            job_timeout,
            drain_timeout: Duration::from_secs(drain_timeout_secs),
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_workers: 1,
            job_timeout: None,
            drain_timeout: Duration::from_secs(30),
        }
    }
}
