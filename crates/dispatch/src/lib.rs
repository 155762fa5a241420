//! Job dispatching.
//!
//! The bounded worker pool, the in-flight bookkeeping, the pure status
//! reducer, and the facade consumed by the transport layer.

pub mod config;
pub mod dispatcher;
pub mod reducer;
pub mod service;

pub use config::DispatcherConfig;
pub use dispatcher::Dispatcher;
pub use service::{JobService, ServiceError};
