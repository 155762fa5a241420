//! Shared types and the domain error taxonomy.
//!
//! This crate has zero internal dependencies so every other workspace
//! member can use it.

pub mod error;
pub mod types;
