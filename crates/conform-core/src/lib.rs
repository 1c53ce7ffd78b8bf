//! Core types and configuration for conform.
//!
//! - [`config`]: Repository configuration read from the environment
//! - [`error`]: Configuration-level error taxonomy
//! - [`memo`]: Keyed async cache that deduplicates concurrent lookups

pub mod config;
pub mod error;
pub mod memo;
