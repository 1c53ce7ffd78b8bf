//! Rule evaluation engine for conform.
//!
//! A rule discovers files by glob, narrows them with predicates, runs a check
//! against each file, and aggregates what the checks recorded:
//! - [`record`]: per-file outcome state and the cached project document
//! - [`suppress`]: ignore rules that excuse known violations
//! - [`runner`]: discovery, filtering, parallel execution, aggregation
//! - [`report`]: persisted warning summary for CI runs
//! - [`context`]: everything a rule reads that is loaded once per process

pub mod context;
pub mod record;
pub mod report;
pub mod runner;
pub mod suppress;
