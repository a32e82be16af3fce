//! Mortgage application intake and approval workflows.
//!
//! The core is a deterministic evaluator: given an application's open field
//! mapping, it derives the status, a human-readable reason, and the list of
//! documentation categories still missing. Everything else (configuration,
//! telemetry, HTTP surface) wraps that computation.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
