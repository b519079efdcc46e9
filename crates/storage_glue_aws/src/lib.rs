//! AWS-oriented adapters and handlers for the storage glue programs.
//!
//! This crate owns runtime integration details (the Lambda handler, the
//! bootstrap console sequence, S3/SNS adapters and configuration) on top of
//! the provider-independent contracts in `storage_glue_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod telemetry;
