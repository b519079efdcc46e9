//! Shared storage glue domain primitives.
//!
//! This crate owns the object/event contracts, notification message
//! formatting, sample key generation and the service error taxonomy. It
//! excludes AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod error;
pub mod storage_keys;
