#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;
pub mod notify;
pub mod object_store;
pub mod s3;
pub(crate) mod sdk_error;
pub mod sns;
