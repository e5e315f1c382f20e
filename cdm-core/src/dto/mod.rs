//! Wire envelopes for the appliance REST API
//!
//! The API wraps most collections in a single-key object; these DTOs unwrap
//! them so callers only see domain types.

pub mod job;
pub mod log;
pub mod policy;
pub mod session;
