//! Core domain types
//!
//! These types describe what the backup appliance reports (jobs, policies,
//! logs) and what the runner produces while waiting on jobs.

pub mod job;
pub mod log;
pub mod policy;
pub mod run;
