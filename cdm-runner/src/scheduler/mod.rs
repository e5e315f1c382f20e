//! Scheduler layer for the runner
//!
//! Starts jobs, waits for them to reach a terminal status and decides
//! whether the dependent job may run.

pub mod poller;
pub mod sequence;

#[cfg(test)]
pub(crate) mod fakes;

pub use poller::{JobPoller, PollPolicy};
pub use sequence::SequenceRunner;
