//! CDM Core
//!
//! Core types shared by the CDM job tooling.
//!
//! This crate contains:
//! - Domain types: jobs, job statuses, SLA policies, log entries and the
//!   outcome types produced by the sequential job runner
//! - DTOs: wire envelopes returned by the backup appliance's REST API

pub mod domain;
pub mod dto;
