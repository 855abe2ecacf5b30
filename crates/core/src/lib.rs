//! Domain primitives shared across the drivepoints backend.
//!
//! This crate has no I/O: it holds the id/timestamp aliases, the error
//! taxonomy, and the audit category vocabulary used by the persistence and
//! API layers.

pub mod audit;
pub mod error;
pub mod types;
