//! HTTP handlers, grouped by resource.

pub mod account;
pub mod audit;
pub mod auth;
pub mod password_reset;
pub mod profile;
