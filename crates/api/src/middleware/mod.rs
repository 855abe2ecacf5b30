//! Request guards.
//!
//! - [`session`] -- the stateful session gate run by every protected route.
//! - [`rbac`] -- role gates layered on top of the session gate.

pub mod rbac;
pub mod session;
