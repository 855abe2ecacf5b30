//! Authentication and authorization primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT token generation and validation.
//! - [`tokens`] -- opaque random identifiers (session ids, reset tokens).
//! - [`session_limit`] -- FIFO eviction policy for concurrent sessions.

pub mod jwt;
pub mod password;
pub mod session_limit;
pub mod tokens;
