//! Opaque random identifier generation.
//!
//! Session ids and reset tokens are both unguessable random strings; neither
//! carries any structure beyond its entropy.

use rand::RngCore;
use uuid::Uuid;

/// Number of random bytes in a password reset token (256 bits of entropy).
const RESET_TOKEN_BYTES: usize = 32;

/// Generate a fresh session identifier (`jti`): a UUID v4 rendered as
/// 32 lowercase hex characters.
pub fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Generate a password reset token: 32 cryptographically random bytes,
/// hex-encoded to 64 characters.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let mut out = String::with_capacity(RESET_TOKEN_BYTES * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
