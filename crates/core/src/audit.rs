//! Audit trail category vocabulary.
//!
//! Lives in `core` (zero internal deps) so both the repository layer and any
//! future tooling can reference the same constants. Categories are stored as
//! plain text in the append-only `audit_logs` table; adding a new category
//! is a code change here, not a migration.

/// Known categories for audit log entries.
pub mod categories {
    /// A user deleted their own account (self-service soft delete).
    pub const ACCOUNT_DELETED: &str = "ACCOUNT_DELETED";
    /// An admin soft-deleted another user's account.
    pub const ADMIN_DELETED_USER: &str = "ADMIN_DELETED_USER";
    /// An admin restored a previously soft-deleted account.
    pub const ADMIN_RESTORED_USER: &str = "ADMIN_RESTORED_USER";
    /// A password reset token was issued for a user.
    pub const PASSWORD_RESET_REQUEST: &str = "PASSWORD_RESET_REQUEST";
    /// A password reset token was consumed and the password overwritten.
    pub const PASSWORD_RESET_COMPLETE: &str = "PASSWORD_RESET_COMPLETE";
    /// An authenticated user changed their own password.
    pub const PASSWORD_CHANGE: &str = "PASSWORD_CHANGE";
}
