//! Audit log entity models and DTOs.
//!
//! Audit entries are immutable once created (no `updated_at`) and are never
//! deleted through the repository.

use drivepoints_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single audit log entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLogEntry {
    pub id: DbId,
    pub created_at: Timestamp,
    pub category: String,
    pub actor_user_id: Option<DbId>,
    pub target_user_id: Option<DbId>,
    pub sponsor_id: Option<DbId>,
    pub success: bool,
    pub details: String,
}

/// DTO for inserting a new audit log entry.
#[derive(Debug, Clone)]
pub struct CreateAuditLog {
    pub category: &'static str,
    pub actor_user_id: Option<DbId>,
    pub target_user_id: Option<DbId>,
    pub sponsor_id: Option<DbId>,
    pub success: bool,
    pub details: String,
}

impl CreateAuditLog {
    /// A successful action entry with the given category, actor, and target.
    pub fn new(category: &'static str, actor: Option<DbId>, target: Option<DbId>) -> Self {
        CreateAuditLog {
            category,
            actor_user_id: actor,
            target_user_id: target,
            sponsor_id: None,
            success: true,
            details: String::new(),
        }
    }

    /// Attach free-text details to the entry.
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }
}

/// Filter parameters for querying audit logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub category: Option<String>,
    pub actor_user_id: Option<DbId>,
    pub target_user_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated response for audit log queries.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogPage {
    pub items: Vec<AuditLogEntry>,
    pub total: i64,
}
