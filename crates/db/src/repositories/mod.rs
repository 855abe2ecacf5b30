pub mod audit_repo;
pub mod reset_token_repo;
pub mod session_repo;
pub mod user_repo;

pub use audit_repo::AuditLogRepo;
pub use reset_token_repo::ResetTokenRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
