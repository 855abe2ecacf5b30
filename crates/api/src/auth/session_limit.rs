//! Concurrent-session cap with FIFO eviction.
//!
//! Invoked on every successful login before the new session row is inserted.
//! The read-revoke-insert sequence is deliberately not transactional: a
//! racing double-login may transiently exceed the limit, but revocation stays
//! authoritative per row so the session gate is never compromised.

use drivepoints_core::error::CoreError;
use drivepoints_core::types::DbId;
use drivepoints_db::repositories::SessionRepo;
use sqlx::PgPool;

use crate::error::AppResult;

/// How many of a user's live sessions must be revoked so that one more
/// session fits under `limit`.
///
/// A non-positive limit is a deployment error: fail closed (deny the login)
/// rather than allowing unlimited sessions or looping forever.
pub fn sessions_to_evict(active_count: usize, limit: i64) -> Result<usize, CoreError> {
    if limit <= 0 {
        return Err(CoreError::Internal(format!(
            "Invalid session limit {limit}; refusing login"
        )));
    }
    let limit = limit as usize;
    if active_count >= limit {
        Ok(active_count + 1 - limit)
    } else {
        Ok(0)
    }
}

/// Make room for one new session, revoking the oldest live sessions first.
///
/// Sessions come back oldest-first from the repository, so truncating the
/// head of the list gives strict FIFO eviction.
pub async fn enforce_session_limit(pool: &PgPool, user_id: DbId, limit: i64) -> AppResult<()> {
    let active = SessionRepo::list_active_for_user(pool, user_id).await?;
    let evict = sessions_to_evict(active.len(), limit)?;

    for session in active.iter().take(evict) {
        SessionRepo::revoke(pool, session.id).await?;
        tracing::debug!(
            user_id,
            session_id = session.id,
            jti = %session.jti,
            "evicted oldest session to honor the session limit"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_under_limit_evicts_nothing() {
        assert_eq!(sessions_to_evict(0, 2).unwrap(), 0);
        assert_eq!(sessions_to_evict(1, 2).unwrap(), 0);
    }

    #[test]
    fn test_at_limit_evicts_one() {
        assert_eq!(sessions_to_evict(2, 2).unwrap(), 1);
    }

    #[test]
    fn test_over_limit_evicts_down_to_capacity() {
        // Transient over-limit state from a race: evict enough that the
        // incoming session lands exactly at the cap.
        assert_eq!(sessions_to_evict(5, 2).unwrap(), 4);
        assert_eq!(sessions_to_evict(3, 1).unwrap(), 3);
    }

    #[test]
    fn test_non_positive_limit_fails_closed() {
        assert_matches!(sessions_to_evict(0, 0), Err(CoreError::Internal(_)));
        assert_matches!(sessions_to_evict(4, -1), Err(CoreError::Internal(_)));
    }
}
