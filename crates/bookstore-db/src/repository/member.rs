//! # Member Repository
//!
//! Read-only access to members. Members are seeded at bootstrap and never
//! modified by the ledger.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use bookstore_core::Member;

const SELECT_MEMBER: &str =
    "SELECT mid AS id, mname AS name, mphone AS phone, memail AS email FROM member";

/// Repository for member lookups.
///
/// ## Usage
/// ```rust,ignore
/// let alice = db.members().get_by_id("M001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: SqlitePool,
}

impl MemberRepository {
    /// Creates a new MemberRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MemberRepository { pool }
    }

    /// Gets a member by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Member))` - Member found
    /// * `Ok(None)` - No such member
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Member>> {
        let mut conn = self.pool.acquire().await?;
        let member = find_by_id(&mut conn, id).await?;
        debug!(id = %id, found = member.is_some(), "Member lookup");
        Ok(member)
    }

    /// Lists all members ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(&format!("{SELECT_MEMBER} ORDER BY mid"))
            .fetch_all(&self.pool)
            .await?;

        Ok(members)
    }

    /// Number of members.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Member lookup on an already-acquired connection.
pub(crate) async fn find_by_id(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<Member>, sqlx::Error> {
    sqlx::query_as::<_, Member>(&format!("{SELECT_MEMBER} WHERE mid = ?1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}
