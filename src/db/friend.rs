use uuid::Uuid;

use crate::{domain::friendship::FriendRequestStatus, models::FriendRequest, PGPool};

pub async fn create(from_user_id: Uuid, to_user_id: Uuid, pool: &PGPool) -> Result<FriendRequest, sqlx::Error> {
    sqlx::query_as::<_, FriendRequest>(
        "INSERT INTO friend_requests (id, from_user_id, to_user_id, status)
        VALUES ($1, $2, $3, $4)
        RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(from_user_id)
    .bind(to_user_id)
    .bind(FriendRequestStatus::Pending.as_str())
    .fetch_one(pool)
    .await
}

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<FriendRequest, sqlx::Error> {
    sqlx::query_as::<_, FriendRequest>("SELECT * FROM friend_requests WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

/// Requests between the two users in either direction.
pub async fn list_between(a: Uuid, b: Uuid, pool: &PGPool) -> Result<Vec<FriendRequest>, sqlx::Error> {
    sqlx::query_as::<_, FriendRequest>(
        "SELECT * FROM friend_requests
        WHERE (from_user_id = $1 AND to_user_id = $2) OR (from_user_id = $2 AND to_user_id = $1)
        ORDER BY created_at",
    )
    .bind(a)
    .bind(b)
    .fetch_all(pool)
    .await
}

pub async fn list_incoming_pending(user_id: Uuid, pool: &PGPool) -> Result<Vec<FriendRequest>, sqlx::Error> {
    sqlx::query_as::<_, FriendRequest>(
        "SELECT * FROM friend_requests WHERE to_user_id = $1 AND status = $2 ORDER BY created_at",
    )
    .bind(user_id)
    .bind(FriendRequestStatus::Pending.as_str())
    .fetch_all(pool)
    .await
}

pub async fn list_accepted(user_id: Uuid, pool: &PGPool) -> Result<Vec<FriendRequest>, sqlx::Error> {
    sqlx::query_as::<_, FriendRequest>(
        "SELECT * FROM friend_requests
        WHERE (from_user_id = $1 OR to_user_id = $1) AND status = $2",
    )
    .bind(user_id)
    .bind(FriendRequestStatus::Accepted.as_str())
    .fetch_all(pool)
    .await
}

/// Only moves a request that is still pending, so two concurrent answers
/// cannot both win.
pub async fn set_status(
    id: Uuid,
    status: FriendRequestStatus,
    pool: &PGPool,
) -> Result<Option<FriendRequest>, sqlx::Error> {
    sqlx::query_as::<_, FriendRequest>(
        "UPDATE friend_requests SET status = $2
        WHERE id = $1 AND status = $3
        RETURNING *",
    )
    .bind(id)
    .bind(status.as_str())
    .bind(FriendRequestStatus::Pending.as_str())
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    const PENDING_PAIR_INDEX: &str =
        include_str!("../../migrations/20240201000000_unique_pending_friend_request.sql");

    #[test]
    fn pending_requests_are_unique_per_unordered_pair() {
        let sql = PENDING_PAIR_INDEX.to_lowercase();
        assert!(sql.contains("create unique index"));
        assert!(sql.contains("least(from_user_id, to_user_id)"));
        assert!(sql.contains("greatest(from_user_id, to_user_id)"));
        assert!(sql.contains("where status = 'pending'"));
    }
}
