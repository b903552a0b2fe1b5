use uuid::Uuid;

use crate::{
    domain::sharing::{Permission, SubjectType},
    models::Share,
    PGPool,
};

/// Creates the grant, or replaces the permission of an existing one.
pub async fn upsert(
    subject_type: SubjectType,
    subject_id: Uuid,
    grantee_id: Uuid,
    permission: Permission,
    pool: &PGPool,
) -> Result<Share, sqlx::Error> {
    sqlx::query_as::<_, Share>(
        "INSERT INTO shares (id, subject_type, subject_id, grantee_id, permission)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (subject_type, subject_id, grantee_id)
        DO UPDATE SET permission = EXCLUDED.permission
        RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(subject_type.as_str())
    .bind(subject_id)
    .bind(grantee_id)
    .bind(permission.as_str())
    .fetch_one(pool)
    .await
}

pub async fn find(
    subject_type: SubjectType,
    subject_id: Uuid,
    grantee_id: Uuid,
    pool: &PGPool,
) -> Result<Option<Share>, sqlx::Error> {
    sqlx::query_as::<_, Share>(
        "SELECT * FROM shares WHERE subject_type = $1 AND subject_id = $2 AND grantee_id = $3",
    )
    .bind(subject_type.as_str())
    .bind(subject_id)
    .bind(grantee_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_for_subject(
    subject_type: SubjectType,
    subject_id: Uuid,
    pool: &PGPool,
) -> Result<Vec<Share>, sqlx::Error> {
    sqlx::query_as::<_, Share>(
        "SELECT * FROM shares WHERE subject_type = $1 AND subject_id = $2 ORDER BY created_at",
    )
    .bind(subject_type.as_str())
    .bind(subject_id)
    .fetch_all(pool)
    .await
}

/// Grants held by `grantee_id` on subjects of one kind.
pub async fn list_for_grantee(
    subject_type: SubjectType,
    grantee_id: Uuid,
    pool: &PGPool,
) -> Result<Vec<Share>, sqlx::Error> {
    sqlx::query_as::<_, Share>("SELECT * FROM shares WHERE subject_type = $1 AND grantee_id = $2")
        .bind(subject_type.as_str())
        .bind(grantee_id)
        .fetch_all(pool)
        .await
}

pub async fn delete(
    subject_type: SubjectType,
    subject_id: Uuid,
    grantee_id: Uuid,
    pool: &PGPool,
) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM shares WHERE subject_type = $1 AND subject_id = $2 AND grantee_id = $3")
        .bind(subject_type.as_str())
        .bind(subject_id)
        .bind(grantee_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
