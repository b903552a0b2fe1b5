use uuid::Uuid;

use crate::{domain::sharing::SubjectType, models::Event, PGPool};

pub async fn create(event: &Event, pool: &PGPool) -> Result<Event, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        "INSERT INTO events (id, name, date, description, user_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *",
    )
    .bind(event.id)
    .bind(&event.name)
    .bind(event.date)
    .bind(&event.description)
    .bind(event.user_id)
    .fetch_one(pool)
    .await
}

// /events/id
pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<Event, sqlx::Error> {
    sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn list_visible(user_id: Uuid, skip: i64, limit: i64, pool: &PGPool) -> Result<Vec<Event>, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        "SELECT e.* FROM events e WHERE e.user_id = $1
        UNION
        SELECT e.* FROM events e
            JOIN shares s ON s.subject_type = $2 AND s.subject_id = e.id
            WHERE s.grantee_id = $1
        ORDER BY date NULLS LAST, name, id
        OFFSET $3 LIMIT $4",
    )
    .bind(user_id)
    .bind(SubjectType::Event.as_str())
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn update(event: &Event, pool: &PGPool) -> Result<Event, sqlx::Error> {
    sqlx::query_as::<_, Event>(
        "UPDATE events SET name = $2, date = $3, description = $4
        WHERE id = $1
        RETURNING *",
    )
    .bind(event.id)
    .bind(&event.name)
    .bind(event.date)
    .bind(&event.description)
    .fetch_one(pool)
    .await
}

/// Recipients and gifts are removed by the foreign key cascade, shares here.
pub async fn delete(id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM shares WHERE subject_type = $1 AND subject_id = $2")
        .bind(SubjectType::Event.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let res = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(res.rows_affected())
}
