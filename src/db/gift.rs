use uuid::Uuid;

use crate::{models::Gift, PGPool};

pub async fn create(gift: &Gift, pool: &PGPool) -> Result<Gift, sqlx::Error> {
    sqlx::query_as::<_, Gift>(
        "INSERT INTO gifts (id, event_recipient_id, name, description, amount, purchased, url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *",
    )
    .bind(gift.id)
    .bind(gift.event_recipient_id)
    .bind(&gift.name)
    .bind(&gift.description)
    .bind(gift.amount)
    .bind(gift.purchased)
    .bind(&gift.url)
    .fetch_one(pool)
    .await
}

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<Gift, sqlx::Error> {
    sqlx::query_as::<_, Gift>("SELECT * FROM gifts WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn list_by_recipient(recipient_id: Uuid, pool: &PGPool) -> Result<Vec<Gift>, sqlx::Error> {
    sqlx::query_as::<_, Gift>("SELECT * FROM gifts WHERE event_recipient_id = $1 ORDER BY name, id")
        .bind(recipient_id)
        .fetch_all(pool)
        .await
}

/// Every gift of every recipient of the event, in one round trip.
pub async fn list_by_event(event_id: Uuid, pool: &PGPool) -> Result<Vec<Gift>, sqlx::Error> {
    sqlx::query_as::<_, Gift>(
        "SELECT g.* FROM gifts g
        JOIN event_recipients r ON r.id = g.event_recipient_id
        WHERE r.event_id = $1
        ORDER BY g.name, g.id",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}

pub async fn update(gift: &Gift, pool: &PGPool) -> Result<Gift, sqlx::Error> {
    sqlx::query_as::<_, Gift>(
        "UPDATE gifts SET name = $2, description = $3, amount = $4, purchased = $5, url = $6
        WHERE id = $1
        RETURNING *",
    )
    .bind(gift.id)
    .bind(&gift.name)
    .bind(&gift.description)
    .bind(gift.amount)
    .bind(gift.purchased)
    .bind(&gift.url)
    .fetch_one(pool)
    .await
}

pub async fn delete(id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM gifts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
