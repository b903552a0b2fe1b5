use uuid::Uuid;

use crate::{models::EventRecipient, PGPool};

pub async fn create(recipient: &EventRecipient, pool: &PGPool) -> Result<EventRecipient, sqlx::Error> {
    sqlx::query_as::<_, EventRecipient>(
        "INSERT INTO event_recipients (id, event_id, contact_id, budget_limit, notes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *",
    )
    .bind(recipient.id)
    .bind(recipient.event_id)
    .bind(recipient.contact_id)
    .bind(recipient.budget_limit)
    .bind(&recipient.notes)
    .fetch_one(pool)
    .await
}

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<EventRecipient, sqlx::Error> {
    sqlx::query_as::<_, EventRecipient>("SELECT * FROM event_recipients WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn list_by_event(event_id: Uuid, pool: &PGPool) -> Result<Vec<EventRecipient>, sqlx::Error> {
    sqlx::query_as::<_, EventRecipient>(
        "SELECT r.* FROM event_recipients r
        JOIN contacts c ON c.id = r.contact_id
        WHERE r.event_id = $1
        ORDER BY c.name, r.id",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}

pub async fn exists(event_id: Uuid, contact_id: Uuid, pool: &PGPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM event_recipients WHERE event_id = $1 AND contact_id = $2)",
    )
    .bind(event_id)
    .bind(contact_id)
    .fetch_one(pool)
    .await
}

pub async fn update(recipient: &EventRecipient, pool: &PGPool) -> Result<EventRecipient, sqlx::Error> {
    sqlx::query_as::<_, EventRecipient>(
        "UPDATE event_recipients SET budget_limit = $2, notes = $3
        WHERE id = $1
        RETURNING *",
    )
    .bind(recipient.id)
    .bind(recipient.budget_limit)
    .bind(&recipient.notes)
    .fetch_one(pool)
    .await
}

pub async fn delete(id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM event_recipients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
