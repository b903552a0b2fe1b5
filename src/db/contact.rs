use uuid::Uuid;

use crate::{domain::sharing::SubjectType, models::Contact, PGPool};

pub async fn create(contact: &Contact, pool: &PGPool) -> Result<Contact, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        "INSERT INTO contacts (id, name, email, phone, notes, user_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *",
    )
    .bind(contact.id)
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .bind(&contact.notes)
    .bind(contact.user_id)
    .fetch_one(pool)
    .await
}

pub async fn get_by_id(id: Uuid, pool: &PGPool) -> Result<Contact, sqlx::Error> {
    sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn get_many(ids: &[Uuid], pool: &PGPool) -> Result<Vec<Contact>, sqlx::Error> {
    sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// Own contacts plus the ones shared with `user_id`.
pub async fn list_visible(user_id: Uuid, skip: i64, limit: i64, pool: &PGPool) -> Result<Vec<Contact>, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        "SELECT c.* FROM contacts c WHERE c.user_id = $1
        UNION
        SELECT c.* FROM contacts c
            JOIN shares s ON s.subject_type = $2 AND s.subject_id = c.id
            WHERE s.grantee_id = $1
        ORDER BY name, id
        OFFSET $3 LIMIT $4",
    )
    .bind(user_id)
    .bind(SubjectType::Contact.as_str())
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn update(contact: &Contact, pool: &PGPool) -> Result<Contact, sqlx::Error> {
    sqlx::query_as::<_, Contact>(
        "UPDATE contacts SET name = $2, email = $3, phone = $4, notes = $5
        WHERE id = $1
        RETURNING *",
    )
    .bind(contact.id)
    .bind(&contact.name)
    .bind(&contact.email)
    .bind(&contact.phone)
    .bind(&contact.notes)
    .fetch_one(pool)
    .await
}

/// Removes the contact and its shares in one transaction. Recipient links and
/// their gifts go with it through the foreign key cascade.
pub async fn delete(id: Uuid, pool: &PGPool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM shares WHERE subject_type = $1 AND subject_id = $2")
        .bind(SubjectType::Contact.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let res = sqlx::query("DELETE FROM contacts WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(res.rows_affected())
}
