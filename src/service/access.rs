use uuid::Uuid;

use crate::{
    db,
    domain::sharing::{Access, Operation, SubjectType},
    errors::MyError,
    models::{Contact, Event},
    PGPool,
};

use super::auth::SessionContext;

async fn grant_for(
    subject_type: SubjectType,
    subject_id: Uuid,
    session: &SessionContext,
    owner_id: Uuid,
    pool: &PGPool,
) -> Result<Access, MyError> {
    if session.user_id == owner_id {
        return Ok(Access::Owner);
    }
    let share = db::share::find(subject_type, subject_id, session.user_id, pool).await?;
    Ok(Access::resolve(session.user_id, owner_id, share.map(|s| s.permission)))
}

pub async fn contact_access(id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<(Contact, Access), MyError> {
    let contact = db::contact::get_by_id(id, pool)
        .await
        .map_err(|err| not_found_as(err, "contact not found"))?;
    let access = grant_for(SubjectType::Contact, contact.id, session, contact.user_id, pool).await?;
    Ok((contact, access))
}

pub async fn event_access(id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<(Event, Access), MyError> {
    let event = db::event::get_by_id(id, pool)
        .await
        .map_err(|err| not_found_as(err, "event not found"))?;
    let access = grant_for(SubjectType::Event, event.id, session, event.user_id, pool).await?;
    Ok((event, access))
}

/// Loads the contact and checks that the caller may perform `op` on it.
pub async fn require_contact(
    id: Uuid,
    op: Operation,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<(Contact, Access), MyError> {
    let (contact, access) = contact_access(id, session, pool).await?;
    access.permit(op, SubjectType::Contact)?;
    Ok((contact, access))
}

pub async fn require_event(
    id: Uuid,
    op: Operation,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<(Event, Access), MyError> {
    let (event, access) = event_access(id, session, pool).await?;
    access.permit(op, SubjectType::Event)?;
    Ok((event, access))
}

pub fn not_found_as(err: sqlx::Error, reason: &str) -> MyError {
    match err {
        sqlx::Error::RowNotFound => MyError::not_found(reason),
        other => other.into(),
    }
}
