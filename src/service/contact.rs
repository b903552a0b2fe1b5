use std::collections::HashMap;

use log::info;
use uuid::Uuid;

use crate::{
    db,
    domain::sharing::{Access, Operation, SubjectType},
    dto::{NewContactDto, Pagination, SubjectWithAccess, UpdateContactDto},
    errors::MyError,
    models::Contact,
    PGPool,
};

use super::{access, auth::SessionContext};

pub async fn create(session: &SessionContext, dto: NewContactDto, pool: &PGPool) -> Result<Contact, MyError> {
    dto.validate()?;
    let contact = Contact {
        id: Uuid::new_v4(),
        name: dto.name,
        email: dto.email,
        phone: dto.phone,
        notes: dto.notes,
        user_id: session.user_id,
    };
    let contact = db::contact::create(&contact, pool).await?;
    info!("user {} created contact {}", session.user_id, contact.id);
    Ok(contact)
}

/// Own contacts and contacts shared with the caller, each tagged with the
/// caller's access level.
pub async fn list(
    session: &SessionContext,
    page: &Pagination,
    pool: &PGPool,
) -> Result<Vec<SubjectWithAccess<Contact>>, MyError> {
    let (skip, limit) = page.bounds()?;
    let contacts = db::contact::list_visible(session.user_id, skip, limit, pool).await?;
    let grants: HashMap<Uuid, _> = db::share::list_for_grantee(SubjectType::Contact, session.user_id, pool)
        .await?
        .into_iter()
        .map(|share| (share.subject_id, share.permission))
        .collect();
    Ok(contacts
        .into_iter()
        .map(|contact| {
            let access = Access::resolve(session.user_id, contact.user_id, grants.get(&contact.id).copied());
            SubjectWithAccess { access: access.label(), subject: contact }
        })
        .collect())
}

pub async fn get(id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<SubjectWithAccess<Contact>, MyError> {
    let (contact, access) = access::require_contact(id, Operation::View, session, pool).await?;
    Ok(SubjectWithAccess { access: access.label(), subject: contact })
}

pub async fn update(
    id: Uuid,
    dto: UpdateContactDto,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<Contact, MyError> {
    let (mut contact, _) = access::require_contact(id, Operation::UpdateSubject, session, pool).await?;
    dto.apply(&mut contact)?;
    let contact = db::contact::update(&contact, pool).await?;
    info!("user {} updated contact {}", session.user_id, contact.id);
    Ok(contact)
}

pub async fn delete(id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<u64, MyError> {
    access::require_contact(id, Operation::DeleteSubject, session, pool).await?;
    let rows = db::contact::delete(id, pool).await?;
    info!("user {} deleted contact {}", session.user_id, id);
    Ok(rows)
}
