use std::collections::HashMap;

use log::info;
use uuid::Uuid;

use crate::{
    db,
    domain::sharing::{self, Operation, SubjectType},
    dto::{NewShareDto, ShareDto},
    errors::MyError,
    models::Share,
    PGPool,
};

use super::{access, auth::SessionContext, friend};

async fn owner_of(subject_type: SubjectType, subject_id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<Uuid, MyError> {
    let owner_id = match subject_type {
        SubjectType::Contact => access::contact_access(subject_id, session, pool).await?.0.user_id,
        SubjectType::Event => access::event_access(subject_id, session, pool).await?.0.user_id,
    };
    Ok(owner_id)
}

/// Creates the share, or changes the level of an existing one.
pub async fn share(
    subject_type: SubjectType,
    subject_id: Uuid,
    dto: NewShareDto,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<Share, MyError> {
    let owner_id = owner_of(subject_type, subject_id, session, pool).await?;
    let is_friend = session.user_id == owner_id
        && friend::are_friends(owner_id, dto.shared_with_user_id, pool).await?;
    let permission = sharing::authorize_share(
        session.user_id,
        owner_id,
        dto.shared_with_user_id,
        &dto.permission,
        is_friend,
    )?;
    let share = db::share::upsert(subject_type, subject_id, dto.shared_with_user_id, permission, pool).await?;
    info!(
        "{} {} shared with {} at {}",
        subject_type.as_str(),
        subject_id,
        share.grantee_id,
        share.permission
    );
    Ok(share)
}

/// Removing a share that does not exist is not an error.
pub async fn revoke(
    subject_type: SubjectType,
    subject_id: Uuid,
    grantee_id: Uuid,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<u64, MyError> {
    let owner_id = owner_of(subject_type, subject_id, session, pool).await?;
    sharing::authorize_revoke(session.user_id, owner_id)?;
    let rows = db::share::delete(subject_type, subject_id, grantee_id, pool).await?;
    info!("{} {} unshared from {}", subject_type.as_str(), subject_id, grantee_id);
    Ok(rows)
}

pub async fn list(
    subject_type: SubjectType,
    subject_id: Uuid,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<Vec<ShareDto>, MyError> {
    let access = match subject_type {
        SubjectType::Contact => access::contact_access(subject_id, session, pool).await?.1,
        SubjectType::Event => access::event_access(subject_id, session, pool).await?.1,
    };
    access.permit(Operation::ManageShares, subject_type)?;
    let shares = db::share::list_for_subject(subject_type, subject_id, pool).await?;
    let ids: Vec<Uuid> = shares.iter().map(|s| s.grantee_id).collect();
    let usernames: HashMap<Uuid, String> = db::user::get_many(&ids, pool)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();
    Ok(shares
        .into_iter()
        .map(|s| ShareDto {
            user_id: s.grantee_id,
            username: usernames.get(&s.grantee_id).cloned().unwrap_or_default(),
            permission: s.permission.to_string(),
        })
        .collect())
}
