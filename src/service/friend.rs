use log::info;
use uuid::Uuid;

use crate::{
    db,
    domain::friendship::{self, FriendRequestAction},
    dto::FriendRequestDto,
    errors::MyError,
    models::{FriendRequest, User},
    PGPool,
};

use super::{access::not_found_as, auth::SessionContext};

pub async fn send(session: &SessionContext, dto: FriendRequestDto, pool: &PGPool) -> Result<FriendRequest, MyError> {
    let to_user = db::user::get_by_username(dto.to_username.trim(), pool)
        .await?
        .ok_or_else(|| MyError::not_found("user not found"))?;
    let existing = db::friend::list_between(session.user_id, to_user.id, pool).await?;
    friendship::check_new_request(session.user_id, to_user.id, &existing)?;
    let request = db::friend::create(session.user_id, to_user.id, pool)
        .await
        .map_err(|err| lost_pending_race(err.into()))?;
    info!("friend request {} from {} to {}", request.id, session.user_id, to_user.id);
    Ok(request)
}

/// A concurrent send between the same pair trips the one-pending-per-pair
/// index after both passed `check_new_request`.
fn lost_pending_race(err: MyError) -> MyError {
    match err {
        MyError::ValidationError(_) => MyError::validation("friend request already exists"),
        other => other,
    }
}

pub async fn incoming(session: &SessionContext, pool: &PGPool) -> Result<Vec<FriendRequest>, MyError> {
    Ok(db::friend::list_incoming_pending(session.user_id, pool).await?)
}

pub async fn respond(
    request_id: Uuid,
    action: FriendRequestAction,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<FriendRequest, MyError> {
    let request = db::friend::get_by_id(request_id, pool)
        .await
        .map_err(|err| not_found_as(err, "friend request not found"))?;
    let next = friendship::respond(session.user_id, &request, action)?;
    // a concurrent answer may have won since the read above
    let updated = db::friend::set_status(request.id, next, pool)
        .await?
        .ok_or_else(|| MyError::validation("friend request is no longer pending"))?;
    info!("friend request {} is now {}", updated.id, updated.status.as_str());
    Ok(updated)
}

pub async fn list_friends(session: &SessionContext, pool: &PGPool) -> Result<Vec<User>, MyError> {
    let accepted = db::friend::list_accepted(session.user_id, pool).await?;
    let ids = friendship::friend_ids(session.user_id, &accepted);
    Ok(db::user::get_many(&ids, pool).await?)
}

pub async fn are_friends(a: Uuid, b: Uuid, pool: &PGPool) -> Result<bool, MyError> {
    let requests = db::friend::list_between(a, b, pool).await?;
    Ok(friendship::are_friends(a, b, &requests))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_pending_insert_reads_as_existing_request() {
        assert_eq!(
            lost_pending_race(MyError::validation("record already exists")),
            MyError::validation("friend request already exists")
        );
        assert_eq!(lost_pending_race(MyError::InternalError), MyError::InternalError);
    }
}
