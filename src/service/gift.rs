use log::info;
use uuid::Uuid;

use crate::{
    db,
    domain::{budget::display_amount, sharing::Operation},
    dto::{NewGiftDto, UpdateGiftDto},
    errors::MyError,
    models::{EventRecipient, Gift},
    PGPool,
};

use super::{access, auth::SessionContext};

/// Gift permissions follow the event the recipient belongs to.
async fn require_recipient(
    recipient_id: Uuid,
    op: Operation,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<EventRecipient, MyError> {
    let recipient = db::recipient::get_by_id(recipient_id, pool)
        .await
        .map_err(|err| access::not_found_as(err, "recipient not found"))?;
    access::require_event(recipient.event_id, op, session, pool).await?;
    Ok(recipient)
}

async fn require_gift(
    gift_id: Uuid,
    op: Operation,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<Gift, MyError> {
    let gift = db::gift::get_by_id(gift_id, pool)
        .await
        .map_err(|err| access::not_found_as(err, "gift not found"))?;
    require_recipient(gift.event_recipient_id, op, session, pool).await?;
    Ok(gift)
}

pub async fn create(recipient_id: Uuid, dto: NewGiftDto, session: &SessionContext, pool: &PGPool) -> Result<Gift, MyError> {
    let recipient = require_recipient(recipient_id, Operation::AddGift, session, pool).await?;
    let gift = dto.into_gift(recipient.id)?;
    let gift = db::gift::create(&gift, pool).await?;
    info!(
        "user {} added gift {} ({}) for recipient {}",
        session.user_id,
        gift.id,
        display_amount(gift.amount),
        recipient.id
    );
    Ok(gift)
}

pub async fn list(recipient_id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<Vec<Gift>, MyError> {
    let recipient = require_recipient(recipient_id, Operation::View, session, pool).await?;
    Ok(db::gift::list_by_recipient(recipient.id, pool).await?)
}

pub async fn update(gift_id: Uuid, dto: UpdateGiftDto, session: &SessionContext, pool: &PGPool) -> Result<Gift, MyError> {
    let mut gift = require_gift(gift_id, Operation::UpdateGift, session, pool).await?;
    dto.apply(&mut gift)?;
    let gift = db::gift::update(&gift, pool).await?;
    info!("user {} updated gift {}", session.user_id, gift.id);
    Ok(gift)
}

pub async fn delete(gift_id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<u64, MyError> {
    let gift = require_gift(gift_id, Operation::DeleteGift, session, pool).await?;
    let rows = db::gift::delete(gift.id, pool).await?;
    info!("user {} deleted gift {}", session.user_id, gift.id);
    Ok(rows)
}
