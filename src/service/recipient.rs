use log::info;
use uuid::Uuid;

use crate::{
    db,
    domain::{budget::display_amount, sharing::{Access, Operation}},
    dto::{NewRecipientDto, RecipientDetailDto, UpdateRecipientDto},
    errors::MyError,
    models::{Event, EventRecipient},
    PGPool,
};

use super::{access, auth::SessionContext, event::{assemble_recipients, load_recipient_graph}};

/// A recipient addressed through another event's path is reported as missing,
/// so access on one event never reaches recipients of another.
fn ensure_belongs_to(recipient: &EventRecipient, event_id: Uuid) -> Result<(), MyError> {
    if recipient.event_id != event_id {
        return Err(MyError::not_found("recipient not found"));
    }
    Ok(())
}

/// Loads a recipient that must belong to `event_id`, plus the caller's
/// access on that event.
async fn recipient_in_event(
    event_id: Uuid,
    recipient_id: Uuid,
    op: Operation,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<(Event, Access, EventRecipient), MyError> {
    let (event, access) = access::require_event(event_id, op, session, pool).await?;
    let recipient = db::recipient::get_by_id(recipient_id, pool)
        .await
        .map_err(|err| access::not_found_as(err, "recipient not found"))?;
    ensure_belongs_to(&recipient, event.id)?;
    Ok((event, access, recipient))
}

pub async fn add(
    event_id: Uuid,
    dto: NewRecipientDto,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<EventRecipient, MyError> {
    let budget_limit = dto.budget_limit()?;
    let (event, _) = access::require_event(event_id, Operation::AddRecipient, session, pool).await?;
    // the contact has to be visible to whoever links it
    access::require_contact(dto.contact_id, Operation::View, session, pool).await?;
    if db::recipient::exists(event.id, dto.contact_id, pool).await? {
        return Err(MyError::validation("contact is already a recipient of this event"));
    }
    let recipient = EventRecipient {
        id: Uuid::new_v4(),
        event_id: event.id,
        contact_id: dto.contact_id,
        budget_limit,
        notes: dto.notes,
    };
    let recipient = db::recipient::create(&recipient, pool).await?;
    info!("user {} added recipient {} to event {}", session.user_id, recipient.id, event.id);
    Ok(recipient)
}

pub async fn list(event_id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<Vec<RecipientDetailDto>, MyError> {
    access::require_event(event_id, Operation::View, session, pool).await?;
    let (recipients, contacts, gifts) = load_recipient_graph(event_id, pool).await?;
    Ok(assemble_recipients(recipients, contacts, gifts))
}

pub async fn update(
    event_id: Uuid,
    recipient_id: Uuid,
    dto: UpdateRecipientDto,
    session: &SessionContext,
    pool: &PGPool,
) -> Result<EventRecipient, MyError> {
    let (_, _, mut recipient) = recipient_in_event(
        event_id,
        recipient_id,
        Operation::UpdateRecipient,
        session,
        pool,
    )
    .await?;
    dto.apply(&mut recipient)?;
    let recipient = db::recipient::update(&recipient, pool).await?;
    info!(
        "user {} updated recipient {}, budget {}",
        session.user_id,
        recipient.id,
        display_amount(recipient.budget_limit)
    );
    Ok(recipient)
}

/// Gifts of the recipient are removed with it.
pub async fn remove(event_id: Uuid, recipient_id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<u64, MyError> {
    let (_, _, recipient) = recipient_in_event(
        event_id,
        recipient_id,
        Operation::RemoveRecipient,
        session,
        pool,
    )
    .await?;
    let rows = db::recipient::delete(recipient.id, pool).await?;
    info!("user {} removed recipient {} from event {}", session.user_id, recipient.id, event_id);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn recipient_of(event_id: Uuid) -> EventRecipient {
        EventRecipient {
            id: Uuid::new_v4(),
            event_id,
            contact_id: Uuid::new_v4(),
            budget_limit: Decimal::new(50, 0),
            notes: None,
        }
    }

    #[test]
    fn recipient_of_the_addressed_event_passes() {
        let event_id = Uuid::new_v4();
        assert!(ensure_belongs_to(&recipient_of(event_id), event_id).is_ok());
    }

    #[test]
    fn recipient_of_another_event_is_not_found() {
        let recipient = recipient_of(Uuid::new_v4());
        assert_eq!(
            ensure_belongs_to(&recipient, Uuid::new_v4()),
            Err(MyError::not_found("recipient not found"))
        );
    }
}
