use std::collections::HashMap;

use log::{info, warn};
use uuid::Uuid;

use crate::{
    db,
    domain::{
        budget::{self, EventBudget},
        sharing::{Access, Operation, SubjectType},
    },
    dto::{EventDetailDto, NewEventDto, Pagination, RecipientDetailDto, SubjectWithAccess, UpdateEventDto},
    errors::MyError,
    models::{Contact, Event, EventRecipient, Gift},
    PGPool,
};

use super::{access, auth::SessionContext};

pub async fn create(session: &SessionContext, dto: NewEventDto, pool: &PGPool) -> Result<Event, MyError> {
    dto.validate()?;
    let event = Event {
        id: Uuid::new_v4(),
        name: dto.name,
        date: dto.date,
        description: dto.description,
        user_id: session.user_id,
    };
    let event = db::event::create(&event, pool).await?;
    info!("user {} created event {}", session.user_id, event.id);
    Ok(event)
}

pub async fn list(
    session: &SessionContext,
    page: &Pagination,
    pool: &PGPool,
) -> Result<Vec<SubjectWithAccess<Event>>, MyError> {
    let (skip, limit) = page.bounds()?;
    let events = db::event::list_visible(session.user_id, skip, limit, pool).await?;
    let grants: HashMap<Uuid, _> = db::share::list_for_grantee(SubjectType::Event, session.user_id, pool)
        .await?
        .into_iter()
        .map(|share| (share.subject_id, share.permission))
        .collect();
    Ok(events
        .into_iter()
        .map(|event| {
            let access = Access::resolve(session.user_id, event.user_id, grants.get(&event.id).copied());
            SubjectWithAccess { access: access.label(), subject: event }
        })
        .collect())
}

/// Recipients of the event with their contact and gifts, in recipient order.
pub async fn load_recipient_graph(
    event_id: Uuid,
    pool: &PGPool,
) -> Result<(Vec<EventRecipient>, Vec<Contact>, Vec<Gift>), MyError> {
    let recipients = db::recipient::list_by_event(event_id, pool).await?;
    let contact_ids: Vec<Uuid> = recipients.iter().map(|r| r.contact_id).collect();
    let contacts = db::contact::get_many(&contact_ids, pool).await?;
    let gifts = db::gift::list_by_event(event_id, pool).await?;
    Ok((recipients, contacts, gifts))
}

/// Groups the flat rows into recipient details. A recipient whose contact
/// row is missing was removed concurrently and is skipped.
pub fn assemble_recipients(
    recipients: Vec<EventRecipient>,
    contacts: Vec<Contact>,
    gifts: Vec<Gift>,
) -> Vec<RecipientDetailDto> {
    let mut contacts: HashMap<Uuid, Contact> = contacts.into_iter().map(|c| (c.id, c)).collect();
    let mut gifts_by_recipient: HashMap<Uuid, Vec<Gift>> = HashMap::new();
    for gift in gifts {
        gifts_by_recipient.entry(gift.event_recipient_id).or_default().push(gift);
    }
    recipients
        .into_iter()
        .filter_map(|recipient| {
            let contact = match contacts.remove(&recipient.contact_id) {
                Some(contact) => contact,
                None => {
                    warn!("recipient {} points at missing contact {}", recipient.id, recipient.contact_id);
                    return None;
                }
            };
            let gifts = gifts_by_recipient.remove(&recipient.id).unwrap_or_default();
            let budget = budget::summarize_recipient(&recipient, &gifts);
            Some(RecipientDetailDto { recipient, contact, gifts, budget })
        })
        .collect()
}

pub fn assemble_detail(event: Event, access: Access, recipients: Vec<RecipientDetailDto>) -> EventDetailDto {
    let totals = budget::summarize_event(recipients.iter().map(|r| r.budget.clone()).collect());
    EventDetailDto {
        event,
        access: access.label(),
        recipients,
        total_budget: totals.total_budget,
        total_spent: totals.total_spent,
        total_remaining: totals.total_remaining,
        over_budget: totals.over_budget,
    }
}

pub async fn get_detail(id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<EventDetailDto, MyError> {
    let (event, access) = access::require_event(id, Operation::View, session, pool).await?;
    let (recipients, contacts, gifts) = load_recipient_graph(event.id, pool).await?;
    let recipients = assemble_recipients(recipients, contacts, gifts);
    Ok(assemble_detail(event, access, recipients))
}

pub async fn get_budget(id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<EventBudget, MyError> {
    access::require_event(id, Operation::View, session, pool).await?;
    let recipients = db::recipient::list_by_event(id, pool).await?;
    let mut gifts_by_recipient: HashMap<Uuid, Vec<Gift>> = HashMap::new();
    for gift in db::gift::list_by_event(id, pool).await? {
        gifts_by_recipient.entry(gift.event_recipient_id).or_default().push(gift);
    }
    let summaries = recipients
        .iter()
        .map(|r| {
            let gifts = gifts_by_recipient.get(&r.id).map(Vec::as_slice).unwrap_or(&[]);
            budget::summarize_recipient(r, gifts)
        })
        .collect();
    Ok(budget::summarize_event(summaries))
}

pub async fn update(id: Uuid, dto: UpdateEventDto, session: &SessionContext, pool: &PGPool) -> Result<Event, MyError> {
    let (mut event, _) = access::require_event(id, Operation::UpdateSubject, session, pool).await?;
    dto.apply(&mut event)?;
    let event = db::event::update(&event, pool).await?;
    info!("user {} updated event {}", session.user_id, event.id);
    Ok(event)
}

pub async fn delete(id: Uuid, session: &SessionContext, pool: &PGPool) -> Result<u64, MyError> {
    access::require_event(id, Operation::DeleteSubject, session, pool).await?;
    let rows = db::event::delete(id, pool).await?;
    info!("user {} deleted event {}", session.user_id, id);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sharing::Permission;
    use rust_decimal::Decimal;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn contact(owner: Uuid, name: &str) -> Contact {
        Contact {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            phone: None,
            notes: None,
            user_id: owner,
        }
    }

    fn gift(recipient: &EventRecipient, amount: &str) -> Gift {
        Gift {
            id: Uuid::new_v4(),
            event_recipient_id: recipient.id,
            name: "gift".to_string(),
            description: None,
            amount: d(amount),
            purchased: false,
            url: None,
        }
    }

    #[test]
    fn detail_groups_gifts_and_totals_budget() {
        let owner = Uuid::new_v4();
        let event = Event {
            id: Uuid::new_v4(),
            name: "Holidays".to_string(),
            date: None,
            description: None,
            user_id: owner,
        };
        let ann = contact(owner, "Ann");
        let ben = contact(owner, "Ben");
        let r1 = EventRecipient {
            id: Uuid::new_v4(),
            event_id: event.id,
            contact_id: ann.id,
            budget_limit: d("100"),
            notes: None,
        };
        let r2 = EventRecipient {
            id: Uuid::new_v4(),
            event_id: event.id,
            contact_id: ben.id,
            budget_limit: d("50"),
            notes: None,
        };
        let gifts = vec![gift(&r1, "30"), gift(&r2, "60"), gift(&r1, "45")];

        let recipients = assemble_recipients(vec![r1.clone(), r2.clone()], vec![ben, ann], gifts);
        assert_eq!(recipients.len(), 2);
        assert_eq!(recipients[0].contact.name, "Ann");
        assert_eq!(recipients[0].gifts.len(), 2);
        assert_eq!(recipients[0].budget.remaining, d("25"));
        assert_eq!(recipients[1].budget.remaining, d("-10"));

        let detail = assemble_detail(event, Access::Grantee(Permission::Read), recipients);
        assert_eq!(detail.access, "read");
        assert_eq!(detail.total_budget, d("150"));
        assert_eq!(detail.total_spent, d("135"));
        assert_eq!(detail.total_remaining, d("15"));
    }

    #[test]
    fn recipient_with_missing_contact_is_skipped() {
        let recipient = EventRecipient {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            budget_limit: d("10"),
            notes: None,
        };
        assert!(assemble_recipients(vec![recipient], vec![], vec![]).is_empty());
    }
}
