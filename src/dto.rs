use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
    domain::budget::{self, RecipientBudget},
    errors::MyError,
    models::{Contact, Event, EventRecipient, Gift},
};

const DEFAULT_PAGE_LIMIT: i64 = 100;
const MAX_PAGE_LIMIT: i64 = 500;

fn require_text(field: &str, value: &str) -> Result<(), MyError> {
    if value.trim().is_empty() {
        return Err(MyError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// For optional columns in update bodies: an absent key is `None` (keep the
/// stored value), an explicit `null` is `Some(None)` (clear it).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewUserDto {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub pwd: String,
    pub pwd_confirm: String,
}

impl NewUserDto {
    pub fn validate(&self) -> Result<(), MyError> {
        require_text("username", &self.username)?;
        require_text("email", &self.email)?;
        require_text("pwd", &self.pwd)?;
        if self.pwd != self.pwd_confirm {
            return Err(MyError::validation("passwords do not match"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginUserRequest {
    pub username: String,
    pub pwd: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthUserResponse {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub token_type: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub username: String,
    pub exp: usize,
}

impl Claims {
    pub fn new(user_id: &Uuid, username: &str, exp: usize) -> Self {
        Self {
            user_id: *user_id,
            username: username.to_string(),
            exp,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    /// (offset, limit)
    pub fn bounds(&self) -> Result<(i64, i64), MyError> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if skip < 0 || limit < 0 {
            return Err(MyError::validation("skip and limit must not be negative"));
        }
        Ok((skip, limit.min(MAX_PAGE_LIMIT)))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewContactDto {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl NewContactDto {
    pub fn validate(&self) -> Result<(), MyError> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UpdateContactDto {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl UpdateContactDto {
    pub fn apply(self, contact: &mut Contact) -> Result<(), MyError> {
        if let Some(v) = self.name {
            require_text("name", &v)?;
            contact.name = v;
        }
        if let Some(v) = self.email {
            contact.email = v;
        }
        if let Some(v) = self.phone {
            contact.phone = v;
        }
        if let Some(v) = self.notes {
            contact.notes = v;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewEventDto {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl NewEventDto {
    pub fn validate(&self) -> Result<(), MyError> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UpdateEventDto {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl UpdateEventDto {
    pub fn apply(self, event: &mut Event) -> Result<(), MyError> {
        if let Some(v) = self.name {
            require_text("name", &v)?;
            event.name = v;
        }
        if let Some(v) = self.date {
            event.date = v;
        }
        if let Some(v) = self.description {
            event.description = v;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewRecipientDto {
    pub contact_id: Uuid,
    pub budget_limit: Option<Decimal>,
    pub notes: Option<String>,
}

impl NewRecipientDto {
    pub fn budget_limit(&self) -> Result<Decimal, MyError> {
        budget::require_amount("budget_limit", self.budget_limit)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UpdateRecipientDto {
    pub budget_limit: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

impl UpdateRecipientDto {
    pub fn apply(self, recipient: &mut EventRecipient) -> Result<(), MyError> {
        if let Some(v) = self.budget_limit {
            recipient.budget_limit = budget::validate_amount("budget_limit", v)?;
        }
        if let Some(v) = self.notes {
            recipient.notes = v;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewGiftDto {
    pub name: String,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub purchased: Option<bool>,
    pub url: Option<String>,
}

impl NewGiftDto {
    pub fn into_gift(self, event_recipient_id: Uuid) -> Result<Gift, MyError> {
        require_text("name", &self.name)?;
        let amount = budget::validate_amount("amount", self.amount.unwrap_or(Decimal::ZERO))?;
        Ok(Gift {
            id: Uuid::new_v4(),
            event_recipient_id,
            name: self.name,
            description: self.description,
            amount,
            purchased: self.purchased.unwrap_or(false),
            url: self.url,
        })
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UpdateGiftDto {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub amount: Option<Decimal>,
    pub purchased: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub url: Option<Option<String>>,
}

impl UpdateGiftDto {
    pub fn apply(self, gift: &mut Gift) -> Result<(), MyError> {
        if let Some(v) = self.name {
            require_text("name", &v)?;
            gift.name = v;
        }
        if let Some(v) = self.description {
            gift.description = v;
        }
        if let Some(v) = self.amount {
            gift.amount = budget::validate_amount("amount", v)?;
        }
        if let Some(v) = self.purchased {
            gift.purchased = v;
        }
        if let Some(v) = self.url {
            gift.url = v;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FriendRequestDto {
    pub to_username: String,
}

/// `permission` stays a raw string so an unknown level is reported as a
/// validation failure with a reason instead of a generic body error.
#[derive(Debug, Deserialize, Clone)]
pub struct NewShareDto {
    pub shared_with_user_id: Uuid,
    pub permission: String,
}

#[derive(Debug, Serialize)]
pub struct ShareDto {
    pub user_id: Uuid,
    pub username: String,
    pub permission: String,
}

#[derive(Debug, Serialize)]
pub struct RecipientDetailDto {
    #[serde(flatten)]
    pub recipient: EventRecipient,
    pub contact: Contact,
    pub gifts: Vec<Gift>,
    pub budget: RecipientBudget,
}

#[derive(Debug, Serialize)]
pub struct EventDetailDto {
    #[serde(flatten)]
    pub event: Event,
    /// caller's access level on this event
    pub access: &'static str,
    pub recipients: Vec<RecipientDetailDto>,
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    pub over_budget: bool,
}

#[derive(Debug, Serialize)]
pub struct SubjectWithAccess<T: Serialize> {
    #[serde(flatten)]
    pub subject: T,
    pub access: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn recipient_budget_is_required() {
        let dto: NewRecipientDto =
            serde_json::from_str(&format!(r#"{{"contact_id": "{}"}}"#, Uuid::new_v4())).unwrap();
        assert_eq!(dto.budget_limit(), Err(MyError::validation("budget_limit is required")));
    }

    #[test]
    fn recipient_budget_parses_from_json_number() {
        let dto: NewRecipientDto = serde_json::from_str(&format!(
            r#"{{"contact_id": "{}", "budget_limit": 100.5}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        assert_eq!(dto.budget_limit(), Ok(d("100.5")));
    }

    #[test]
    fn non_numeric_budget_is_rejected() {
        let res: Result<NewRecipientDto, _> = serde_json::from_str(&format!(
            r#"{{"contact_id": "{}", "budget_limit": "lots"}}"#,
            Uuid::new_v4()
        ));
        assert!(res.is_err());
    }

    #[test]
    fn gift_defaults_and_negative_amount() {
        let recipient_id = Uuid::new_v4();
        let dto = NewGiftDto {
            name: "Book".to_string(),
            description: None,
            amount: None,
            purchased: None,
            url: None,
        };
        let gift = dto.clone().into_gift(recipient_id).unwrap();
        assert_eq!(gift.amount, Decimal::ZERO);
        assert!(!gift.purchased);
        assert_eq!(gift.event_recipient_id, recipient_id);

        let negative = NewGiftDto { amount: Some(d("-5")), ..dto };
        assert!(matches!(negative.into_gift(recipient_id), Err(MyError::ValidationError(_))));
    }

    #[test]
    fn recipient_update_keeps_unset_fields() {
        let mut recipient = EventRecipient {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            budget_limit: d("20"),
            notes: Some("likes tea".to_string()),
        };
        UpdateRecipientDto { budget_limit: Some(d("35")), notes: None }
            .apply(&mut recipient)
            .unwrap();
        assert_eq!(recipient.budget_limit, d("35"));
        assert_eq!(recipient.notes.as_deref(), Some("likes tea"));

        let res = UpdateRecipientDto { budget_limit: Some(d("-1")), notes: None }.apply(&mut recipient);
        assert!(res.is_err());
        assert_eq!(recipient.budget_limit, d("35"));
    }

    fn contact_with_email() -> Contact {
        Contact {
            id: Uuid::new_v4(),
            name: "Ann".to_string(),
            email: Some("ann@example.com".to_string()),
            phone: Some("555-0100".to_string()),
            notes: None,
            user_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn null_clears_and_absent_keeps() {
        let mut contact = contact_with_email();
        let dto: UpdateContactDto = serde_json::from_str(r#"{"email": null}"#).unwrap();
        dto.apply(&mut contact).unwrap();
        assert_eq!(contact.email, None);
        assert_eq!(contact.phone.as_deref(), Some("555-0100"));

        let dto: UpdateContactDto = serde_json::from_str(r#"{"notes": "met at work"}"#).unwrap();
        dto.apply(&mut contact).unwrap();
        assert_eq!(contact.notes.as_deref(), Some("met at work"));
        assert_eq!(contact.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn event_date_and_gift_url_can_be_cleared() {
        let mut event = Event {
            id: Uuid::new_v4(),
            name: "Birthday".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1),
            description: Some("cake".to_string()),
            user_id: Uuid::new_v4(),
        };
        let dto: UpdateEventDto = serde_json::from_str(r#"{"date": null}"#).unwrap();
        dto.apply(&mut event).unwrap();
        assert_eq!(event.date, None);
        assert_eq!(event.description.as_deref(), Some("cake"));

        let mut gift = NewGiftDto {
            name: "Book".to_string(),
            description: None,
            amount: Some(d("12")),
            purchased: None,
            url: Some("https://example.com/book".to_string()),
        }
        .into_gift(Uuid::new_v4())
        .unwrap();
        let dto: UpdateGiftDto = serde_json::from_str(r#"{"url": null, "purchased": true}"#).unwrap();
        dto.apply(&mut gift).unwrap();
        assert_eq!(gift.url, None);
        assert!(gift.purchased);
        assert_eq!(gift.amount, d("12"));
    }

    #[test]
    fn pagination_defaults_and_caps() {
        assert_eq!(Pagination::default().bounds(), Ok((0, 100)));
        let big = Pagination { skip: Some(10), limit: Some(10_000) };
        assert_eq!(big.bounds(), Ok((10, 500)));
        assert!(Pagination { skip: Some(-1), limit: None }.bounds().is_err());
    }

    #[test]
    fn new_user_passwords_must_match() {
        let dto = NewUserDto {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: None,
            pwd: "secret".to_string(),
            pwd_confirm: "secret!".to_string(),
        };
        assert_eq!(dto.validate(), Err(MyError::validation("passwords do not match")));
    }
}
