use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::domain::{friendship::FriendRequestStatus, sharing::{Permission, SubjectType}};

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    #[serde(skip_serializing, default)]
    pub pwd_hash: String,
    #[serde(skip_serializing, default)]
    pub pwd_salt: String,
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct EventRecipient {
    pub id: Uuid,
    pub event_id: Uuid,
    pub contact_id: Uuid,
    pub budget_limit: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct Gift {
    pub id: Uuid,
    pub event_recipient_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub purchased: bool,
    pub url: Option<String>,
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct FriendRequest {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub status: FriendRequestStatus,
    pub created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct Share {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub subject_type: SubjectType,
    pub subject_id: Uuid,
    pub grantee_id: Uuid,
    #[sqlx(try_from = "String")]
    pub permission: Permission,
    pub created_at: chrono::DateTime<Utc>,
}
