use std::{fmt, str::FromStr};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::MyError;

/// Grant level held by a non-owner. Ordered: `Read < Write < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Admin,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Admin => "admin",
        }
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            Permission::Read => Capabilities::VIEW,
            Permission::Write => Capabilities::VIEW | Capabilities::EDIT,
            Permission::Admin => Capabilities::VIEW | Capabilities::EDIT | Capabilities::MANAGE_CONTENT,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = MyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Permission::Read),
            "write" => Ok(Permission::Write),
            "admin" => Ok(Permission::Admin),
            other => Err(MyError::validation(format!(
                "invalid permission '{other}', expected read, write or admin"
            ))),
        }
    }
}

impl TryFrom<String> for Permission {
    type Error = MyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    Contact,
    Event,
}

impl SubjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Contact => "contact",
            SubjectType::Event => "event",
        }
    }
}

impl TryFrom<String> for SubjectType {
    type Error = MyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "contact" => Ok(SubjectType::Contact),
            "event" => Ok(SubjectType::Event),
            other => Err(MyError::validation(format!("unknown share subject '{other}'"))),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const VIEW = 1;
        /// update fields, add or update gifts, change recipient budgets
        const EDIT = 1 << 1;
        /// delete gifts, add or remove recipients
        const MANAGE_CONTENT = 1 << 2;
        /// create, update and revoke shares
        const MANAGE_SHARING = 1 << 3;
        const DELETE_SUBJECT = 1 << 4;
    }
}

/// Guarded actions on a contact or event. Gift and recipient operations are
/// checked against the event they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    View,
    UpdateSubject,
    DeleteSubject,
    AddGift,
    UpdateGift,
    DeleteGift,
    AddRecipient,
    UpdateRecipient,
    RemoveRecipient,
    ManageShares,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::View,
        Operation::UpdateSubject,
        Operation::DeleteSubject,
        Operation::AddGift,
        Operation::UpdateGift,
        Operation::DeleteGift,
        Operation::AddRecipient,
        Operation::UpdateRecipient,
        Operation::RemoveRecipient,
        Operation::ManageShares,
    ];

    pub fn required(self) -> Capabilities {
        match self {
            Operation::View => Capabilities::VIEW,
            Operation::UpdateSubject | Operation::AddGift | Operation::UpdateGift | Operation::UpdateRecipient => {
                Capabilities::EDIT
            }
            Operation::DeleteGift | Operation::AddRecipient | Operation::RemoveRecipient => {
                Capabilities::MANAGE_CONTENT
            }
            Operation::ManageShares => Capabilities::MANAGE_SHARING,
            Operation::DeleteSubject => Capabilities::DELETE_SUBJECT,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Operation::View => "view",
            Operation::UpdateSubject => "update",
            Operation::DeleteSubject => "delete",
            Operation::AddGift => "add gifts to",
            Operation::UpdateGift => "update gifts of",
            Operation::DeleteGift => "delete gifts of",
            Operation::AddRecipient => "add recipients to",
            Operation::UpdateRecipient => "update recipients of",
            Operation::RemoveRecipient => "remove recipients from",
            Operation::ManageShares => "manage sharing of",
        }
    }
}

/// What a user may do with one contact or event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Owner,
    Grantee(Permission),
    Denied,
}

impl Access {
    pub fn resolve(user_id: Uuid, owner_id: Uuid, grant: Option<Permission>) -> Self {
        if user_id == owner_id {
            return Access::Owner;
        }
        match grant {
            Some(permission) => Access::Grantee(permission),
            None => Access::Denied,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Access::Owner => Capabilities::all(),
            Access::Grantee(permission) => permission.capabilities(),
            Access::Denied => Capabilities::empty(),
        }
    }

    pub fn can_view(&self) -> bool {
        self.capabilities().contains(Capabilities::VIEW)
    }

    pub fn can_edit(&self) -> bool {
        self.capabilities().contains(Capabilities::EDIT)
    }

    pub fn can_manage_content(&self) -> bool {
        self.capabilities().contains(Capabilities::MANAGE_CONTENT)
    }

    pub fn can_manage_sharing(&self) -> bool {
        self.capabilities().contains(Capabilities::MANAGE_SHARING)
    }

    /// `owner`, `read`, `write`, `admin` or `none`
    pub fn label(&self) -> &'static str {
        match self {
            Access::Owner => "owner",
            Access::Grantee(permission) => permission.as_str(),
            Access::Denied => "none",
        }
    }

    /// `Ok` when this access allows `op` on a subject of kind `subject`.
    pub fn permit(&self, op: Operation, subject: SubjectType) -> Result<(), MyError> {
        self.require(op.required(), &format!("{} this {}", op.verb(), subject.as_str()))
    }

    pub fn require(&self, needed: Capabilities, action: &str) -> Result<(), MyError> {
        if self.capabilities().contains(needed) {
            Ok(())
        } else {
            Err(MyError::denied(format!(
                "{} access is not enough to {action}",
                self.label()
            )))
        }
    }
}

/// Validates a share request and returns the parsed permission.
/// The permission is never adjusted: an invalid level is rejected outright.
pub fn authorize_share(
    requester_id: Uuid,
    owner_id: Uuid,
    grantee_id: Uuid,
    permission: &str,
    grantee_is_friend: bool,
) -> Result<Permission, MyError> {
    if requester_id != owner_id {
        return Err(MyError::denied("only the owner can share"));
    }
    let permission: Permission = permission.parse()?;
    if grantee_id == owner_id {
        return Err(MyError::validation("cannot share with yourself"));
    }
    if !grantee_is_friend {
        return Err(MyError::denied("not a friend"));
    }
    Ok(permission)
}

pub fn authorize_revoke(requester_id: Uuid, owner_id: Uuid) -> Result<(), MyError> {
    if requester_id != owner_id {
        return Err(MyError::denied("only the owner can revoke a share"));
    }
    Ok(())
}
