pub mod access;
pub mod auth;
pub mod contact;
pub mod crypto;
pub mod event;
pub mod friend;
pub mod gift;
pub mod log;
pub mod recipient;
pub mod share;
pub mod user;
