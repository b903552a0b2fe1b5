pub mod auth;
pub mod contact;
pub mod event;
pub mod friend;
pub mod gift;
pub mod health;
pub mod recipient;
pub mod user;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::errors::MyError;

/// Malformed bodies, paths and queries surface as validation errors with
/// the parser's reason instead of actix's plain-text defaults.
pub fn init_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| MyError::validation(err.to_string()).into()))
        .app_data(web::PathConfig::default().error_handler(|err, _req| MyError::validation(err.to_string()).into()))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| MyError::validation(err.to_string()).into()));
}

pub fn deleted(rows: u64) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "ok": true, "deleted": rows }))
}
