use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::{
    dto::{NewRecipientDto, UpdateRecipientDto},
    errors::MyError,
    service::{self, auth::SessionContext},
    PGPool,
};

use super::deleted;

// mounted under /events

#[get("/{id}/recipients")]
pub async fn get_all(session: SessionContext, event_id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let recipients = service::recipient::list(event_id.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(recipients))
}

#[post("/{id}/recipients")]
pub async fn add(
    session: SessionContext,
    event_id: web::Path<Uuid>,
    dto: web::Json<NewRecipientDto>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let recipient = service::recipient::add(event_id.into_inner(), dto.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Created().json(recipient))
}

#[put("/{id}/recipients/{recipient_id}")]
pub async fn update(
    session: SessionContext,
    path: web::Path<(Uuid, Uuid)>,
    dto: web::Json<UpdateRecipientDto>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let (event_id, recipient_id) = path.into_inner();
    let recipient = service::recipient::update(event_id, recipient_id, dto.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(recipient))
}

#[delete("/{id}/recipients/{recipient_id}")]
pub async fn remove(
    session: SessionContext,
    path: web::Path<(Uuid, Uuid)>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let (event_id, recipient_id) = path.into_inner();
    let rows = service::recipient::remove(event_id, recipient_id, &session, pool_state.get_ref()).await?;
    Ok(deleted(rows))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_all).service(add).service(update).service(remove);
}
