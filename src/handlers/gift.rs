use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::{
    dto::{NewGiftDto, UpdateGiftDto},
    errors::MyError,
    service::{self, auth::SessionContext},
    PGPool,
};

use super::deleted;

#[get("/recipients/{id}/gifts")]
pub async fn get_all(session: SessionContext, recipient_id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let gifts = service::gift::list(recipient_id.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(gifts))
}

#[post("/recipients/{id}/gifts")]
pub async fn create(
    session: SessionContext,
    recipient_id: web::Path<Uuid>,
    dto: web::Json<NewGiftDto>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let gift = service::gift::create(recipient_id.into_inner(), dto.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Created().json(gift))
}

#[put("/gifts/{id}")]
pub async fn update(
    session: SessionContext,
    id: web::Path<Uuid>,
    dto: web::Json<UpdateGiftDto>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let gift = service::gift::update(id.into_inner(), dto.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(gift))
}

#[delete("/gifts/{id}")]
pub async fn remove(session: SessionContext, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let rows = service::gift::delete(id.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(deleted(rows))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_all).service(create).service(update).service(remove);
}
