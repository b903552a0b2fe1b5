use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::{
    domain::sharing::SubjectType,
    dto::{NewEventDto, NewShareDto, Pagination, UpdateEventDto},
    errors::MyError,
    service::{self, auth::SessionContext},
    PGPool,
};

use super::deleted;

#[get("")]
pub async fn get_all(
    session: SessionContext,
    page: web::Query<Pagination>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let events = service::event::list(&session, &page, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(events))
}

#[post("")]
pub async fn create(
    session: SessionContext,
    new_event_dto: web::Json<NewEventDto>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let event = service::event::create(&session, new_event_dto.into_inner(), pool_state.get_ref()).await?;
    Ok(HttpResponse::Created().json(event))
}

/// Event with recipients, their gifts and the budget aggregates.
#[get("/{id}")]
pub async fn get_by_id(session: SessionContext, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let detail = service::event::get_detail(id.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[get("/{id}/budget")]
pub async fn get_budget(session: SessionContext, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let budget = service::event::get_budget(id.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(budget))
}

#[put("/{id}")]
pub async fn update(
    session: SessionContext,
    id: web::Path<Uuid>,
    update_event_dto: web::Json<UpdateEventDto>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let event = service::event::update(id.into_inner(), update_event_dto.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(event))
}

#[delete("/{id}")]
pub async fn remove(session: SessionContext, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let rows = service::event::delete(id.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(deleted(rows))
}

#[get("/{id}/shares")]
pub async fn get_shares(session: SessionContext, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let shares = service::share::list(SubjectType::Event, id.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(shares))
}

#[post("/{id}/shares")]
pub async fn share(
    session: SessionContext,
    id: web::Path<Uuid>,
    dto: web::Json<NewShareDto>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let share = service::share::share(SubjectType::Event, id.into_inner(), dto.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(share))
}

#[delete("/{id}/shares/{user_id}")]
pub async fn unshare(
    session: SessionContext,
    path: web::Path<(Uuid, Uuid)>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let (id, user_id) = path.into_inner();
    let rows = service::share::revoke(SubjectType::Event, id, user_id, &session, pool_state.get_ref()).await?;
    Ok(deleted(rows))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .service(get_all)
            .service(create)
            .service(get_budget)
            .service(get_shares)
            .service(share)
            .service(unshare)
            .configure(super::recipient::init_routes)
            .service(get_by_id)
            .service(update)
            .service(remove),
    );
}
