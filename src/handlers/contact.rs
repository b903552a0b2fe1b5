use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::{
    domain::sharing::SubjectType,
    dto::{NewContactDto, NewShareDto, Pagination, UpdateContactDto},
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
    let contacts = service::contact::list(&session, &page, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(contacts))
}

#[post("")]
pub async fn create(
    session: SessionContext,
    dto: web::Json<NewContactDto>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let contact = service::contact::create(&session, dto.into_inner(), pool_state.get_ref()).await?;
    Ok(HttpResponse::Created().json(contact))
}

#[get("/{id}")]
pub async fn get_by_id(session: SessionContext, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let contact = service::contact::get(id.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(contact))
}

#[put("/{id}")]
pub async fn update(
    session: SessionContext,
    id: web::Path<Uuid>,
    dto: web::Json<UpdateContactDto>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let contact = service::contact::update(id.into_inner(), dto.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(contact))
}

#[delete("/{id}")]
pub async fn remove(session: SessionContext, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let rows = service::contact::delete(id.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(deleted(rows))
}

#[get("/{id}/shares")]
pub async fn get_shares(session: SessionContext, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let shares = service::share::list(SubjectType::Contact, id.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(shares))
}

#[post("/{id}/shares")]
pub async fn share(
    session: SessionContext,
    id: web::Path<Uuid>,
    dto: web::Json<NewShareDto>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let share = service::share::share(SubjectType::Contact, id.into_inner(), dto.into_inner(), &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(share))
}

#[delete("/{id}/shares/{user_id}")]
pub async fn unshare(
    session: SessionContext,
    path: web::Path<(Uuid, Uuid)>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let (id, user_id) = path.into_inner();
    let rows = service::share::revoke(SubjectType::Contact, id, user_id, &session, pool_state.get_ref()).await?;
    Ok(deleted(rows))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contacts")
            .service(get_all)
            .service(create)
            .service(get_shares)
            .service(share)
            .service(unshare)
            .service(get_by_id)
            .service(update)
            .service(remove),
    );
}
