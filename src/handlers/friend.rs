use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    domain::friendship::FriendRequestAction,
    dto::FriendRequestDto,
    errors::MyError,
    service::{self, auth::SessionContext},
    PGPool,
};

#[post("/request")]
pub async fn send_request(
    session: SessionContext,
    dto: web::Json<FriendRequestDto>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let request = service::friend::send(&session, dto.into_inner(), pool_state.get_ref()).await?;
    Ok(HttpResponse::Created().json(request))
}

#[get("/requests")]
pub async fn incoming(session: SessionContext, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let requests = service::friend::incoming(&session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(requests))
}

#[post("/requests/{id}/accept")]
pub async fn accept(session: SessionContext, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let request = service::friend::respond(id.into_inner(), FriendRequestAction::Accept, &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(request))
}

#[post("/requests/{id}/reject")]
pub async fn reject(session: SessionContext, id: web::Path<Uuid>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let request = service::friend::respond(id.into_inner(), FriendRequestAction::Reject, &session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(request))
}

#[get("")]
pub async fn get_all(session: SessionContext, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let friends = service::friend::list_friends(&session, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(friends))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/friends")
            .service(get_all)
            .service(send_request)
            .service(incoming)
            .service(accept)
            .service(reject),
    );
}
