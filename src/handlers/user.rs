use actix_web::{get, web, HttpResponse};

use crate::{errors::MyError, service::{self, auth::SessionContext}, PGPool};

#[get("/me")]
pub async fn me(session: SessionContext, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let user = service::user::get_by_id(session.user_id, pool_state.get_ref()).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/users").service(me));
}
