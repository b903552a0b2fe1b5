use actix_web::{post, web, HttpResponse};
use log::info;

use crate::{
    config::Config,
    dto::{LoginUserRequest, NewUserDto, RefreshTokenRequest},
    errors::MyError,
    service, PGPool,
};

#[post("/register")]
pub async fn register(dto: web::Json<NewUserDto>, pool_state: web::Data<PGPool>) -> Result<HttpResponse, MyError> {
    let conn: &PGPool = pool_state.get_ref();
    let user = service::user::create(dto.into_inner(), conn).await?;
    info!("RESPONSE /register: {}", user.id);
    Ok(HttpResponse::Created().json(user))
}

#[post("/token")]
pub async fn login(
    dto: web::Json<LoginUserRequest>,
    config: web::Data<Config>,
    pool_state: web::Data<PGPool>,
) -> Result<HttpResponse, MyError> {
    let conn: &PGPool = pool_state.get_ref();
    let tokens = service::auth::session::login(dto.into_inner(), &config.auth, conn).await?;
    Ok(HttpResponse::Ok().json(tokens))
}

#[post("/token/refresh")]
pub async fn refresh(dto: web::Json<RefreshTokenRequest>, config: web::Data<Config>) -> Result<HttpResponse, MyError> {
    let tokens = service::auth::session::refresh(&dto.refresh_token, &config.auth)?;
    Ok(HttpResponse::Ok().json(tokens))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login).service(refresh);
}
