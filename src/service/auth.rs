use std::future::{ready, Ready};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use log::warn;
use uuid::Uuid;

use crate::{config::AuthConfig, errors::MyError};

pub const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, resolved once from the bearer token and passed
/// explicitly into every service call that checks permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub username: String,
}

impl FromRequest for SessionContext {
    type Error = MyError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<SessionContext>()
                .cloned()
                .ok_or(MyError::AuthError),
        )
    }
}

pub struct AuthMiddleware {
    pub auth: AuthConfig,
}

impl AuthMiddleware {
    pub fn new(auth: AuthConfig) -> Self {
        Self { auth }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            auth: self.auth.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    auth: AuthConfig,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session = jwt::parse_request(&req, BEARER_PREFIX)
            .and_then(|token| jwt::decode_claims(&jwt::TokenType::Access, token, &self.auth));
        match session {
            Ok(claims) => {
                req.extensions_mut().insert(SessionContext {
                    user_id: claims.user_id,
                    username: claims.username,
                });
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(err) => {
                warn!("rejected {} {}: {}", req.method(), req.path(), err);
                Box::pin(async move { Ok(req.error_response(err).map_into_right_body()) })
            }
        }
    }
}

pub mod jwt {
    use actix_web::dev::ServiceRequest;
    use chrono::Utc;
    use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
    use uuid::Uuid;

    use crate::{config::AuthConfig, dto::Claims, errors::MyError};

    pub enum TokenType {
        Refresh,
        Access,
    }

    fn secret<'a>(token_type: &TokenType, auth: &'a AuthConfig) -> &'a str {
        match token_type {
            TokenType::Refresh => &auth.refresh_secret,
            TokenType::Access => &auth.access_secret,
        }
    }

    fn ttl(token_type: &TokenType, auth: &AuthConfig) -> usize {
        match token_type {
            TokenType::Refresh => auth.refresh_token_ttl_secs,
            TokenType::Access => auth.access_token_ttl_secs,
        }
    }

    pub fn create(token_type: &TokenType, user_id: &Uuid, username: &str, auth: &AuthConfig) -> Result<String, MyError> {
        let exp = Utc::now().timestamp() as usize + ttl(token_type, auth);
        let claims = Claims::new(user_id, username, exp);
        let key = EncodingKey::from_secret(secret(token_type, auth).as_bytes());
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &key)?)
    }

    /// Verifies signature and expiry. An expired token yields
    /// **`MyError::TokenExpirationError`**, anything else malformed **`MyError::AuthError`**.
    pub fn decode_claims(token_type: &TokenType, token: &str, auth: &AuthConfig) -> Result<Claims, MyError> {
        let key = DecodingKey::from_secret(secret(token_type, auth).as_bytes());
        let data = decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }

    pub fn parse_request<'a>(req: &'a ServiceRequest, prefix: &str) -> Result<&'a str, MyError> {
        req.headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix(prefix))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(MyError::AuthError)
    }
}

pub mod session {
    use log::{info, warn};

    use crate::{
        config::AuthConfig,
        db,
        dto::{AuthUserResponse, LoginUserRequest},
        errors::MyError,
        service::crypto,
        PGPool,
    };

    use super::jwt::{self, TokenType};

    const TOKEN_TYPE: &str = "bearer";

    pub async fn login(req: LoginUserRequest, auth: &AuthConfig, pool: &PGPool) -> Result<AuthUserResponse, MyError> {
        let user = db::user::get_by_username(&req.username, pool).await?;
        let user = match user {
            Some(user) if crypto::verify_password(&req.pwd, &user.pwd_salt, &user.pwd_hash) => user,
            _ => {
                warn!("failed login for '{}'", req.username);
                return Err(MyError::AuthError);
            }
        };
        let access_token = jwt::create(&TokenType::Access, &user.id, &user.username, auth)?;
        let refresh_token = jwt::create(&TokenType::Refresh, &user.id, &user.username, auth)?;
        info!("user {} logged in", user.id);
        Ok(AuthUserResponse {
            access_token,
            refresh_token: Some(refresh_token),
            token_type: TOKEN_TYPE.to_string(),
        })
    }

    /// Issues a fresh access token for a still valid refresh token.
    pub fn refresh(refresh_token: &str, auth: &AuthConfig) -> Result<AuthUserResponse, MyError> {
        let claims = jwt::decode_claims(&TokenType::Refresh, refresh_token, auth)?;
        let access_token = jwt::create(&TokenType::Access, &claims.user_id, &claims.username, auth)?;
        Ok(AuthUserResponse {
            access_token,
            refresh_token: None,
            token_type: TOKEN_TYPE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test as actix_test, web, App, HttpResponse};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use crate::dto::Claims;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            access_token_ttl_secs: 60,
            refresh_token_ttl_secs: 600,
        }
    }

    async fn whoami(session: SessionContext) -> HttpResponse {
        HttpResponse::Ok().body(session.username)
    }

    #[test]
    fn access_token_round_trip() {
        let auth = auth_config();
        let user_id = Uuid::new_v4();
        let token = jwt::create(&jwt::TokenType::Access, &user_id, "alice", &auth).unwrap();
        let claims = jwt::decode_claims(&jwt::TokenType::Access, &token, &auth).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn tokens_are_not_interchangeable() {
        let auth = auth_config();
        let token = jwt::create(&jwt::TokenType::Refresh, &Uuid::new_v4(), "alice", &auth).unwrap();
        assert_eq!(
            jwt::decode_claims(&jwt::TokenType::Access, &token, &auth).unwrap_err(),
            MyError::AuthError
        );
    }

    #[test]
    fn expired_token_is_reported() {
        let auth = auth_config();
        let claims = Claims::new(&Uuid::new_v4(), "alice", Utc::now().timestamp() as usize - 3600);
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(auth.access_secret.as_bytes()),
        )
        .unwrap();
        assert_eq!(
            jwt::decode_claims(&jwt::TokenType::Access, &token, &auth).unwrap_err(),
            MyError::TokenExpirationError
        );
    }

    #[test]
    fn refresh_issues_access_token() {
        let auth = auth_config();
        let user_id = Uuid::new_v4();
        let refresh = jwt::create(&jwt::TokenType::Refresh, &user_id, "bob", &auth).unwrap();
        let response = session::refresh(&refresh, &auth).unwrap();
        let claims = jwt::decode_claims(&jwt::TokenType::Access, &response.access_token, &auth).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert!(response.refresh_token.is_none());
    }

    #[actix_web::test]
    async fn middleware_rejects_missing_token() {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/me")
                    .wrap(AuthMiddleware::new(auth_config()))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;
        let req = actix_test::TestRequest::get().uri("/me").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn middleware_rejects_garbage_token() {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/me")
                    .wrap(AuthMiddleware::new(auth_config()))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn middleware_passes_session_to_handler() {
        let auth = auth_config();
        let token = jwt::create(&jwt::TokenType::Access, &Uuid::new_v4(), "carol", &auth).unwrap();
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/me")
                    .wrap(AuthMiddleware::new(auth))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, "carol");
    }
}
