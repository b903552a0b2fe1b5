use actix_web::{
    error,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::{Display, Error};
use log::error;
use serde_json::json;

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";
const PG_NUMERIC_OUT_OF_RANGE: &str = "22003";

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum MyError {
    #[display(fmt = "internal error")]
    InternalError,

    #[display(fmt = "validation error: {}", _0)]
    ValidationError(#[error(not(source))] String),

    #[display(fmt = "permission denied: {}", _0)]
    PermissionDenied(#[error(not(source))] String),

    #[display(fmt = "not found: {}", _0)]
    NotFound(#[error(not(source))] String),

    #[display(fmt = "authentication error")]
    AuthError,

    #[display(fmt = "token expired")]
    TokenExpirationError,
}

impl MyError {
    pub fn validation(reason: impl Into<String>) -> Self {
        MyError::ValidationError(reason.into())
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        MyError::PermissionDenied(reason.into())
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        MyError::NotFound(reason.into())
    }

    /// short machine readable kind, used as the `error` field of the response body
    pub fn kind(&self) -> &'static str {
        match self {
            MyError::InternalError => "internal_error",
            MyError::ValidationError(_) => "validation_error",
            MyError::PermissionDenied(_) => "permission_denied",
            MyError::NotFound(_) => "not_found",
            MyError::AuthError => "authentication_error",
            MyError::TokenExpirationError => "token_expired",
        }
    }

    pub fn reason(&self) -> String {
        match self {
            MyError::ValidationError(reason)
            | MyError::PermissionDenied(reason)
            | MyError::NotFound(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}

impl error::ResponseError for MyError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(json!({ "error": self.kind(), "reason": self.reason() }).to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            MyError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            MyError::ValidationError(_) => StatusCode::BAD_REQUEST,
            MyError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            MyError::NotFound(_) => StatusCode::NOT_FOUND,
            MyError::AuthError => StatusCode::UNAUTHORIZED,
            MyError::TokenExpirationError => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Postgres SQLSTATE codes caused by client input rather than a server fault.
fn from_pg_code(code: Option<&str>) -> Option<MyError> {
    match code? {
        PG_UNIQUE_VIOLATION => Some(MyError::validation("record already exists")),
        PG_FOREIGN_KEY_VIOLATION => Some(MyError::not_found("referenced record not found")),
        PG_NUMERIC_OUT_OF_RANGE => Some(MyError::validation("numeric value out of range")),
        _ => None,
    }
}

impl From<sqlx::Error> for MyError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => MyError::not_found("record not found"),
            sqlx::Error::Database(db_err) => match from_pg_code(db_err.code().as_deref()) {
                Some(mapped) => mapped,
                None => {
                    error!("database error: {:?}", err);
                    MyError::InternalError
                }
            },
            _ => {
                error!("database error: {:?}", err);
                MyError::InternalError
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for MyError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => MyError::TokenExpirationError,
            _ => MyError::AuthError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, ResponseError};

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(MyError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(MyError::denied("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(MyError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(MyError::AuthError.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(MyError::InternalError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        let err: MyError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn client_caused_database_codes_are_not_internal() {
        assert_eq!(
            from_pg_code(Some("22003")),
            Some(MyError::validation("numeric value out of range"))
        );
        assert_eq!(from_pg_code(Some("23505")), Some(MyError::validation("record already exists")));
        assert!(matches!(from_pg_code(Some("23503")), Some(MyError::NotFound(_))));
        assert_eq!(from_pg_code(Some("40001")), None);
        assert_eq!(from_pg_code(None), None);
    }

    #[actix_web::test]
    async fn response_body_carries_structured_reason() {
        let response = MyError::denied("not a friend").error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "permission_denied");
        assert_eq!(value["reason"], "not a friend");
    }
}
