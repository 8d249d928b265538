/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body / WWW-Authenticate)
 * - 認可の Decision (DENY_*) はここで 401 / 403 に変換される
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

// RFC 6750 §3 challenges, same wording as Spring Security's bearer entry point.
const BEARER_CHALLENGE: &str = "Bearer";
const INVALID_TOKEN_CHALLENGE: &str = "Bearer error=\"invalid_token\", \
    error_description=\"The access token is invalid\", \
    error_uri=\"https://tools.ietf.org/html/rfc6750#section-3.1\"";
const INSUFFICIENT_SCOPE_CHALLENGE: &str = "Bearer error=\"insufficient_scope\", \
    error_description=\"The request requires higher privileges than provided by the access token.\", \
    error_uri=\"https://tools.ietf.org/html/rfc6750#section-3.1\"";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    /// No (usable) bearer token on a route that needs one.
    #[error("unauthorized")]
    Unauthorized,
    /// A bearer token was sent but failed verification or is malformed.
    #[error("invalid access token")]
    InvalidToken,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
}

impl AppError {
    fn challenge(&self) -> Option<&'static str> {
        match self {
            AppError::Unauthorized => Some(BEARER_CHALLENGE),
            AppError::InvalidToken => Some(INVALID_TOKEN_CHALLENGE),
            AppError::Forbidden => Some(INSUFFICIENT_SCOPE_CHALLENGE),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Unauthorized | AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(challenge) = self.challenge() {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(challenge),
            );
        }
        response
    }
}
