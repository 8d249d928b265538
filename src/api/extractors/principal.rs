use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::security::Principal;

/// Handler で、認可済みの Principal を受け取るための extractor
/// middleware が Principal を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（permit_all のルート・ミドルウェア未設定）
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthenticatedPrincipal)
            .ok_or(AppError::Unauthorized)
    }
}
