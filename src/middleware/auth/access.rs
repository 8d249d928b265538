//! Bearer token 検証 → 認可 (Decision) → Principal を extensions に入れる
//!
//! Flow per request:
//! - `Authorization: Bearer <token>` を取り出す (なければ principal なし)
//! - `TokenVerifier` で検証。失敗した場合も principal なしで認可へ進む
//! - claims → `Principal` (sub が無ければ即 401 invalid_token)
//! - `AccessPolicy::decide` の結果で handler へ進む / 401 / 403

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::security::{self, Decision};
use crate::state::AppState;

/// Put authorization in front of every route of `router`, including the
/// fallback, so unknown paths are still checked before they 404.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let mut token_rejected = false;

    let principal = match bearer_token(req.headers()) {
        None => None,
        Some(token) => match state.verifier.verify(token) {
            Ok(claims) => match security::extract(&claims) {
                Ok(principal) => Some(principal),
                Err(err) => {
                    tracing::warn!(error = %err, "malformed access token");
                    return Err(AppError::InvalidToken);
                }
            },
            Err(err) => {
                tracing::warn!(error = ?err, "access token verification failed");
                token_rejected = true;
                None
            }
        },
    };

    let method = req.method().as_str();
    let path = req.uri().path();
    let decision = state.policy.decide(method, path, principal.as_ref());

    tracing::debug!(
        method,
        path,
        ?decision,
        subject = principal.as_ref().map(|p| p.subject()),
        "authorization decision"
    );

    match decision {
        Decision::Allow => {
            // middleware → extractor への受け渡し
            if let Some(principal) = principal {
                req.extensions_mut().insert(principal);
            }
            Ok(next.run(req).await)
        }
        Decision::DenyForbidden => Err(AppError::Forbidden),
        Decision::DenyUnauthenticated if token_rejected => Err(AppError::InvalidToken),
        Decision::DenyUnauthenticated => Err(AppError::Unauthorized),
    }
}

/// Token of an `Authorization: Bearer <token>` header. The scheme is
/// case-insensitive; other schemes yield `None`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    scheme
        .eq_ignore_ascii_case("Bearer")
        .then_some(token.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(authorization: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(authorization).unwrap(),
        );
        headers
    }

    #[test]
    fn test_bearer_token_is_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer  abc ")), Some("abc"));
    }

    #[test]
    fn test_other_schemes_are_ignored() {
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
