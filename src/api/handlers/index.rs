use crate::api::extractors::AuthenticatedPrincipal;

/// GET / : greets the token's subject.
pub async fn index(AuthenticatedPrincipal(principal): AuthenticatedPrincipal) -> String {
    format!("Hello, {}!", principal.subject())
}
