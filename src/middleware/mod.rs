/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: Bearer 検証 + 認可, http: request-id / trace / limit / timeout, security_headers
 */
pub mod auth;
pub mod http;
pub mod security_headers;
