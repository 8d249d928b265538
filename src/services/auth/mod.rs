/*
 * Responsibility
 * - Bearer token 検証 (署名・exp/nbf・iss/aud)
 * - 検証済み claims を返すだけ。認可は security 側
 */
pub mod access_jwt;

pub use access_jwt::{JwtAlgorithm, JwtSettings, JwtVerifier, TokenError, TokenVerifier};
