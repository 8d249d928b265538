/*
 * Responsibility
 * - HTTP 公開面 (routes() の re-export など)
 * - 認可は middleware::auth で済んでいる前提。handler は結果を返すだけ
 */
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
