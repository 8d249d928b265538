/*
 * Responsibility
 * - URL 構造を定義 (/, /message, /health)
 * - どの path にどの scope が必要かは security::AccessPolicy 側で決める
 */
use axum::{Router, routing::get};

use crate::error::AppError;
use crate::state::AppState;

use crate::api::handlers::{
    health::health,
    index::index,
    message::{create_message, read_message},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/message", get(read_message).post(create_message))
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound
}
