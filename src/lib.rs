//! OAuth2 bearer-token resource server.
//!
//! - [`security`]: claims → [`security::Principal`], and the ordered rule
//!   engine that turns `(method, path, principal)` into a [`security::Decision`].
//! - [`services::auth`]: pluggable token verification ([`services::auth::TokenVerifier`]).
//! - [`middleware`] / [`api`]: the axum host around both.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod security;
pub mod services;
pub mod state;
