/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (verifier, policy) → Router 組み立て
 * - Middleware の適用 (auth → security headers → http)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::security::AccessPolicy;
use crate::services::auth::JwtVerifier;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,resource_server=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // In development, fail fast. In production, keep the default behavior
        // (stderr) and let the server keep running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting resource server in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build process-level services once; they are read-only afterwards.
pub fn build_state(config: &Config) -> Result<AppState> {
    let verifier = JwtVerifier::new(&config.access_jwt_public_key_pem, &config.jwt_settings())
        .context("failed to build access token verifier")?;

    let policy = match &config.access_rules_path {
        Some(path) => AccessPolicy::from_json_file(path)
            .with_context(|| format!("failed to load access rules from {}", path.display()))?,
        None => AccessPolicy::default(),
    };
    tracing::info!(rules = policy.rules().len(), "access policy loaded");

    Ok(AppState::new(Arc::new(verifier), Arc::new(policy)))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = middleware::auth::access::apply(api::routes(), state.clone()).with_state(state);
    let router = middleware::security_headers::apply(router);
    middleware::http::apply(router, config)
}
