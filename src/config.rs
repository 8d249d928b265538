/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, 公開鍵 PEM, iss/aud, 認可ルールファイルなど)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::services::auth::{JwtAlgorithm, JwtSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub access_jwt_public_key_pem: String,
    pub access_jwt_algorithm: JwtAlgorithm,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    pub access_rules_path: Option<PathBuf>,

    pub request_body_limit_bytes: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, map in tests, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Empty values count as unset.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or(get("PORT"), 3000, "PORT")?;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(get("APP_ENV"));

        let access_jwt_public_key_pem = get("ACCESS_JWT_PUBLIC_KEY_PEM")
            .ok_or(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let access_jwt_algorithm = match get("ACCESS_JWT_ALGORITHM") {
            Some(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("ACCESS_JWT_ALGORITHM"))?,
            None => JwtAlgorithm::default(),
        };

        let access_token_leeway_seconds =
            parse_or(get("ACCESS_TOKEN_LEEWAY_SECONDS"), 60, "ACCESS_TOKEN_LEEWAY_SECONDS")?;

        let request_body_limit_bytes =
            parse_or(get("REQUEST_BODY_LIMIT_BYTES"), 1024 * 1024, "REQUEST_BODY_LIMIT_BYTES")?;

        let request_timeout_seconds: u64 =
            parse_or(get("REQUEST_TIMEOUT_SECONDS"), 30, "REQUEST_TIMEOUT_SECONDS")?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            access_jwt_public_key_pem,
            access_jwt_algorithm,
            auth_issuer: get("AUTH_ISSUER"),
            auth_audience: get("AUTH_AUDIENCE"),
            access_token_leeway_seconds,
            access_rules_path: get("ACCESS_RULES_PATH").map(PathBuf::from),
            request_body_limit_bytes,
            request_timeout: Duration::from_secs(request_timeout_seconds),
        })
    }

    pub fn jwt_settings(&self) -> JwtSettings {
        JwtSettings {
            algorithm: self.access_jwt_algorithm,
            issuer: self.auth_issuer.clone(),
            audience: self.auth_audience.clone(),
            leeway_seconds: self.access_token_leeway_seconds,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    default: T,
    key: &'static str,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
