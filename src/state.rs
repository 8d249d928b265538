/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: Bearer token 検証, policy: 起動時に読み込んだ認可ルール
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::{fmt, sync::Arc};

use crate::security::AccessPolicy;
use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub policy: Arc<AccessPolicy>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, policy: Arc<AccessPolicy>) -> Self {
        Self { verifier, policy }
    }
}
