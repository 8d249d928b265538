/*
 * Responsibility
 * - 認証済み主体 (Principal) の型
 * - リクエストごとに claims から作られ、リクエスト終了で破棄される (immutable)
 */
use std::collections::BTreeSet;

/// Authority prefix applied to every scope taken from a token.
pub const SCOPE_PREFIX: &str = "SCOPE_";

/// The authenticated identity of a request and the authorities it holds.
///
/// `scopes` already carry the [`SCOPE_PREFIX`], so a token with
/// `scope = "message:read"` yields the authority `SCOPE_message:read`.
/// Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
    scopes: BTreeSet<String>,
    authenticated: bool,
}

impl Principal {
    pub fn new(subject: impl Into<String>, scopes: BTreeSet<String>) -> Self {
        Self {
            subject: subject.into(),
            scopes,
            authenticated: true,
        }
    }

    #[cfg(test)]
    pub(crate) fn unauthenticated(subject: impl Into<String>, scopes: BTreeSet<String>) -> Self {
        Self {
            authenticated: false,
            ..Self::new(subject, scopes)
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn scopes(&self) -> &BTreeSet<String> {
        &self.scopes
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.scopes.contains(authority)
    }
}
