//! Verified claim set → [`Principal`].
//!
//! This module never checks signatures. It only runs on claims that the
//! [`TokenVerifier`](crate::services::auth::TokenVerifier) already accepted.

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

use super::principal::{Principal, SCOPE_PREFIX};

/// Claims of a token that passed cryptographic verification.
pub type ClaimSet = serde_json::Map<String, Value>;

/// Scope claim names, checked in order. The first one present wins.
const SCOPE_CLAIMS: [&str; 2] = ["scope", "scp"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTokenError {
    #[error("missing or empty 'sub' claim")]
    MissingSubject,
}

/// Build the request principal from a verified claim set.
///
/// - `sub` must be a non-blank string. It is kept exactly as issued.
/// - `scope` (or `scp`) may be a space-delimited string or an array of strings.
///   Absent or empty yields no authorities.
pub fn extract(claims: &ClaimSet) -> Result<Principal, MalformedTokenError> {
    let subject = claims
        .get("sub")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or(MalformedTokenError::MissingSubject)?;

    Ok(Principal::new(subject, authorities(claims)))
}

fn authorities(claims: &ClaimSet) -> BTreeSet<String> {
    let Some(value) = SCOPE_CLAIMS.iter().find_map(|name| claims.get(*name)) else {
        return BTreeSet::new();
    };

    let scopes: Vec<&str> = match value {
        Value::String(s) => s.split_whitespace().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(str::split_whitespace)
            .collect(),
        _ => Vec::new(),
    };

    scopes
        .into_iter()
        .map(|scope| format!("{SCOPE_PREFIX}{scope}"))
        .collect()
}
