//! Authorization rules: `(method, path pattern) → access`.
//!
//! Rules are plain values. They are loaded once at startup and read-only after
//! that, see [`AccessPolicy`](super::policy::AccessPolicy).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::principal::SCOPE_PREFIX;

const WILDCARD_SUFFIX: &str = "/**";

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rules: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleMethod {
    Get,
    Post,
    Put,
    Delete,
    Any,
}

impl RuleMethod {
    /// `method` must already be a well-formed HTTP token.
    fn matches(self, method: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Get => method == "GET",
            Self::Post => method == "POST",
            Self::Put => method == "PUT",
            Self::Delete => method == "DELETE",
        }
    }
}

/// Exact path, or a prefix when the pattern ends with `/**`.
///
/// `/message/**` matches `/message`, `/message/1` and `/message/1/edit`,
/// but not `/messages`. `/**` matches every path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PathPattern {
    Exact(String),
    Prefix(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, RulesError> {
        let invalid = |reason| RulesError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if !pattern.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }
        if pattern.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid("must not contain whitespace or control characters"));
        }

        let (base, wildcard) = match pattern.strip_suffix(WILDCARD_SUFFIX) {
            Some(base) => (base, true),
            None => (pattern, false),
        };
        if base.contains('*') {
            return Err(invalid("'**' is only allowed as the last segment"));
        }

        Ok(if wildcard {
            Self::Prefix(base.to_string())
        } else {
            Self::Exact(base.to_string())
        })
    }

    /// `path` must already be well-formed (see [`is_well_formed_path`]).
    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(base) => match path.strip_prefix(base.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(path) => f.write_str(path),
            Self::Prefix(base) => write!(f, "{base}{WILDCARD_SUFFIX}"),
        }
    }
}

impl TryFrom<String> for PathPattern {
    type Error = RulesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PathPattern> for String {
    fn from(value: PathPattern) -> Self {
        value.to_string()
    }
}

/// What the first matching rule requires from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    PermitAll,
    Authenticated,
    /// Full authority string, e.g. `SCOPE_message:read`.
    Authority(String),
}

impl Access {
    /// `Access::scope("message:read")` requires `SCOPE_message:read`.
    pub fn scope(scope: &str) -> Self {
        Self::Authority(format!("{SCOPE_PREFIX}{scope}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub method: RuleMethod,
    pub path: PathPattern,
    pub access: Access,
}

impl Rule {
    pub fn new(method: RuleMethod, pattern: &str, access: Access) -> Result<Self, RulesError> {
        Ok(Self {
            method,
            path: PathPattern::parse(pattern)?,
            access,
        })
    }

    /// Both inputs must be well-formed; callers filter malformed ones first.
    pub(crate) fn matches(&self, method: &str, path: &str) -> bool {
        self.method.matches(method) && self.path.matches(path)
    }
}

/// RFC 9110 `token`: one or more tchars.
pub(crate) fn is_well_formed_method(method: &str) -> bool {
    !method.is_empty()
        && method
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

pub(crate) fn is_well_formed_path(path: &str) -> bool {
    path.starts_with('/') && !path.chars().any(|c| c.is_whitespace() || c.is_control())
}
