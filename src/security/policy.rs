//! Ordered, first-match-wins authorization over [`Rule`]s.
//!
//! The policy is built once at startup and shared read-only (`Arc<AccessPolicy>`)
//! across every request task. `decide` is pure: the same inputs always give
//! the same [`Decision`].

use std::path::Path;

use super::principal::Principal;
use super::rule::{self, Access, Rule, RuleMethod, RulesError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    DenyForbidden,
    DenyUnauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    rules: Vec<Rule>,
}

impl AccessPolicy {
    /// Rules are evaluated in exactly the given order.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// JSON array of rules, e.g.
    /// `[{"method":"GET","path":"/message/**","access":{"authority":"SCOPE_message:read"}}]`.
    pub fn from_json_str(json: &str) -> Result<Self, RulesError> {
        let rules: Vec<Rule> = serde_json::from_str(json)?;
        Ok(Self::new(rules))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Authorize `method path` for `principal`.
    ///
    /// - No matching rule, or a malformed method/path: `DenyUnauthenticated`.
    /// - `principal == None` means no token, or verification failed upstream.
    pub fn decide(&self, method: &str, path: &str, principal: Option<&Principal>) -> Decision {
        if !rule::is_well_formed_method(method) || !rule::is_well_formed_path(path) {
            return Decision::DenyUnauthenticated;
        }

        let Some(rule) = self.rules.iter().find(|r| r.matches(method, path)) else {
            return Decision::DenyUnauthenticated;
        };

        let principal = match (&rule.access, principal) {
            (Access::PermitAll, _) => return Decision::Allow,
            (_, Some(p)) if p.is_authenticated() => p,
            _ => return Decision::DenyUnauthenticated,
        };

        match &rule.access {
            Access::Authority(authority) if !principal.has_authority(authority) => {
                Decision::DenyForbidden
            }
            _ => Decision::Allow,
        }
    }
}

impl Default for AccessPolicy {
    /// `/health` is public; `/message/**` needs `message:read` (GET) or
    /// `message:write` (POST); everything else needs any valid token.
    fn default() -> Self {
        Self::new(vec![
            Rule {
                method: RuleMethod::Any,
                path: rule::PathPattern::Exact("/health".to_string()),
                access: Access::PermitAll,
            },
            Rule {
                method: RuleMethod::Get,
                path: rule::PathPattern::Prefix("/message".to_string()),
                access: Access::scope("message:read"),
            },
            Rule {
                method: RuleMethod::Post,
                path: rule::PathPattern::Prefix("/message".to_string()),
                access: Access::scope("message:write"),
            },
            Rule {
                method: RuleMethod::Any,
                path: rule::PathPattern::Prefix(String::new()),
                access: Access::Authenticated,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn principal(scopes: &[&str]) -> Principal {
        Principal::new(
            "ch4mpy",
            scopes.iter().map(|s| format!("SCOPE_{s}")).collect(),
        )
    }

    fn rule(method: RuleMethod, pattern: &str, access: Access) -> Rule {
        Rule::new(method, pattern, access).unwrap()
    }

    #[test]
    fn test_read_scope_allows_get_message() {
        let policy = AccessPolicy::default();
        let reader = principal(&["message:read"]);

        assert_eq!(policy.decide("GET", "/message", Some(&reader)), Decision::Allow);
        assert_eq!(policy.decide("GET", "/message/1", Some(&reader)), Decision::Allow);
    }

    #[test]
    fn test_get_message_without_read_scope() {
        let policy = AccessPolicy::default();
        let nobody = principal(&[]);
        let writer = principal(&["message:write"]);

        assert_eq!(
            policy.decide("GET", "/message", Some(&nobody)),
            Decision::DenyForbidden
        );
        assert_eq!(
            policy.decide("GET", "/message", Some(&writer)),
            Decision::DenyForbidden
        );
        assert_eq!(
            policy.decide("GET", "/message", None),
            Decision::DenyUnauthenticated
        );
    }

    #[test]
    fn test_post_message_requires_write_scope() {
        let policy = AccessPolicy::default();

        assert_eq!(
            policy.decide("POST", "/message", Some(&principal(&["message:read"]))),
            Decision::DenyForbidden
        );
        assert_eq!(
            policy.decide("POST", "/message", Some(&principal(&["message:write"]))),
            Decision::Allow
        );
        assert_eq!(
            policy.decide("POST", "/message", None),
            Decision::DenyUnauthenticated
        );
    }

    #[test]
    fn test_catch_all_requires_authentication_only() {
        let policy = AccessPolicy::default();

        assert_eq!(policy.decide("GET", "/", Some(&principal(&[]))), Decision::Allow);
        assert_eq!(policy.decide("DELETE", "/message", Some(&principal(&[]))), Decision::Allow);
        assert_eq!(policy.decide("GET", "/", None), Decision::DenyUnauthenticated);
    }

    #[test]
    fn test_permit_all_ignores_principal() {
        let policy = AccessPolicy::default();

        assert_eq!(policy.decide("GET", "/health", None), Decision::Allow);
        assert_eq!(policy.decide("GET", "/health", Some(&principal(&[]))), Decision::Allow);
    }

    #[test]
    fn test_unauthenticated_principal_is_treated_as_absent() {
        let policy = AccessPolicy::default();
        let anonymous = Principal::unauthenticated(
            "ch4mpy",
            BTreeSet::from(["SCOPE_message:read".to_string()]),
        );

        assert_eq!(
            policy.decide("GET", "/message", Some(&anonymous)),
            Decision::DenyUnauthenticated
        );
        assert_eq!(
            policy.decide("GET", "/", Some(&anonymous)),
            Decision::DenyUnauthenticated
        );
    }

    #[test]
    fn test_no_matching_rule_is_unauthenticated() {
        let policy = AccessPolicy::new(vec![rule(
            RuleMethod::Get,
            "/message/**",
            Access::scope("message:read"),
        )]);
        let reader = principal(&["message:read"]);

        assert_eq!(
            policy.decide("POST", "/message", Some(&reader)),
            Decision::DenyUnauthenticated
        );
        assert_eq!(
            policy.decide("GET", "/other", Some(&reader)),
            Decision::DenyUnauthenticated
        );
        assert_eq!(
            AccessPolicy::new(Vec::new()).decide("GET", "/", Some(&reader)),
            Decision::DenyUnauthenticated
        );
    }

    #[test]
    fn test_first_match_wins_without_reordering() {
        // The catch-all comes first, so it shadows the scope rule behind it.
        let policy = AccessPolicy::new(vec![
            rule(RuleMethod::Any, "/**", Access::Authenticated),
            rule(RuleMethod::Get, "/message/**", Access::scope("message:read")),
        ]);

        assert_eq!(
            policy.decide("GET", "/message", Some(&principal(&[]))),
            Decision::Allow
        );
    }

    #[test]
    fn test_malformed_request_falls_to_default() {
        let policy = AccessPolicy::new(vec![rule(RuleMethod::Any, "/**", Access::PermitAll)]);

        assert_eq!(policy.decide("", "/", None), Decision::DenyUnauthenticated);
        assert_eq!(policy.decide("G ET", "/", None), Decision::DenyUnauthenticated);
        assert_eq!(policy.decide("GET", "", None), Decision::DenyUnauthenticated);
        assert_eq!(policy.decide("GET", "no-slash", None), Decision::DenyUnauthenticated);
        assert_eq!(policy.decide("GET", "/a b", None), Decision::DenyUnauthenticated);
    }

    #[test]
    fn test_unlisted_methods_match_only_any_rules() {
        let policy = AccessPolicy::default();
        let reader = principal(&["message:read"]);

        // PATCH skips the GET/POST rules and lands on the authenticated catch-all.
        assert_eq!(policy.decide("PATCH", "/message", Some(&reader)), Decision::Allow);
        assert_eq!(
            policy.decide("PATCH", "/message", None),
            Decision::DenyUnauthenticated
        );
    }

    #[test]
    fn test_decide_is_idempotent() {
        let policy = AccessPolicy::default();
        let reader = principal(&["message:read"]);

        let first = policy.decide("POST", "/message/1", Some(&reader));
        let second = policy.decide("POST", "/message/1", Some(&reader));
        assert_eq!(first, second);
        assert_eq!(policy, AccessPolicy::default());
    }

    #[test]
    fn test_default_matches_json_form() {
        let json = r#"[
            {"method": "ANY", "path": "/health", "access": "permit_all"},
            {"method": "GET", "path": "/message/**", "access": {"authority": "SCOPE_message:read"}},
            {"method": "POST", "path": "/message/**", "access": {"authority": "SCOPE_message:write"}},
            {"method": "ANY", "path": "/**", "access": "authenticated"}
        ]"#;

        assert_eq!(AccessPolicy::from_json_str(json).unwrap(), AccessPolicy::default());
    }

    #[test]
    fn test_from_json_rejects_bad_rules() {
        assert!(matches!(
            AccessPolicy::from_json_str(r#"[{"method":"GET","path":"/a/**/b","access":"authenticated"}]"#),
            Err(RulesError::Json(_))
        ));
        assert!(matches!(
            AccessPolicy::from_json_str(r#"[{"method":"TRACE","path":"/","access":"authenticated"}]"#),
            Err(RulesError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_file_missing_is_io_error() {
        let result = AccessPolicy::from_json_file("/nonexistent/rules.json");
        assert!(matches!(result, Err(RulesError::Io(_))));
    }

    #[test]
    fn test_principal_scopes_are_compared_as_authorities() {
        let policy = AccessPolicy::default();
        // A bare scope without the SCOPE_ prefix is not the authority the rule asks for.
        let raw = Principal::new("user", BTreeSet::from(["message:read".to_string()]));

        assert_eq!(
            policy.decide("GET", "/message", Some(&raw)),
            Decision::DenyForbidden
        );
    }
}
