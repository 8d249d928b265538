/*
 * Responsibility
 * - 認可コア: claims → Principal 変換と、(method, path, principal) → Decision
 * - HTTP / axum には依存しない (middleware 側から呼ばれる)
 */
pub mod claims;
pub mod policy;
pub mod principal;
pub mod rule;

pub use claims::{ClaimSet, MalformedTokenError, extract};
pub use policy::{AccessPolicy, Decision};
pub use principal::Principal;
pub use rule::{Access, PathPattern, Rule, RuleMethod, RulesError};
