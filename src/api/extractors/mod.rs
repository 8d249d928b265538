/*!
 * Request extractors
 *
 * Public API:
 * - AuthenticatedPrincipal
 */
mod principal;

pub use principal::AuthenticatedPrincipal;
