use std::{fmt, str::FromStr};

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::security::ClaimSet;

// Errors returned by access-token verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("invalid verification key: {0}")]
    InvalidKey(String),
}

/// Pluggable bearer-token verification (`verify(token) -> claims | error`).
///
/// Implementations check the signature and time-based claims. They do not
/// interpret `sub`/`scope`; that is [`crate::security::extract`]'s job.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<ClaimSet, TokenError>;
}

/// Signature algorithms accepted for the static public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JwtAlgorithm {
    #[default]
    EdDsa,
    Rs256,
    Es256,
}

impl FromStr for JwtAlgorithm {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EDDSA" => Ok(Self::EdDsa),
            "RS256" => Ok(Self::Rs256),
            "ES256" => Ok(Self::Es256),
            _ => Err(()),
        }
    }
}

impl From<JwtAlgorithm> for Algorithm {
    fn from(value: JwtAlgorithm) -> Self {
        match value {
            JwtAlgorithm::EdDsa => Algorithm::EdDSA,
            JwtAlgorithm::Rs256 => Algorithm::RS256,
            JwtAlgorithm::Es256 => Algorithm::ES256,
        }
    }
}

/// Verification settings for [`JwtVerifier::new`].
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub algorithm: JwtAlgorithm,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// Static-public-key JWT verifier.
///
/// - Key material is intentionally not printable via Debug.
/// - `iss` / `aud` are only checked when configured.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(public_key_pem: &str, settings: &JwtSettings) -> Result<Self, TokenError> {
        let pem = public_key_pem.as_bytes();
        let decoding_key = match settings.algorithm {
            JwtAlgorithm::EdDsa => DecodingKey::from_ed_pem(pem),
            JwtAlgorithm::Rs256 => DecodingKey::from_rsa_pem(pem),
            JwtAlgorithm::Es256 => DecodingKey::from_ec_pem(pem),
        }
        .map_err(|e| TokenError::InvalidKey(e.to_string()))?;

        let mut validation = Validation::new(settings.algorithm.into());
        validation.leeway = settings.leeway_seconds;
        validation.validate_nbf = true;

        // jsonwebtoken only compares iss/aud when present, so a configured
        // one must also be a required claim.
        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
            validation.required_spec_claims.insert("iss".to_string());
        }
        match &settings.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.required_spec_claims.insert("aud".to_string());
            }
            // Without this, any token carrying `aud` would be rejected.
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<ClaimSet, TokenError> {
        let data = jsonwebtoken::decode::<ClaimSet>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}
