//! Token issuance and verification.
//!
//! A [`TokenService`] owns the signing key: it is configured explicitly at
//! process start (no ambient global) and is read-only afterwards, so it can
//! be shared freely across concurrent requests.

use crate::error::AuthError;
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Decoded token payload: a claim-name to value mapping.
///
/// Reconstructed on every decode and discarded after the handler call
/// completes; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims(pub serde_json::Map<String, Value>);

impl TokenClaims {
    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    /// The `sub` claim, whatever its JSON type.
    pub fn subject(&self) -> Option<&Value> {
        self.0.get("sub")
    }

    /// The `role` claim, when present and a string.
    pub fn role(&self) -> Option<&str> {
        self.0.get("role").and_then(Value::as_str)
    }
}

/// Configuration for a [`TokenService`].
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    ttl: Duration,
    issuer: Option<String>,
}

impl TokenConfig {
    /// Create a config with an HS256 signing secret and the default
    /// 30-minute token lifetime.
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            ttl: DEFAULT_TTL,
            issuer: None,
        }
    }

    /// Set the token lifetime (`exp` is issued as `iat` + ttl).
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the `iss` claim stamped into issued tokens and required on decode.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Load configuration from `SLUICE_SECRET`, `SLUICE_TOKEN_TTL_MINUTES`,
    /// and `SLUICE_TOKEN_ISSUER`.
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("SLUICE_SECRET")
            .map_err(|_| anyhow::anyhow!("SLUICE_SECRET is not set"))?;
        let mut config = Self::with_secret(secret.into_bytes());

        if let Ok(minutes) = std::env::var("SLUICE_TOKEN_TTL_MINUTES") {
            let minutes: u64 = minutes
                .parse()
                .map_err(|_| anyhow::anyhow!("SLUICE_TOKEN_TTL_MINUTES must be an integer"))?;
            let seconds = minutes
                .checked_mul(60)
                .ok_or_else(|| anyhow::anyhow!("SLUICE_TOKEN_TTL_MINUTES is out of range"))?;
            config.ttl = Duration::from_secs(seconds);
        }
        if let Ok(issuer) = std::env::var("SLUICE_TOKEN_ISSUER") {
            config.issuer = Some(issuer);
        }
        Ok(config)
    }
}

/// Issues and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    issuer: Option<String>,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            validation,
            ttl: config.ttl,
            issuer: config.issuer,
        }
    }

    /// Sign the given claims, injecting `iat` and `exp` (UTC epoch seconds).
    ///
    /// Caller-supplied `iat`/`exp` values are overwritten; the service is the
    /// authority on token lifetime.
    pub fn issue(&self, claims: serde_json::Map<String, Value>) -> Result<String, AuthError> {
        let mut claims = claims;
        let now = epoch_seconds();
        claims.insert("iat".into(), Value::from(now));
        claims.insert("exp".into(), Value::from(now + self.ttl.as_secs()));
        if let Some(issuer) = &self.issuer {
            claims
                .entry("iss".to_string())
                .or_insert_with(|| Value::from(issuer.clone()));
        }

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "token issuance failed");
            AuthError::Issuance
        })
    }

    /// Decode a token, verifying signature and expiry.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<serde_json::Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map(|data| TokenClaims(data.claims))
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidToken,
            })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Parse a token's payload segment without verifying the signature.
///
/// Splits off the middle segment, restores standard base64 padding, and
/// parses it as a JSON object. Any structural failure (wrong segment count,
/// bad base64, or a non-object payload) is reported as a malformed token.
///
/// For claim introspection only. Authorization decisions must go through the
/// verifying [`TokenService::decode`].
pub fn decode_unverified(token: &str) -> Result<TokenClaims, AuthError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(AuthError::MalformedToken),
    };

    let mut padded = payload.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }

    let bytes = URL_SAFE
        .decode(padded.as_bytes())
        .map_err(|_| AuthError::MalformedToken)?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(claims)) => Ok(TokenClaims(claims)),
        _ => Err(AuthError::MalformedToken),
    }
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
