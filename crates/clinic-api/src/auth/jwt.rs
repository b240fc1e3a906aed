// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token issuance and verification.
//!
//! Verification is a pure function of the token, the current time and the
//! signing secret. Expiry is checked here rather than by `jsonwebtoken` so
//! that the boundary is exact: a token whose `exp` equals now is expired.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use clinic_core::{Identity, Role, UserId};

use super::Claims;
use crate::error::{ApiError, ApiResult, AuthError};

/// Default token lifetime: 24 hours.
pub const DEFAULT_EXPIRATION_SECS: i64 = 24 * 60 * 60;

// =============================================================================
// JwtConfig
// =============================================================================

/// JWT configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Token lifetime in seconds.
    pub expiration_secs: i64,
    /// Signing algorithm. Only HMAC algorithms are accepted.
    #[serde(with = "algorithm_serde")]
    pub algorithm: Algorithm,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by user
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            algorithm: Algorithm::HS256,
        }
    }
}

impl JwtConfig {
    /// Creates a new configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        if self.secret.is_empty() {
            return Err(ApiError::internal("JWT secret is not configured"));
        }
        if self.expiration_secs <= 0 {
            return Err(ApiError::internal("JWT expiration must be positive"));
        }
        if self.secret.len() < 32 {
            tracing::warn!("JWT secret is shorter than recommended (32 bytes)");
        }
        Ok(())
    }
}

// =============================================================================
// JwtManager
// =============================================================================

/// Issues and verifies bearer tokens.
///
/// Built once at startup from [`JwtConfig`] and shared by every request.
/// Rotating the secret invalidates every outstanding token.
#[derive(Clone)]
pub struct JwtManager {
    config: Arc<JwtConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl JwtManager {
    /// Creates a new JWT manager with the given configuration.
    pub fn new(config: JwtConfig) -> ApiResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Signature and structure only; claims are checked by hand.
        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Signs arbitrary claims.
    pub fn create_token(&self, claims: &Claims) -> ApiResult<String> {
        let header = Header::new(self.config.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to create token: {}", e)))
    }

    /// Issues a token for `identity`, valid for the configured lifetime.
    pub fn issue(&self, identity: &Identity) -> ApiResult<String> {
        self.issue_at(identity, Utc::now().timestamp())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, identity: &Identity, now: i64) -> ApiResult<String> {
        self.create_token(&Claims::new(identity, now, self.config.expiration_secs))
    }

    /// Verifies a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verifies a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, AuthError> {
        let data = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })?;
        let claims = data.claims;

        let exp = claims
            .get("exp")
            .and_then(number_as_i64)
            .ok_or(AuthError::MalformedClaims)?;
        if exp <= now {
            return Err(AuthError::TokenExpired);
        }

        let id = claims
            .get("id")
            .and_then(number_as_u64)
            .ok_or(AuthError::MalformedClaims)?;
        let role = claims
            .get("role")
            .and_then(Value::as_str)
            .and_then(Role::parse)
            .ok_or(AuthError::MalformedClaims)?;

        Ok(Identity::new(UserId::new(id), role))
    }

    /// Returns the token expiration time in seconds.
    pub fn expiration_secs(&self) -> i64 {
        self.config.expiration_secs
    }
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("algorithm", &self.config.algorithm)
            .field("expiration_secs", &self.config.expiration_secs)
            .finish()
    }
}

// Numeric claims may arrive as floats from other issuers.
fn number_as_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

fn number_as_u64(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

// =============================================================================
// Algorithm Serialization
// =============================================================================

mod algorithm_serde {
    use jsonwebtoken::Algorithm;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(algorithm: &Algorithm, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match algorithm {
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            _ => "HS256",
        };
        s.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Algorithm, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            _ => Err(serde::de::Error::custom(format!(
                "Unsupported algorithm: {} (expected HS256, HS384 or HS512)",
                s
            ))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough-for-testing";
    const NOW: i64 = 1_700_000_000;

    fn manager() -> JwtManager {
        JwtManager::new(JwtConfig::new(SECRET)).unwrap()
    }

    fn sign(claims: Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let manager = manager();
        let identity = Identity::new(7u64, Role::Doctor);

        let token = manager.issue_at(&identity, NOW).unwrap();
        assert_eq!(manager.verify_at(&token, NOW + 1), Ok(identity));
    }

    #[test]
    fn test_verify_is_deterministic() {
        let manager = manager();
        let token = manager
            .issue_at(&Identity::new(3u64, Role::Receptionist), NOW)
            .unwrap();

        let first = manager.verify_at(&token, NOW + 10);
        let second = manager.verify_at(&token, NOW + 10);
        assert_eq!(first, second);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let manager = manager();
        let token = manager
            .issue_at(&Identity::new(1u64, Role::Admin), NOW)
            .unwrap();
        let exp = NOW + DEFAULT_EXPIRATION_SECS;

        assert!(manager.verify_at(&token, exp - 1).is_ok());
        assert_eq!(manager.verify_at(&token, exp), Err(AuthError::TokenExpired));
        assert_eq!(
            manager.verify_at(&token, exp + 1),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn test_invalid_token() {
        let manager = manager();
        assert_eq!(
            manager.verify_at("invalid.token.here", NOW),
            Err(AuthError::InvalidToken)
        );
        assert_eq!(manager.verify_at("", NOW), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_wrong_secret() {
        let other = JwtManager::new(JwtConfig::new("secret-two-for-testing-purposes-only")).unwrap();
        let token = other
            .issue_at(&Identity::new(1u64, Role::Admin), NOW)
            .unwrap();

        assert_eq!(manager().verify_at(&token, NOW), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_malformed_claims() {
        let manager = manager();
        let exp = NOW + 60;

        let unknown_role = sign(serde_json::json!({ "id": 1, "role": "nurse", "exp": exp }));
        let missing_id = sign(serde_json::json!({ "role": "admin", "exp": exp }));
        let missing_exp = sign(serde_json::json!({ "id": 1, "role": "admin" }));

        for token in [unknown_role, missing_id, missing_exp] {
            assert_eq!(
                manager.verify_at(&token, NOW),
                Err(AuthError::MalformedClaims)
            );
        }
    }

    #[test]
    fn test_float_claims_accepted() {
        let token = sign(serde_json::json!({ "id": 5.0, "role": "admin", "exp": (NOW + 60) as f64 }));
        let identity = manager().verify_at(&token, NOW).unwrap();
        assert_eq!(identity, Identity::new(5u64, Role::Admin));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(JwtManager::new(JwtConfig::default()).is_err());
    }
}
