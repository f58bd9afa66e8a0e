use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Subject and role baked into developer tokens by the minting utility.
pub const DEFAULT_SUBJECT: &str = "some-fixed-user";
pub const DEFAULT_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl Claims {
    /// Claims without expiry, matching the long-lived developer tokens.
    pub fn new(sub: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            role: role.into(),
            exp: None,
            iat: None,
        }
    }

    /// Stamp `iat` now and `exp` after `lifetime`. Fails if the lifetime is not
    /// positive or the expiry falls outside the representable date range.
    pub fn expiring_in(mut self, lifetime: Duration) -> Result<Self, JwtError> {
        if lifetime <= Duration::zero() {
            return Err(JwtError::InvalidLifetime);
        }
        let now = Utc::now();
        let exp = now
            .checked_add_signed(lifetime)
            .ok_or(JwtError::InvalidLifetime)?;
        self.iat = Some(now.timestamp());
        self.exp = Some(exp.timestamp());
        Ok(self)
    }
}

impl Default for Claims {
    fn default() -> Self {
        Self::new(DEFAULT_SUBJECT, DEFAULT_ROLE)
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret is empty")]
    InvalidSecret,

    #[error("token lifetime must be positive and within the supported date range")]
    InvalidLifetime,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("JWT verification failed: {0}")]
    Verification(#[from] jsonwebtoken::errors::Error),
}

/// Sign `claims` as an HS256 compact JWS.
pub fn mint_token(secret: &str, claims: &Claims) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// HS256 verifier holding pre-built key material.
///
/// Stateless after construction, so one instance serves every request.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Developer tokens carry no exp; it is still checked whenever present.
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        // No audience is configured, so a token carrying `aud` is rejected.
        validation.validate_aud = true;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_token_verifies_under_same_secret() {
        let token = mint_token("S1", &Claims::new("u", "admin")).unwrap();
        let claims = JwtVerifier::new("S1").unwrap().verify(&token).unwrap();
        assert_eq!(claims.sub, "u");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_minted_token_fails_under_other_secret() {
        let token = mint_token("S1", &Claims::default()).unwrap();
        let result = JwtVerifier::new("S2").unwrap().verify(&token);
        assert!(matches!(result, Err(JwtError::Verification(_))));
    }

    #[test]
    fn test_default_claims_match_developer_payload() {
        let claims = Claims::default();
        assert_eq!(claims.sub, "some-fixed-user");
        assert_eq!(claims.role, "admin");

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json, serde_json::json!({ "sub": "some-fixed-user", "role": "admin" }));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims {
            exp: Some(Utc::now().timestamp() - 3600),
            ..Claims::default()
        };
        let token = mint_token("S1", &claims).unwrap();
        assert!(JwtVerifier::new("S1").unwrap().verify(&token).is_err());
    }

    #[test]
    fn test_unexpired_token_is_accepted() {
        let claims = Claims::default().expiring_in(Duration::hours(1)).unwrap();
        let token = mint_token("S1", &claims).unwrap();
        let decoded = JwtVerifier::new("S1").unwrap().verify(&token).unwrap();
        assert_eq!(decoded.exp, claims.exp);
        assert_eq!(decoded.iat, claims.iat);
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let far = Claims::default().expiring_in(Duration::days(365 * 1_000_000));
        assert!(matches!(far, Err(JwtError::InvalidLifetime)));

        let negative = Claims::default().expiring_in(Duration::hours(-1));
        assert!(matches!(negative, Err(JwtError::InvalidLifetime)));
        assert!(Claims::default().expiring_in(Duration::zero()).is_err());
    }

    #[test]
    fn test_token_with_audience_is_rejected() {
        #[derive(Serialize)]
        struct WithAudience {
            sub: &'static str,
            role: &'static str,
            aud: &'static str,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &WithAudience { sub: "u", role: "admin", aud: "cold" },
            &EncodingKey::from_secret(b"S1"),
        )
        .unwrap();
        assert!(JwtVerifier::new("S1").unwrap().verify(&token).is_err());
    }

    #[test]
    fn test_other_algorithms_are_rejected() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &Claims::default(),
            &EncodingKey::from_secret(b"S1"),
        )
        .unwrap();
        assert!(JwtVerifier::new("S1").unwrap().verify(&token).is_err());
    }

    #[test]
    fn test_garbage_tokens_are_rejected() {
        let verifier = JwtVerifier::new("S1").unwrap();
        for token in ["", "not.a.jwt", "abc", "a.b.c.d"] {
            assert!(verifier.verify(token).is_err(), "accepted {:?}", token);
        }
    }

    #[test]
    fn test_empty_secret_is_refused() {
        assert!(matches!(JwtVerifier::new(""), Err(JwtError::InvalidSecret)));
        assert!(matches!(mint_token("", &Claims::default()), Err(JwtError::InvalidSecret)));
    }
}
