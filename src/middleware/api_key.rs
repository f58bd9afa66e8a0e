use axum::{
    extract::{Request, State},
    http::HeaderName,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::config::Secret;
use crate::error::ApiError;

pub static API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Static API key check.
///
/// Keys are compared as SHA-256 digests with `ct_eq`, so timing depends on
/// neither the first differing byte nor the length of the presented key.
#[derive(Clone)]
pub struct ApiKeyVerifier {
    expected: Option<[u8; 32]>,
}

impl ApiKeyVerifier {
    /// With no configured key every request is refused.
    pub fn new(api_key: Option<&Secret>) -> Self {
        Self {
            expected: api_key
                .map(Secret::expose)
                .filter(|k| !k.is_empty())
                .map(digest),
        }
    }

    pub fn verify(&self, provided: Option<&str>) -> bool {
        let (Some(expected), Some(provided)) = (self.expected.as_ref(), provided) else {
            return false;
        };
        if provided.is_empty() {
            return false;
        }
        digest(provided)[..].ct_eq(&expected[..]).into()
    }
}

impl std::fmt::Debug for ApiKeyVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyVerifier")
            .field("configured", &self.expected.is_some())
            .finish()
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

/// Rejects requests whose `X-API-Key` is absent or wrong with 403.
pub async fn api_key_middleware(
    State(verifier): State<Arc<ApiKeyVerifier>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request.headers().get(&API_KEY_HEADER);
    let provided = header.and_then(|v| v.to_str().ok());

    if !verifier.verify(provided) {
        tracing::warn!(
            "Rejected {} {}: {} X-API-Key",
            request.method(),
            request.uri().path(),
            rejection_reason(header.is_some())
        );
        return Err(ApiError::could_not_validate());
    }

    Ok(next.run(request).await)
}

fn rejection_reason(header_present: bool) -> &'static str {
    if header_present {
        "invalid"
    } else {
        "missing"
    }
}
