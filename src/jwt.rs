//! Bearer token decoding without signature verification.
//!
//! The dashboard never holds the signing key. Reading the payload here is an
//! advisory convenience for routing and UI decisions; the backend remains the
//! only party that can tell a genuine token from a forged one.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Standard alphabet, tolerant of missing padding and stray trailing bits.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Claims carried in the middle segment of a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Role name as issued by the backend (`ADMIN`, `PROFESSOR`, `STUDENT`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Expiration time (Unix timestamp). Absent means the token never expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// Any other claims, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TokenPayload {
    /// Whether `exp` lies strictly before `now`. Tokens without `exp` never expire.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        let Some(exp) = self.exp else {
            return false;
        };
        let now_ms = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i128)
            .unwrap_or(0);
        i128::from(exp) * 1000 < now_ms
    }
}

/// Decode the payload segment of `token`.
pub fn decode(token: &str) -> Result<TokenPayload, DecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::MalformedToken);
    }

    let translated: String = segments[1]
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let bytes = PAYLOAD_ENGINE
        .decode(translated.as_bytes())
        .map_err(|e| DecodeError::MalformedPayload(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| DecodeError::MalformedPayload(e.to_string()))
}

/// Whether `token` is provably expired right now.
///
/// Fails open: anything that cannot be decoded, or carries no `exp`, is
/// reported as not expired.
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, SystemTime::now())
}

/// Same as [`is_expired`] against an explicit clock.
pub fn is_expired_at(token: &str, now: SystemTime) -> bool {
    match decode(token) {
        Ok(payload) => payload.is_expired_at(now),
        Err(e) => {
            debug!(error = %e, "Cannot prove token expiry, treating as live");
            false
        }
    }
}

/// Errors that can occur while decoding a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Token does not have exactly three dot-separated segments
    MalformedToken,
    /// Payload segment is not base64 encoded JSON claims
    MalformedPayload(String),
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::MalformedToken => write!(f, "Token must have three segments"),
            DecodeError::MalformedPayload(e) => write!(f, "Malformed token payload: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {}
