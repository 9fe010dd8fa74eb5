// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token decoding and expiry decisions.
//!
//! Tokens are decoded without verifying the signature; the server is the
//! only party that can do that. The claims are used to avoid sending
//! requests that are bound to be rejected.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Tokens expiring within this window are treated as already expired (5 minutes).
pub const DEFAULT_EXPIRY_BUFFER_SECS: i64 = 5 * 60;

/// Tokens with less than this much lifetime left should be renewed (1 hour).
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 60 * 60;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// Claims read from the token payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    #[serde(default, deserialize_with = "deserialize_subject")]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Why a token could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("expected 3 token segments, found {0}")]
    WrongSegmentCount(usize),

    #[error("payload is not base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not a claims object: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Split a `header.payload.signature` token and parse its payload.
pub fn decode(token: &str) -> Result<TokenClaims, DecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::WrongSegmentCount(segments.len()));
    }

    let payload = segments[1];
    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .or_else(|_| STANDARD_LENIENT.decode(payload))?;

    Ok(serde_json::from_slice(&bytes)?)
}

/// True when the token expires before `now + buffer_secs`.
pub fn is_expired(claims: &TokenClaims, now: i64, buffer_secs: i64) -> bool {
    claims.exp < now.saturating_add(buffer_secs)
}

/// True when the token has less than `threshold_secs` of lifetime left.
pub fn needs_refresh(claims: &TokenClaims, now: i64, threshold_secs: i64) -> bool {
    claims.exp.saturating_sub(now) < threshold_secs
}

/// Subject claim, for display and debugging only.
pub fn extract_user_id(claims: &TokenClaims) -> Option<&str> {
    claims.sub.as_deref()
}

/// Expiry rules applied to stored tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    pub buffer_secs: i64,
    pub refresh_threshold_secs: i64,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            buffer_secs: DEFAULT_EXPIRY_BUFFER_SECS,
            refresh_threshold_secs: DEFAULT_REFRESH_THRESHOLD_SECS,
        }
    }
}

impl ExpiryPolicy {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            buffer_secs: config.expiry_buffer_secs,
            refresh_threshold_secs: config.refresh_threshold_secs,
        }
    }

    /// Decode `token` and return its claims if it is still usable at `now`.
    ///
    /// Decode failures and expiry both yield `None`.
    pub fn usable_claims(&self, token: &str, now: i64) -> Option<TokenClaims> {
        match decode(token) {
            Ok(claims) if !is_expired(&claims, now, self.buffer_secs) => Some(claims),
            Ok(claims) => {
                tracing::debug!(exp = claims.exp, now, "Token expired");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to decode token");
                None
            }
        }
    }

    pub fn needs_refresh(&self, claims: &TokenClaims, now: i64) -> bool {
        needs_refresh(claims, now, self.refresh_threshold_secs)
    }
}

fn deserialize_subject<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
