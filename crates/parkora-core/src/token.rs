//! Compact token decoding
//!
//! Reads the claims segment of a JWT without verifying its signature. This is
//! a convenience for deciding what to show; the remote API remains the only
//! authority on whether a token is acceptable.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::models::{RoleSet, UserIdentity};

/// base64url that accepts the payload with or without `=` padding.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Subject (username)
    pub sub: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub iat: Option<i64>,
    /// Expiry, epoch seconds
    pub exp: i64,
}

impl TokenClaims {
    pub fn subject_id(&self) -> &str {
        self.user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.sub)
    }

    pub fn is_expired_at(&self, now_epoch_secs: i64) -> bool {
        self.exp < now_epoch_secs
    }

    pub fn to_identity(&self) -> UserIdentity {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let display_name = if full_name.is_empty() {
            self.sub.clone()
        } else {
            full_name
        };

        UserIdentity {
            id: self.subject_id().to_string(),
            email: self.email.clone(),
            display_name,
            roles: RoleSet::new(&self.roles),
        }
    }
}

pub fn decode_token(token: &str) -> Result<TokenClaims, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::Malformed(segments.len()));
    }
    let payload = segments[1];

    let bytes = URL_SAFE_LENIENT
        .decode(payload)
        .map_err(|e| TokenError::Base64(e.to_string()))?;
    let json = String::from_utf8(bytes).map_err(|_| TokenError::Utf8)?;

    serde_json::from_str(&json).map_err(|e| TokenError::Claims(e.to_string()))
}

pub fn now_epoch_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Fail-closed: anything that cannot be decoded counts as expired.
pub fn is_expired_at(token: &str, now_epoch_secs: i64) -> bool {
    match decode_token(token) {
        Ok(claims) => claims.is_expired_at(now_epoch_secs),
        Err(_) => true,
    }
}

pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now_epoch_secs())
}
