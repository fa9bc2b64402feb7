//! Local token signing.
//!
//! Tokens are `<claims>.<signature>`: the claims are base64url-encoded JSON
//! and the signature is the hex HMAC-SHA256 of the encoded claims.
//!
//! If no signing key is configured, issuance fails for every link
//! (with a warning logged at startup).

use std::{sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::{TokenIssuer, TokenPayload};
use crate::IssueError;

type HmacSha256 = Hmac<Sha256>;

/// Optional secret for signing tokens.
/// When `None`, signing is disabled.
#[derive(Clone)]
pub struct SigningKey {
    key: Option<Arc<[u8]>>,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field(
                "key",
                &if self.key.is_some() {
                    "[REDACTED]"
                } else {
                    "[DISABLED]"
                },
            )
            .finish()
    }
}

impl SigningKey {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: Some(key.into().into()),
        }
    }

    pub fn disabled() -> Self {
        Self { key: None }
    }

    /// Build a key from a configured value, hex-decoded when possible.
    pub fn from_value(value: Option<String>) -> Self {
        match value {
            Some(key) if !key.is_empty() => {
                let key_bytes = hex::decode(&key).unwrap_or_else(|_| key.into_bytes());
                tracing::info!("Local token signing is enabled");
                Self::new(key_bytes)
            }
            _ => {
                tracing::warn!("STREAM_SIGNING_KEY is not set, local token signing is DISABLED");
                tracing::warn!(
                    "Set STREAM_SIGNING_KEY or STREAM_TOKEN_ENDPOINT to embed signed players"
                );
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    /// Hex signature of `data`, or `None` if signing is disabled.
    pub fn sign(&self, data: &[u8]) -> Option<String> {
        let key = self.key.as_ref()?;

        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
        mac.update(data);
        Some(hex::encode(mac.finalize().into_bytes()))
    }

    /// Constant-time check of a hex signature. Always `false` when disabled.
    pub fn verify(&self, data: &[u8], signature: &str) -> bool {
        let Some(key) = &self.key else {
            return false;
        };

        let Ok(sig_bytes) = hex::decode(signature) else {
            return false;
        };

        let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
        mac.update(data);
        mac.verify_slice(&sig_bytes).is_ok()
    }
}

/// What a locally signed token asserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub identifier: String,
    pub fullname: String,
    pub email: String,
    pub account: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct HmacTokenIssuer {
    key: SigningKey,
    ttl: Duration,
}

impl HmacTokenIssuer {
    pub fn new(key: SigningKey, ttl: Duration) -> Self {
        Self { key, ttl }
    }

    pub fn issue_at(
        &self,
        account_id: &str,
        payload: &TokenPayload,
        now: DateTime<Utc>,
    ) -> Result<String, IssueError> {
        let iat = now.timestamp();
        let claims = TokenClaims {
            identifier: payload.identifier.clone(),
            fullname: payload.fullname.clone(),
            email: payload.email.clone(),
            account: account_id.to_string(),
            iat,
            exp: iat.saturating_add(self.ttl.as_secs() as i64),
        };

        let json = serde_json::to_vec(&claims)
            .map_err(|e| IssueError::InvalidResponse(e.to_string()))?;
        let encoded = URL_SAFE_NO_PAD.encode(json);
        let signature = self
            .key
            .sign(encoded.as_bytes())
            .ok_or(IssueError::Disabled)?;

        Ok(format!("{}.{}", encoded, signature))
    }

    /// Check a token's signature and expiry, returning its claims.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<TokenClaims> {
        let (encoded, signature) = token.split_once('.')?;
        if !self.key.verify(encoded.as_bytes(), signature) {
            return None;
        }

        let json = URL_SAFE_NO_PAD.decode(encoded).ok()?;
        let claims: TokenClaims = serde_json::from_slice(&json).ok()?;
        (claims.exp > now.timestamp()).then_some(claims)
    }

    pub fn verify(&self, token: &str) -> Option<TokenClaims> {
        self.verify_at(token, Utc::now())
    }
}

impl TokenIssuer for HmacTokenIssuer {
    async fn issue(&self, account_id: &str, payload: &TokenPayload) -> Result<String, IssueError> {
        self.issue_at(account_id, payload, Utc::now())
    }
}
