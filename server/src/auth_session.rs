//! Client session tokens for admin authentication.
//!
//! A [SessionToken] holds the ids of the admin accounts a client has successfully logged in as.
//! For transport in the `X-SESSION-TOKEN` header, it is serialized into a signed string of the
//! form `base64(payload).base64(hmac)`, using HMAC-SHA256 with the application secret. Parsing
//! verifies the signature and enforces a maximum token age.

use crate::data_store::AdminId;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use ring::hmac;
use serde::{Deserialize, Serialize};

pub struct SessionToken {
    authorized_admins: Vec<AdminId>,
    issued_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct TokenPayload {
    #[serde(rename = "adminIds")]
    admin_ids: Vec<AdminId>,
    #[serde(rename = "issuedAt")]
    issued_at: i64,
}

impl SessionToken {
    pub fn new() -> Self {
        SessionToken {
            authorized_admins: vec![],
            issued_at: Utc::now(),
        }
    }

    /// Parse and verify a serialized session token.
    ///
    /// Tokens older than `max_age` are rejected, as are tokens with a broken signature or
    /// malformed payload.
    pub fn from_string(
        data: &str,
        secret: &str,
        max_age: std::time::Duration,
    ) -> Result<Self, SessionError> {
        let (payload_b64, signature_b64) = data
            .split_once('.')
            .ok_or(SessionError::InvalidTokenFormat)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| SessionError::InvalidTokenFormat)?;
        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        hmac::verify(&key, payload_b64.as_bytes(), &signature)
            .map_err(|_| SessionError::SignatureVerificationFailed)?;
        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| SessionError::InvalidTokenFormat)?;
        let payload: TokenPayload = serde_json::from_slice(&payload_bytes)
            .map_err(|_| SessionError::InvalidTokenFormat)?;
        let issued_at = DateTime::<Utc>::from_timestamp(payload.issued_at, 0)
            .ok_or(SessionError::InvalidTokenFormat)?;
        let age = Utc::now().signed_duration_since(issued_at);
        let max_age =
            chrono::Duration::from_std(max_age).map_err(|_| SessionError::ExpiredToken)?;
        if age > max_age {
            return Err(SessionError::ExpiredToken);
        }
        Ok(SessionToken {
            authorized_admins: payload.admin_ids,
            issued_at,
        })
    }

    pub fn as_string(&self, secret: &str) -> String {
        let payload = TokenPayload {
            admin_ids: self.authorized_admins.clone(),
            issued_at: self.issued_at.timestamp(),
        };
        let payload_bytes = serde_json::to_vec(&payload)
            .expect("session token payload serialization should not fail");
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload_bytes);
        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        let signature = hmac::sign(&key, payload_b64.as_bytes());
        format!(
            "{}.{}",
            payload_b64,
            URL_SAFE_NO_PAD.encode(signature.as_ref())
        )
    }

    pub fn add_authorization(&mut self, admin_id: AdminId) {
        self.authorized_admins.push(admin_id)
    }

    /// Remove all admin authorizations from the token (logout).
    pub fn drop_authorizations(&mut self) {
        self.authorized_admins.clear()
    }

    pub fn admin_ids(&self) -> &[AdminId] {
        &self.authorized_admins
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub enum SessionError {
    InvalidTokenFormat,
    SignatureVerificationFailed,
    ExpiredToken,
}
