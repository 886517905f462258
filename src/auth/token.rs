// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity token issuance and verification.
//!
//! Tokens are HS256 JWTs with a fixed 24-hour validity window and the
//! payload `{"user": {"id": ..., "role": ...}, "iat": ..., "exp": ...}`.
//! They are not persisted server-side and there is no revocation list:
//! "logout" is the client dropping its cookie, and a previously issued token
//! stays cryptographically valid until its natural expiry. Callers that need
//! revocation must layer it on top.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::identity::AuthenticatedUser;
use super::roles::Role;

/// Token validity window.
const TOKEN_VALIDITY_HOURS: i64 = 24;

/// Why a token failed verification.
///
/// Distinguished internally for logging; the HTTP boundary collapses all
/// variants into one generic 401 so callers cannot probe verification
/// internals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token could not be signed")]
    Signing,
}

/// The `user` object embedded in the token payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: String,
    pub role: Role,
}

/// Full JWT claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies identity tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    /// Create a token service from the configured signing secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a signed token for the given identity, valid for 24 hours.
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            user: TokenUser {
                id: user_id.to_string(),
                role,
            },
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_VALIDITY_HOURS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)
    }

    /// Verify a token and extract the identity it asserts.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?;

        Ok(AuthenticatedUser {
            user_id: data.claims.user.id,
            role: data.claims.user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret-key-that-is-at-least-32-chars")
    }

    #[test]
    fn issue_then_verify_round_trips_identity() {
        let tokens = service();
        let token = tokens.issue("user-123", Role::Admin).expect("issue");

        let identity = tokens.verify(&token).expect("verify");
        assert_eq!(identity.user_id, "user-123");
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn token_signed_with_other_secret_fails_signature_check() {
        let ours = service();
        let theirs = TokenService::new("a-completely-different-signing-secret");

        let token = theirs.issue("user-123", Role::User).expect("issue");
        assert_eq!(ours.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn expired_token_fails_with_expiry() {
        let tokens = service();

        // Encode claims whose window elapsed an hour ago, past any leeway.
        let now = Utc::now();
        let claims = Claims {
            user: TokenUser {
                id: "user-123".to_string(),
                role: Role::User,
            },
            iat: (now - Duration::hours(25)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret-key-that-is-at-least-32-chars"),
        )
        .expect("encode");

        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let tokens = service();
        assert_eq!(tokens.verify("not.a.jwt"), Err(TokenError::Malformed));
        assert_eq!(tokens.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn payload_nests_identity_under_user_key() {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

        let tokens = service();
        let token = tokens.issue("user-123", Role::User).expect("issue");

        // Decode the payload segment without verification to check the shape.
        let payload = token.split('.').nth(1).expect("payload segment");
        let bytes = URL_SAFE_NO_PAD.decode(payload).expect("base64url payload");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("JSON payload");
        assert_eq!(json["user"]["id"], "user-123");
        assert_eq!(json["user"]["role"], "user");
        assert!(json["exp"].as_i64().unwrap() > json["iat"].as_i64().unwrap());
    }
}
