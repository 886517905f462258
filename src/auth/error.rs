// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization gate errors.
//!
//! The externally visible messages are deliberately coarse: a missing token
//! and an invalid token get their own fixed strings, but nothing reveals
//! whether an invalid token was malformed, expired, or mis-signed. The
//! fine-grained reason is kept for server-side logging only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::token::TokenError;

/// Gate failure: the request does not carry an acceptable identity.
#[derive(Debug)]
pub enum AuthError {
    /// No `token` cookie on the request.
    MissingToken,
    /// The token failed verification; the inner reason is log-only.
    InvalidToken(TokenError),
    /// Authenticated, but the role is not in the required set.
    Forbidden,
}

#[derive(Serialize)]
struct AuthErrorBody {
    message: String,
}

impl AuthError {
    /// The HTTP status for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    /// The externally visible message. Generic by design.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "No token, authorization denied",
            AuthError::InvalidToken(_) => "Token is not valid",
            AuthError::Forbidden => "Access denied",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "no token cookie on request"),
            AuthError::InvalidToken(reason) => write!(f, "token verification failed: {reason}"),
            AuthError::Forbidden => write!(f, "insufficient role for this operation"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            message: self.public_message().to_string(),
        });
        (status, body).into_response()
    }
}
