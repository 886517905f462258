// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors implementing the authentication and authorization gates.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```
//!
//! `AdminOnly` composes `Auth` with the role check, so an admin route can
//! never observe a 403 before authentication has succeeded. Neither gate
//! touches the credential store.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use super::cookie::SESSION_COOKIE;
use super::{authorize, AuthError, AuthenticatedUser, Role};
use crate::state::AppState;

/// Authentication gate.
///
/// Verifies the `token` cookie and exposes the identity it asserts. Checks
/// request extensions first so middleware or tests can pre-populate the
/// identity context.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).ok_or_else(|| {
            tracing::warn!("authentication failed: no token cookie");
            AuthError::MissingToken
        })?;

        let user = state.tokens.verify(token.value()).map_err(|reason| {
            tracing::warn!(%reason, "authentication failed: token rejected");
            AuthError::InvalidToken(reason)
        })?;

        tracing::debug!(user_id = %user.user_id, role = %user.role, "token verified");
        parts.extensions.insert(user.clone());
        Ok(Auth(user))
    }
}

/// Authorization gate requiring the admin role.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;
        authorize(&user, &[Role::Admin])?;
        Ok(AdminOnly(user))
    }
}

/// Optional authentication.
///
/// Returns `None` instead of rejecting when no valid identity is present.
/// Used by registration, where an authenticated admin may create privileged
/// accounts but anonymous callers are still allowed through.
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(user)) => Ok(OptionalAuth(Some(user))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::test_state;
    use axum::http::Request;

    fn parts_with_cookie(token: &str) -> Parts {
        Request::builder()
            .uri("/test")
            .header("Cookie", format!("token={token}"))
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    fn bare_parts() -> Parts {
        Request::builder().uri("/test").body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_rejects_request_without_cookie() {
        let (state, _guard) = test_state();
        let mut parts = bare_parts();

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn auth_accepts_valid_token_cookie() {
        let (state, _guard) = test_state();
        let token = state.tokens.issue("user-1", Role::User).unwrap();
        let mut parts = parts_with_cookie(&token);

        let Auth(user) = Auth::from_request_parts(&mut parts, &state)
            .await
            .expect("valid token authenticates");
        assert_eq!(user.user_id, "user-1");
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn auth_rejects_tampered_token() {
        let (state, _guard) = test_state();
        let other = crate::auth::TokenService::new("some-other-secret-entirely-here");
        let token = other.issue("user-1", Role::Admin).unwrap();
        let mut parts = parts_with_cookie(&token);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn auth_prefers_extensions() {
        let (state, _guard) = test_state();
        let mut parts = bare_parts();
        parts.extensions.insert(AuthenticatedUser {
            user_id: "from-middleware".to_string(),
            role: Role::Admin,
        });

        let Auth(user) = Auth::from_request_parts(&mut parts, &state)
            .await
            .expect("extension identity accepted");
        assert_eq!(user.user_id, "from-middleware");
    }

    #[tokio::test]
    async fn admin_only_rejects_user_role() {
        let (state, _guard) = test_state();
        let token = state.tokens.issue("user-1", Role::User).unwrap();
        let mut parts = parts_with_cookie(&token);

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::Forbidden)));
    }

    #[tokio::test]
    async fn admin_only_accepts_admin_role() {
        let (state, _guard) = test_state();
        let token = state.tokens.issue("admin-1", Role::Admin).unwrap();
        let mut parts = parts_with_cookie(&token);

        let AdminOnly(user) = AdminOnly::from_request_parts(&mut parts, &state)
            .await
            .expect("admin passes");
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn admin_only_without_token_is_unauthenticated_not_forbidden() {
        let (state, _guard) = test_state();
        let mut parts = bare_parts();

        // 401 must win over 403 when there is no identity at all.
        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }

    #[tokio::test]
    async fn optional_auth_is_none_without_token() {
        let (state, _guard) = test_state();
        let mut parts = bare_parts();

        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn optional_auth_is_some_with_valid_token() {
        let (state, _guard) = test_state();
        let token = state.tokens.issue("user-1", Role::User).unwrap();
        let mut parts = parts_with_cookie(&token);

        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(user.unwrap().user_id, "user-1");
    }
}
