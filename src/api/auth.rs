// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session lifecycle endpoints: register, login, logout.
//!
//! Register and login both end with a fresh token in the `token` cookie.
//! Logout only clears the cookie; the token itself stays valid until its
//! 24-hour window lapses (see `auth::token`).

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::{
        clear_session_cookie,
        password::{hash_password, validate_password, verify_password},
        session_cookie, OptionalAuth, Role,
    },
    error::ApiError,
    state::AppState,
    storage::repository::{StoredUser, UserRepository},
    storage::StorageError,
};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Registration request.
///
/// Fields are optional at the serde level so missing input surfaces as the
/// documented 400 message instead of a body-rejection error.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Requested role. `admin` requires the request itself to be made by an
    /// authenticated admin.
    pub role: Option<Role>,
}

/// Login request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Identity summary returned by register and login: never any secret fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&StoredUser> for SessionUser {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Response for register and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub message: String,
    pub user: SessionUser,
}

/// Response for logout.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new account.
///
/// Validates the password policy before hashing, enforces case-insensitive
/// email uniqueness, and signs the caller in by setting the session cookie.
/// Creating an `admin` account requires the request to carry an
/// authenticated admin identity.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, session cookie set", body = SessionResponse),
        (status = 400, description = "Missing fields, password policy violation, or duplicate email"),
        (status = 403, description = "Admin role requested without admin credentials")
    )
)]
pub async fn register(
    OptionalAuth(caller): OptionalAuth,
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>), ApiError> {
    let name = request.name.as_deref().map(str::trim).unwrap_or_default();
    let email = request.email.as_deref().map(str::trim).unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        tracing::warn!("registration failed: missing required fields");
        return Err(ApiError::bad_request("Please provide all required fields"));
    }

    if let Err(violation) = validate_password(password) {
        tracing::warn!(%violation, "registration failed: password policy");
        return Err(ApiError::bad_request(violation));
    }

    let role = match request.role.unwrap_or_default() {
        Role::Admin => {
            let caller_is_admin = caller.as_ref().is_some_and(|c| c.is_admin());
            if !caller_is_admin {
                tracing::warn!(%email, "registration failed: admin role requested without admin credentials");
                return Err(ApiError::forbidden("Only admins can create admin accounts"));
            }
            Role::Admin
        }
        Role::User => Role::User,
    };

    let repo = UserRepository::new(&state.storage);
    if repo
        .find_by_email(email)
        .map_err(|e| ApiError::internal(e))?
        .is_some()
    {
        tracing::warn!(%email, "registration failed: user already exists");
        return Err(ApiError::bad_request("User already exists"));
    }

    let password_hash = hash_password(password).map_err(|e| ApiError::internal(e))?;
    let user = StoredUser::new(name, email, password_hash, role);

    repo.create(&user).map_err(|e| match e {
        StorageError::AlreadyExists(_) => ApiError::bad_request("User already exists"),
        e => ApiError::internal(e),
    })?;

    // Token issuance after the write: if it fails the caller retries login
    // against the already-created record.
    let token = state
        .tokens
        .issue(&user.id, user.role)
        .map_err(|e| ApiError::internal(e))?;
    let jar = jar.add(session_cookie(token, state.cookie_secure));

    tracing::info!(user_id = %user.id, %email, role = %user.role, "user registered");
    Ok((
        StatusCode::CREATED,
        jar,
        Json(SessionResponse {
            message: "Registration successful".to_string(),
            user: (&user).into(),
        }),
    ))
}

/// Log in with email and password.
///
/// Unknown email and wrong password produce byte-identical responses so the
/// endpoint cannot be used to enumerate accounts. The active check runs
/// before password comparison.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = SessionResponse),
        (status = 400, description = "Missing or invalid credentials"),
        (status = 403, description = "Account is inactive")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>), ApiError> {
    let email = request.email.as_deref().map(str::trim).unwrap_or_default();
    let password = request.password.as_deref().unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        tracing::warn!("login failed: missing credentials");
        return Err(ApiError::bad_request("Please provide email and password"));
    }

    let repo = UserRepository::new(&state.storage);
    let Some(mut user) = repo
        .find_by_email(email)
        .map_err(|e| ApiError::internal(e))?
    else {
        tracing::warn!(%email, "login failed: user not found");
        return Err(ApiError::bad_request("Invalid credentials"));
    };

    if !user.is_active {
        tracing::warn!(%email, "login failed: account inactive");
        return Err(ApiError::forbidden("Account is inactive"));
    }

    if !verify_password(password, &user.password_hash) {
        tracing::warn!(%email, "login failed: invalid password");
        return Err(ApiError::bad_request("Invalid credentials"));
    }

    user.last_login = Some(Utc::now());
    repo.update(&user).map_err(|e| ApiError::internal(e))?;

    let token = state
        .tokens
        .issue(&user.id, user.role)
        .map_err(|e| ApiError::internal(e))?;
    let jar = jar.add(session_cookie(token, state.cookie_secure));

    tracing::info!(user_id = %user.id, %email, role = %user.role, "login successful");
    Ok((
        jar,
        Json(SessionResponse {
            message: "Login successful".to_string(),
            user: (&user).into(),
        }),
    ))
}

/// Log out by clearing the session cookie.
///
/// Stateless: nothing is revoked server-side.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Session cookie cleared", body = MessageResponse))
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    tracing::info!("logout");
    let jar = jar.add(clear_session_cookie(state.cookie_secure));
    (
        jar,
        Json(MessageResponse {
            message: "Logout successful".to_string(),
        }),
    )
}
