// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface: router, CORS, and the OpenAPI document.
//!
//! The route table mirrors the public contract: session lifecycle and user
//! record operations under `/api/auth`, plus a liveness probe at `/health`
//! and Swagger UI at `/docs`. The authentication and authorization gates are
//! extractors on the handlers, so they always run before any business logic.

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState, client_url: &str) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/profile", get(users::profile))
        .route("/permissions", get(users::permissions))
        .route("/all-users", get(users::list_users))
        .route("/stats", get(users::stats))
        .route("/user/{id}", get(users::get_user))
        .route("/{id}/membership", patch(users::update_membership))
        .route("/{id}/role", patch(users::update_role))
        .with_state(state);

    // Credentialed CORS: the cookie only travels when the origin is pinned.
    let origin = client_url
        .parse::<HeaderValue>()
        .expect("CLIENT_URL must be a valid origin");
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/auth", auth_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register,
        auth::login,
        auth::logout,
        users::profile,
        users::permissions,
        users::update_membership,
        users::update_role,
        users::list_users,
        users::get_user,
        users::stats
    ),
    components(
        schemas(
            health::HealthResponse,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::SessionUser,
            auth::SessionResponse,
            auth::MessageResponse,
            users::UserResponse,
            users::UserMessageResponse,
            users::UpdateRoleRequest,
            users::PermissionsResponse,
            users::PermissionsUser,
            users::PermissionFlags,
            users::StatsResponse,
            users::RecentUser,
            crate::auth::Role,
            crate::storage::repository::MembershipStatus
        )
    ),
    tags(
        (name = "Health", description = "Liveness probes"),
        (name = "Auth", description = "Session lifecycle"),
        (name = "Users", description = "User records and membership")
    )
)]
struct ApiDoc;
