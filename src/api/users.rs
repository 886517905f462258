// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User record endpoints: profile, permissions, membership upgrade, and the
//! admin views.
//!
//! Every read path returns records through [`UserRepository::get_reconciled`]
//! or [`UserRepository::list_reconciled`], so a lapsed membership is
//! downgraded and persisted before the caller sees it.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::{AdminOnly, Auth, Role},
    error::ApiError,
    state::AppState,
    storage::repository::{MembershipStatus, StoredUser, UserRepository},
    storage::StorageError,
};

/// Paid membership duration granted by a self-service upgrade.
const MEMBERSHIP_DAYS: i64 = 30;

// ============================================================================
// Request/Response Types
// ============================================================================

/// User record as returned by the API: the stored record minus the secret
/// fields. Constructed only from [`StoredUser`], so the password hash cannot
/// leak by serialization.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub membership: MembershipStatus,
    pub membership_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            membership: user.membership,
            membership_expiry: user.membership_expiry,
            created_at: user.created_at,
            last_login: user.last_login,
            is_active: user.is_active,
        }
    }
}

/// Response wrapping a message plus the affected record.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMessageResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Derived permission flags for the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionFlags {
    pub can_access_admin_dashboard: bool,
    pub can_manage_users: bool,
    pub can_manage_members: bool,
}

/// Caller identity summary for the permissions endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionsUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_admin: bool,
    pub permissions: PermissionFlags,
}

/// Response for GET /api/auth/permissions.
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionsResponse {
    pub user: PermissionsUser,
}

/// Request body for the admin role-change endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Registration summary shown in the admin dashboard stats.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecentUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Admin dashboard statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_members: usize,
    pub paid_members: usize,
    pub unpaid_members: usize,
    pub total_revenue: u64,
    pub recent_users: Vec<RecentUser>,
}

fn not_found_or_internal(e: StorageError) -> ApiError {
    match e {
        StorageError::NotFound(_) => ApiError::not_found("User not found"),
        e => ApiError::internal(e),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Get the caller's own record, membership reconciled.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Users",
    responses(
        (status = 200, description = "Caller's record", body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Record no longer exists")
    )
)]
pub async fn profile(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new(&state.storage);
    let record = repo
        .get_reconciled(&user.user_id, Utc::now())
        .map_err(not_found_or_internal)?;
    Ok(Json(record.into()))
}

/// Report the caller's role and derived permission flags.
#[utoipa::path(
    get,
    path = "/api/auth/permissions",
    tag = "Users",
    responses(
        (status = 200, description = "Permission flags", body = PermissionsResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Record no longer exists")
    )
)]
pub async fn permissions(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<PermissionsResponse>, ApiError> {
    let repo = UserRepository::new(&state.storage);
    let record = repo.get(&user.user_id).map_err(not_found_or_internal)?;

    let is_admin = record.role == Role::Admin;
    Ok(Json(PermissionsResponse {
        user: PermissionsUser {
            id: record.id,
            name: record.name,
            email: record.email,
            role: record.role,
            is_admin,
            permissions: PermissionFlags {
                can_access_admin_dashboard: is_admin,
                can_manage_users: is_admin,
                can_manage_members: is_admin,
            },
        },
    }))
}

/// Self-service membership upgrade.
///
/// A user may upgrade only their own record, and only `user`-role accounts
/// carry a membership; the upgrade grants 30 days of paid membership.
#[utoipa::path(
    patch,
    path = "/api/auth/{id}/membership",
    tag = "Users",
    params(("id" = String, Path, description = "Target user id")),
    responses(
        (status = 200, description = "Membership upgraded", body = UserMessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not your record, or not a user-role account"),
        (status = 404, description = "Target does not exist")
    )
)]
pub async fn update_membership(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserMessageResponse>, ApiError> {
    if caller.user_id != id {
        tracing::warn!(caller = %caller.user_id, target = %id, "membership upgrade scope violation");
        return Err(ApiError::forbidden(
            "Forbidden: You can only update your own membership.",
        ));
    }

    let repo = UserRepository::new(&state.storage);
    let mut user = repo.get(&id).map_err(not_found_or_internal)?;

    if user.role != Role::User {
        return Err(ApiError::forbidden(
            "Only users with role \"user\" can update membership.",
        ));
    }

    user.membership = MembershipStatus::Paid;
    user.membership_expiry = Some(Utc::now() + Duration::days(MEMBERSHIP_DAYS));
    repo.update(&user).map_err(|e| ApiError::internal(e))?;

    tracing::info!(user_id = %user.id, "membership upgraded to paid");
    Ok(Json(UserMessageResponse {
        message: "Membership updated to paid for 1 month".to_string(),
        user: user.into(),
    }))
}

/// Change a user's role. Admin only.
#[utoipa::path(
    patch,
    path = "/api/auth/{id}/role",
    tag = "Users",
    params(("id" = String, Path, description = "Target user id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserMessageResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Target does not exist")
    )
)]
pub async fn update_role(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UserMessageResponse>, ApiError> {
    let repo = UserRepository::new(&state.storage);
    let mut user = repo.get(&id).map_err(not_found_or_internal)?;

    user.role = request.role;
    repo.update(&user).map_err(|e| ApiError::internal(e))?;

    tracing::info!(admin = %admin.user_id, user_id = %user.id, role = %user.role, "role updated");
    Ok(Json(UserMessageResponse {
        message: "User role updated successfully".to_string(),
        user: user.into(),
    }))
}

/// List every user record, memberships reconciled. Admin only.
#[utoipa::path(
    get,
    path = "/api/auth/all-users",
    tag = "Users",
    responses(
        (status = 200, description = "All user records", body = [UserResponse]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn list_users(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    tracing::debug!(admin = %admin.user_id, "listing all users");
    let repo = UserRepository::new(&state.storage);
    let users = repo
        .list_reconciled(Utc::now())
        .map_err(|e| ApiError::internal(e))?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Look up a single user record, membership reconciled. Admin only.
#[utoipa::path(
    get,
    path = "/api/auth/user/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "Target user id")),
    responses(
        (status = 200, description = "User record", body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Target does not exist")
    )
)]
pub async fn get_user(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let repo = UserRepository::new(&state.storage);
    let user = repo
        .get_reconciled(&id, Utc::now())
        .map_err(not_found_or_internal)?;
    Ok(Json(user.into()))
}

/// Admin dashboard statistics.
///
/// Revenue assumes a flat 100 per active paid membership.
#[utoipa::path(
    get,
    path = "/api/auth/stats",
    tag = "Users",
    responses(
        (status = 200, description = "Dashboard statistics", body = StatsResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin role required")
    )
)]
pub async fn stats(
    AdminOnly(_admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let repo = UserRepository::new(&state.storage);
    let users = repo
        .list_reconciled(Utc::now())
        .map_err(|e| ApiError::internal(e))?;

    let paid_members = users
        .iter()
        .filter(|u| u.membership == MembershipStatus::Paid)
        .count();

    let mut recent: Vec<&StoredUser> = users.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_users = recent
        .into_iter()
        .take(5)
        .map(|u| RecentUser {
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role,
            created_at: u.created_at,
        })
        .collect();

    Ok(Json(StatsResponse {
        total_members: users.len(),
        paid_members,
        unpaid_members: users.len() - paid_members,
        total_revenue: paid_members as u64 * 100,
        recent_users,
    }))
}
