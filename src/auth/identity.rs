// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped authenticated identity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;

/// Identity extracted from a verified token.
///
/// This is the only information the authentication gate passes downstream:
/// it is derived per request, never persisted, and lives exactly as long as
/// the request that carried the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// The user's record id (the token's `user.id` claim).
    pub user_id: String,
    /// The user's role at token issuance time.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Check if this identity carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
