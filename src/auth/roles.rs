// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::AuthError;
use super::identity::AuthenticatedUser;

/// User roles for authorization.
///
/// - `Admin` - full access: member management, role changes, statistics
/// - `User` - normal member, can only act on their own record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Normal member account
    User,
}

impl Role {
    /// Parse a role from its wire string (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

impl Default for Role {
    /// Default role is User (least privilege).
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

/// Authorization gate: allow the identity through only if its role is in the
/// required set.
///
/// Pure predicate over the in-memory identity; performs no I/O. Must run
/// after authentication: the identity it inspects only exists once the
/// token has been verified.
pub fn authorize(user: &AuthenticatedUser, required: &[Role]) -> Result<(), AuthError> {
    if required.contains(&user.role) {
        tracing::debug!(user_id = %user.user_id, role = %user.role, "role check passed");
        Ok(())
    } else {
        tracing::warn!(
            user_id = %user.user_id,
            role = %user.role,
            required = ?required,
            "role check failed: insufficient permissions"
        );
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "user-1".to_string(),
            role,
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("User"), Some(Role::User));
        assert_eq!(Role::parse("auditor"), None);
    }

    #[test]
    fn default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
    }

    #[test]
    fn authorize_allows_role_in_set() {
        assert!(authorize(&identity(Role::Admin), &[Role::Admin]).is_ok());
        assert!(authorize(&identity(Role::User), &[Role::Admin, Role::User]).is_ok());
    }

    #[test]
    fn authorize_denies_role_outside_set() {
        let result = authorize(&identity(Role::User), &[Role::Admin]);
        assert!(matches!(result, Err(AuthError::Forbidden)));
    }
}
