// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User record repository.
//!
//! Each user is one JSON document under `users/`. Email uniqueness is
//! case-insensitive: emails are normalized (trimmed + lowercased) before
//! they are stored or looked up.
//!
//! Membership state is reconciled lazily: every read path runs the record
//! through [`reconcile_membership`] and persists any downgrade. Two
//! concurrent readers of a just-expired record may both perform the
//! downgrade; the write is idempotent, so no locking is needed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{DocumentStore, StorageError, StorageResult};
use crate::auth::Role;

/// Membership payment state.
///
/// Wire strings (`"paid"` / `"not paid"`) match the documents the original
/// deployment produced, so an existing data directory stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MembershipStatus {
    #[serde(rename = "paid")]
    Paid,
    #[serde(rename = "not paid")]
    NotPaid,
}

/// User identity record as persisted in the document store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StoredUser {
    /// Unique user identifier (UUID), immutable.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Login email, stored trimmed and lowercased; unique across the store.
    pub email: String,
    /// Argon2 PHC hash of the password. Never exposed through the API.
    pub password_hash: String,
    /// Role governing authorization decisions.
    pub role: Role,
    /// Membership payment state.
    pub membership: MembershipStatus,
    /// When the paid membership lapses, if any.
    pub membership_expiry: Option<DateTime<Utc>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Last successful login, if any.
    pub last_login: Option<DateTime<Utc>>,
    /// Inactive accounts are rejected at login.
    pub is_active: bool,
}

impl StoredUser {
    /// Create a fresh record with defaults matching a new registration.
    pub fn new(name: &str, email: &str, password_hash: String, role: Role) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            password_hash,
            role,
            membership: MembershipStatus::NotPaid,
            membership_expiry: None,
            created_at: Utc::now(),
            last_login: None,
            is_active: true,
        }
    }
}

/// Normalize an email for storage and lookup: trim and lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lazy membership reconciliation.
///
/// If the record's paid membership has lapsed at `now`, downgrade it to
/// `NotPaid` and clear the expiry. Returns whether the record changed, so
/// callers know to persist. Applying it twice is a no-op.
pub fn reconcile_membership(user: &mut StoredUser, now: DateTime<Utc>) -> bool {
    match (user.membership, user.membership_expiry) {
        (MembershipStatus::Paid, Some(expiry)) if expiry < now => {
            user.membership = MembershipStatus::NotPaid;
            user.membership_expiry = None;
            true
        }
        _ => false,
    }
}

/// Repository for user records.
pub struct UserRepository<'a> {
    storage: &'a DocumentStore,
}

impl<'a> UserRepository<'a> {
    pub fn new(storage: &'a DocumentStore) -> Self {
        Self { storage }
    }

    /// Check if a user record exists.
    pub fn exists(&self, user_id: &str) -> bool {
        self.storage.exists(self.storage.paths().user(user_id))
    }

    /// Get a user by id.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let path = self.storage.paths().user(user_id);
        if !self.storage.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.storage.read_json(path)
    }

    /// Find a user by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        let wanted = normalize_email(email);
        for user in self.list_all()? {
            if user.email == wanted {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    /// Create a new user record.
    ///
    /// Fails with `AlreadyExists` if a record with the same id or the same
    /// (normalized) email is present.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        if self.exists(&user.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.id)));
        }
        if self.find_by_email(&user.email)?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "User with email {}",
                user.email
            )));
        }

        self.storage
            .write_json(self.storage.paths().user(&user.id), user)
    }

    /// Update an existing user record.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        if !self.exists(&user.id) {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        }
        self.storage
            .write_json(self.storage.paths().user(&user.id), user)
    }

    /// List all user records.
    pub fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        let ids = self.storage.list_ids(self.storage.paths().users_dir())?;

        let mut users = Vec::new();
        for id in ids {
            if let Ok(user) = self.get(&id) {
                users.push(user);
            }
        }
        Ok(users)
    }

    /// Get a user with membership reconciled against `now`.
    ///
    /// Persists the downgrade before returning, so a subsequent independent
    /// read observes the corrected state.
    pub fn get_reconciled(&self, user_id: &str, now: DateTime<Utc>) -> StorageResult<StoredUser> {
        let mut user = self.get(user_id)?;
        if reconcile_membership(&mut user, now) {
            tracing::info!(user_id = %user.id, "membership expired, downgraded to not paid");
            self.update(&user)?;
        }
        Ok(user)
    }

    /// List all users with memberships reconciled against `now`.
    pub fn list_reconciled(&self, now: DateTime<Utc>) -> StorageResult<Vec<StoredUser>> {
        let mut users = self.list_all()?;
        for user in &mut users {
            if reconcile_membership(user, now) {
                tracing::info!(user_id = %user.id, "membership expired, downgraded to not paid");
                self.update(user)?;
            }
        }
        Ok(users)
    }
}
