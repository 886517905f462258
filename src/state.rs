// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::auth::TokenService;
use crate::storage::DocumentStore;

/// Shared application state.
///
/// Everything in here is read-only after startup or internally synchronized;
/// request handling itself is stateless.
#[derive(Clone)]
pub struct AppState {
    /// Document store holding user records.
    pub storage: DocumentStore,
    /// Token issuance and verification.
    pub tokens: TokenService,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(storage: DocumentStore, tokens: TokenService, cookie_secure: bool) -> Self {
        Self {
            storage,
            tokens,
            cookie_secure,
        }
    }
}

/// Test helpers shared by handler and extractor tests.
#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    /// Build an AppState backed by a temporary directory.
    ///
    /// The TempDir must stay alive for the duration of the test.
    pub fn test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mut storage = DocumentStore::new(StoragePaths::new(temp_dir.path()));
        storage.initialize().expect("initialize storage");

        let tokens = TokenService::new("test-secret-key-that-is-at-least-32-chars");
        (AppState::new(storage, tokens, false), temp_dir)
    }
}
