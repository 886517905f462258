// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Storage Module
//!
//! Persistent storage for identity records as JSON documents on the local
//! filesystem, one file per record.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   users/
//!     {user_id}.json
//! ```
//!
//! Writes go through a temp-file-then-rename so a crash mid-write never
//! leaves a truncated document behind. The layer knows nothing about
//! authentication; it is the "credential store" collaborator the auth
//! subsystem reads and writes through typed repositories.

pub mod document_store;
pub mod paths;
pub mod repository;

pub use document_store::{DocumentStore, StorageError, StorageResult};
pub use paths::StoragePaths;
