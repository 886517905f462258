// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Membership management backend.
//!
//! An axum service providing cookie-based session authentication, role-based
//! authorization, and paid-membership tracking on top of a file-backed JSON
//! document store. The binary in `main.rs` wires configuration, storage, and
//! the router together; everything else lives here so tests can drive the
//! full stack in-process.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
