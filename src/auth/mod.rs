// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token-based authentication and role-based authorization for the
//! membership API.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in with email + password
//! 2. Server verifies the password (argon2) and issues an HS256 JWT with a
//!    24-hour validity window
//! 3. The token travels in an HttpOnly `token` cookie
//! 4. On each request the `Auth` extractor verifies the cookie and exposes
//!    the `{user_id, role}` identity to the handler; `AdminOnly` additionally
//!    enforces the admin role
//!
//! ## Security
//!
//! - The signing secret is process-wide configuration; startup fails without it
//! - Verification failures (expired, bad signature, malformed) are logged
//!   with their reason but surface as one generic 401 message
//! - There is no server-side revocation list: logout clears the cookie, and a
//!   token captured before logout stays valid until its natural expiry

pub mod cookie;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod password;
pub mod roles;
pub mod token;

pub use cookie::{clear_session_cookie, session_cookie, SESSION_COOKIE};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, OptionalAuth};
pub use identity::AuthenticatedUser;
pub use roles::{authorize, Role};
pub use token::{TokenError, TokenService};
