// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The credential carrier: a `token` session cookie.
//!
//! HttpOnly keeps the token away from page scripts; `SameSite=None` lets the
//! browser frontend on another origin send it; `Secure` is tied to the
//! deployment environment so local development over plain HTTP still works.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Cookie lifetime, matching the token validity window.
const COOKIE_MAX_AGE_HOURS: i64 = 24;

/// Build the session cookie carrying a freshly issued token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::None)
        .secure(secure)
        .max_age(Duration::hours(COOKIE_MAX_AGE_HOURS))
        .build()
}

/// Build a removal cookie that clears the session on the client.
///
/// This is all logout does: the token itself stays valid until expiry.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), secure);
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_sets_transport_attributes() {
        let cookie = session_cookie("abc.def.ghi".to_string(), true);
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc.def.ghi");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::hours(COOKIE_MAX_AGE_HOURS)));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn secure_flag_follows_environment() {
        assert_eq!(session_cookie("t".to_string(), false).secure(), Some(false));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(false);
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
