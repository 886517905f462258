// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. The signing
//! secret is mandatory: the service refuses to start without it.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HS256 signing secret for identity tokens | Required |
//! | `ENVIRONMENT` | `production` enables the `Secure` cookie attribute | `development` |
//! | `DATA_DIR` | Root directory for the document store | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `CLIENT_URL` | Allowed CORS origin (credentialed requests) | `http://localhost:3001` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

/// Environment variable name for the token signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the deployment environment.
pub const ENVIRONMENT_ENV: &str = "ENVIRONMENT";

/// Environment variable name for the document store root.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the allowed CORS origin.
pub const CLIENT_URL_ENV: &str = "CLIENT_URL";

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HS256 signing secret for identity tokens.
    pub jwt_secret: String,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
    /// Root directory for the document store.
    pub data_dir: String,
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Allowed CORS origin for credentialed requests.
    pub client_url: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Returns an error if `JWT_SECRET` is absent: running without a signing
    /// secret would make every issued token forgeable.
    pub fn from_env() -> Result<Self, String> {
        let jwt_secret =
            env::var(JWT_SECRET_ENV).map_err(|_| format!("{JWT_SECRET_ENV} must be set"))?;
        if jwt_secret.is_empty() {
            return Err(format!("{JWT_SECRET_ENV} must not be empty"));
        }

        let environment =
            env::var(ENVIRONMENT_ENV).unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            jwt_secret,
            cookie_secure: environment == "production",
            data_dir: env::var(DATA_DIR_ENV).unwrap_or_else(|_| "/data".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            client_url: env::var(CLIENT_URL_ENV)
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-variable tests mutate process state, so everything is
    // checked in a single test to avoid interference between parallel tests.
    #[test]
    fn from_env_requires_secret_and_reads_flags() {
        env::remove_var(JWT_SECRET_ENV);
        env::remove_var(ENVIRONMENT_ENV);
        assert!(Config::from_env().is_err());

        env::set_var(JWT_SECRET_ENV, "test-secret");
        let config = Config::from_env().expect("config loads with secret set");
        assert_eq!(config.jwt_secret, "test-secret");
        assert!(!config.cookie_secure);

        env::set_var(ENVIRONMENT_ENV, "production");
        let config = Config::from_env().expect("config loads in production");
        assert!(config.cookie_secure);

        env::remove_var(JWT_SECRET_ENV);
        env::remove_var(ENVIRONMENT_ENV);
    }
}
