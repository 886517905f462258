// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use members_server::api;
use members_server::auth::TokenService;
use members_server::config::Config;
use members_server::state::AppState;
use members_server::storage::{DocumentStore, StoragePaths};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing JWT_SECRET is fatal: tokens would be forgeable.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(message) => {
            tracing::error!("{message}");
            std::process::exit(1);
        }
    };

    let mut storage = DocumentStore::new(StoragePaths::new(&config.data_dir));
    storage
        .initialize()
        .expect("Failed to initialize document store");
    tracing::info!(data_dir = %config.data_dir, "document store ready");

    let tokens = TokenService::new(&config.jwt_secret);
    let state = AppState::new(storage, tokens, config.cookie_secure);
    let app = api::router(state, &config.client_url);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");
    tracing::info!("Members server listening on http://{addr} (docs at /docs)");

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
