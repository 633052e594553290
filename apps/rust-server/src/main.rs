// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use resume_chain_server::{api::router, config::AppConfig, state::AppState, telemetry};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    telemetry::init(config.log_format);

    info!("Starting Resume Chain Server v{}", env!("CARGO_PKG_VERSION"));

    // Cancelled on Ctrl-C; stops the session loop and the account watcher.
    let shutdown = CancellationToken::new();

    let state = AppState::from_config(&config, &shutdown);

    tokio::spawn(state.session.clone().run(shutdown.clone()));
    tokio::spawn(
        state
            .workflows
            .clone()
            .watch_session(state.session.subscribe_events(), shutdown.clone()),
    );

    let app = router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
    shutdown.cancel();
}
