// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use tracing::warn;

use crate::{
    blockchain::networks::NetworkKey,
    error::ApiError,
    models::{SwitchNetworkRequest, SwitchNetworkResponse},
    state::AppState,
    wallet::{Connection, SessionState},
};

#[utoipa::path(
    get,
    path = "/v1/wallet",
    tag = "Wallet",
    responses((status = 200, body = SessionState))
)]
pub async fn get_session(State(state): State<AppState>) -> Json<SessionState> {
    let mut snapshot = state.session.snapshot().await;
    // Report the chain the wallet is on now, not the one seen at connect time.
    if snapshot.connected {
        match state.session.current_network().await {
            Ok(network) => snapshot.active_network = Some(network),
            Err(e) => warn!(error = %e, "Could not refresh wallet network"),
        }
    }
    Json(snapshot)
}

#[utoipa::path(
    post,
    path = "/v1/wallet/connect",
    tag = "Wallet",
    responses(
        (status = 200, body = Connection),
        (status = 401, description = "No account authorized", body = crate::error::ErrorBody),
        (status = 503, description = "No wallet provider configured", body = crate::error::ErrorBody)
    )
)]
pub async fn connect_wallet(State(state): State<AppState>) -> Result<Json<Connection>, ApiError> {
    Ok(Json(state.session.connect().await?))
}

#[utoipa::path(
    post,
    path = "/v1/wallet/disconnect",
    tag = "Wallet",
    responses((status = 200, body = SessionState))
)]
pub async fn disconnect_wallet(State(state): State<AppState>) -> Json<SessionState> {
    state.session.disconnect().await;
    Json(state.session.snapshot().await)
}

#[utoipa::path(
    post,
    path = "/v1/wallet/network",
    request_body = SwitchNetworkRequest,
    tag = "Wallet",
    responses(
        (status = 200, body = SwitchNetworkResponse),
        (status = 400, description = "Unknown network key", body = crate::error::ErrorBody),
        (status = 502, description = "Wallet refused the switch", body = crate::error::ErrorBody)
    )
)]
pub async fn switch_network(
    State(state): State<AppState>,
    Json(request): Json<SwitchNetworkRequest>,
) -> Result<Json<SwitchNetworkResponse>, ApiError> {
    let target: NetworkKey = request
        .network
        .parse()
        .map_err(|e: crate::blockchain::networks::RegistryError| ApiError::bad_request(e.to_string()))?;
    let network = state.session.switch_network(target).await?;
    Ok(Json(SwitchNetworkResponse { network }))
}
