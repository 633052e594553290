// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    blockchain::types::CredentialRecord,
    error::{ApiError, ErrorBody},
    models::IssueCredentialRequest,
    state::AppState,
    workflows::IssuedCredential,
};

#[utoipa::path(
    post,
    path = "/v1/credentials",
    request_body = IssueCredentialRequest,
    tag = "Credentials",
    responses(
        (status = 201, body = IssuedCredential),
        (status = 400, description = "Missing or invalid credential fields", body = ErrorBody),
        (status = 409, description = "Wallet not connected", body = ErrorBody),
        (status = 422, description = "Transaction reverted", body = ErrorBody)
    )
)]
pub async fn issue_credential(
    State(state): State<AppState>,
    Json(request): Json<IssueCredentialRequest>,
) -> Result<(StatusCode, Json<IssuedCredential>), ApiError> {
    let issued = state.workflows.issue_credential(request.credential).await?;
    Ok((StatusCode::CREATED, Json(issued)))
}

#[utoipa::path(
    get,
    path = "/v1/credentials/{credential_id}",
    tag = "Credentials",
    params(("credential_id" = String, Path, description = "Credential id, decimal or 0x-prefixed hex")),
    responses(
        (status = 200, body = CredentialRecord),
        (status = 400, description = "Id is neither decimal nor hex", body = ErrorBody),
        (status = 404, description = "Unknown credential or missing content", body = ErrorBody)
    )
)]
pub async fn verify_credential(
    State(state): State<AppState>,
    Path(credential_id): Path<String>,
) -> Result<Json<CredentialRecord>, ApiError> {
    Ok(Json(state.workflows.verify_credential(&credential_id).await?))
}
