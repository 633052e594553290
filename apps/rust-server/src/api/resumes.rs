// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{ApiError, ErrorBody},
    models::{CandidateResumesResponse, GrantAccessRequest, RegisterResumeBody, TransactionResponse},
    state::AppState,
    workflows::{parse_address, parse_record_id, RegisterResumeRequest, RegisteredResume},
};

#[utoipa::path(
    post,
    path = "/v1/resumes",
    request_body = RegisterResumeBody,
    tag = "Resumes",
    responses(
        (status = 201, body = RegisteredResume),
        (status = 400, description = "Invalid file or fields", body = ErrorBody),
        (status = 409, description = "Wallet not connected", body = ErrorBody),
        (status = 503, description = "Content store unavailable", body = ErrorBody)
    )
)]
pub async fn register_resume(
    State(state): State<AppState>,
    Json(body): Json<RegisterResumeBody>,
) -> Result<(StatusCode, Json<RegisteredResume>), ApiError> {
    let request = RegisterResumeRequest::try_from(body)?;
    let registered = state.workflows.register_resume(request).await?;
    Ok((StatusCode::CREATED, Json(registered)))
}

#[utoipa::path(
    get,
    path = "/v1/candidates/{address}/resumes",
    tag = "Resumes",
    params(("address" = String, Path, description = "Candidate address")),
    responses(
        (status = 200, body = CandidateResumesResponse),
        (status = 400, description = "Invalid address", body = ErrorBody)
    )
)]
pub async fn candidate_resumes(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<CandidateResumesResponse>, ApiError> {
    let candidate = parse_address(&address, "candidate")?;
    let resumes = state.workflows.candidate_resumes(candidate).await?;
    Ok(Json(CandidateResumesResponse { candidate, resumes }))
}

#[utoipa::path(
    post,
    path = "/v1/resumes/{resume_id}/access",
    request_body = GrantAccessRequest,
    tag = "Resumes",
    params(("resume_id" = String, Path, description = "Resume id, decimal or 0x-prefixed hex")),
    responses(
        (status = 200, body = TransactionResponse),
        (status = 400, description = "Invalid id or recruiter address", body = ErrorBody),
        (status = 422, description = "Transaction reverted", body = ErrorBody)
    )
)]
pub async fn grant_access(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
    Json(request): Json<GrantAccessRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let resume_id = parse_record_id(&resume_id)?;
    let recruiter = parse_address(&request.recruiter, "recruiter")?;
    let transaction_hash = state.workflows.grant_access(resume_id, recruiter).await?;
    Ok(Json(TransactionResponse { transaction_hash }))
}
