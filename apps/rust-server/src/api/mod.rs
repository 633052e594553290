// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    blockchain::types::{CredentialRecord, ResumeRecord},
    error::ErrorBody,
    models::{
        CandidateResumesResponse, GrantAccessRequest, IssueCredentialRequest, RegisterResumeBody,
        SwitchNetworkRequest, SwitchNetworkResponse, TransactionResponse,
    },
    state::AppState,
    wallet::{ActiveNetwork, Connection, SessionState},
    workflows::{IssuedCredential, RegisteredResume},
};

pub mod credentials;
pub mod health;
pub mod resumes;
pub mod wallet;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/wallet", get(wallet::get_session))
        .route("/wallet/connect", post(wallet::connect_wallet))
        .route("/wallet/disconnect", post(wallet::disconnect_wallet))
        .route("/wallet/network", post(wallet::switch_network))
        .route("/credentials", post(credentials::issue_credential))
        .route(
            "/credentials/{credential_id}",
            get(credentials::verify_credential),
        )
        .route("/resumes", post(resumes::register_resume))
        .route(
            "/resumes/{resume_id}/access",
            post(resumes::grant_access),
        )
        .route(
            "/candidates/{address}/resumes",
            get(resumes::candidate_resumes),
        );

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        wallet::get_session,
        wallet::connect_wallet,
        wallet::disconnect_wallet,
        wallet::switch_network,
        credentials::issue_credential,
        credentials::verify_credential,
        resumes::register_resume,
        resumes::candidate_resumes,
        resumes::grant_access
    ),
    components(
        schemas(
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            ErrorBody,
            SessionState,
            ActiveNetwork,
            Connection,
            SwitchNetworkRequest,
            SwitchNetworkResponse,
            IssueCredentialRequest,
            IssuedCredential,
            CredentialRecord,
            RegisterResumeBody,
            RegisteredResume,
            ResumeRecord,
            CandidateResumesResponse,
            GrantAccessRequest,
            TransactionResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Wallet", description = "Wallet session and network selection"),
        (name = "Credentials", description = "Credential issuance and verification"),
        (name = "Resumes", description = "Resume registration and access control")
    )
)]
struct ApiDoc;
