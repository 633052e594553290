// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::wallet::SessionError;
use crate::workflows::WorkflowError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error_code: &'static str,
    pub message: String,
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub error_code: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error_code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_input", message)
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        let status = match &err {
            WorkflowError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            WorkflowError::RecordNotFound(_) | WorkflowError::ContentNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            WorkflowError::NoAccountsAuthorized => StatusCode::UNAUTHORIZED,
            WorkflowError::ContractNotInitialized => StatusCode::CONFLICT,
            WorkflowError::TransactionFailed(_) | WorkflowError::InvalidContent(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            WorkflowError::NetworkSwitchFailed(_) | WorkflowError::Provider(_) => {
                StatusCode::BAD_GATEWAY
            }
            WorkflowError::ProviderMissing | WorkflowError::StoreUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            WorkflowError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        };
        Self::new(status, err.error_code(), err.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        WorkflowError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = %self.status, error_code = self.error_code, error = %self.message, "Request failed");
        }
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.error_code.to_string(),
        });
        (self.status, body).into_response()
    }
}
