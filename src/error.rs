//! Typed errors and HTTP mapping.

use crate::schema::ValidationError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("unknown store backend: {0} (expected postgres or memory)")]
    UnknownBackend(String),
}

/// Failures of the resource-access layer. Each one is terminal for the request that produced it.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("unable to convert '{0}' to an identifier")]
    InvalidIdentifier(String),
    #[error("unable to find the {resource} {id}")]
    NotFound { resource: &'static str, id: String },
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    #[error("unable to query {collection}: {source}")]
    QueryFailed {
        collection: String,
        #[source]
        source: StoreError,
    },
    #[error("unable to decode {resource} document {id}: {reason}")]
    DecodeFailed {
        resource: &'static str,
        id: String,
        reason: String,
    },
    #[error("unable to insert into {collection} after {inserted} record(s): {source}")]
    InsertFailed {
        collection: String,
        inserted: usize,
        #[source]
        source: StoreError,
    },
    #[error("unable to update the {resource} {id}: {source}")]
    UpdateFailed {
        resource: &'static str,
        id: String,
        #[source]
        source: StoreError,
    },
    #[error("unable to delete the {resource} {id}: {source}")]
    DeleteFailed {
        resource: &'static str,
        id: String,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Repo(e) => match e {
                // 500, not 400: existing clients depend on it.
                RepoError::InvalidIdentifier(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "invalid_identifier")
                }
                RepoError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                RepoError::InvalidFilter(_) => (StatusCode::BAD_REQUEST, "invalid_filter"),
                RepoError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                RepoError::QueryFailed { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "query_failed"),
                RepoError::DecodeFailed { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "decode_failed")
                }
                RepoError::InsertFailed { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "insert_failed")
                }
                RepoError::UpdateFailed { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "update_failed")
                }
                RepoError::DeleteFailed { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "delete_failed")
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let details = match &self {
            AppError::Repo(RepoError::Validation(v)) => Some(serde_json::json!({
                "field": v.field,
                "constraint": v.kind.as_str(),
            })),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ConstraintKind;

    #[test]
    fn invalid_identifier_maps_to_internal_error() {
        let err = AppError::from(RepoError::InvalidIdentifier("zzz".into()));
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_and_filter_errors_map_to_bad_request() {
        let v = ValidationError {
            field: "nome".into(),
            kind: ConstraintKind::MaxLength(20),
        };
        assert_eq!(
            AppError::from(RepoError::from(v)).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(RepoError::InvalidFilter("cor".into())).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn write_failures_map_to_internal_error() {
        let err = AppError::from(RepoError::UpdateFailed {
            resource: "student",
            id: "x".into(),
            source: StoreError::Unavailable("closed".into()),
        });
        assert_eq!(err.status_and_code(), (StatusCode::INTERNAL_SERVER_ERROR, "update_failed"));
    }
}
