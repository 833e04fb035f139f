use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum ClinicError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("{0}")]
    Bind(#[from] BindError),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ClinicError {
    fn from(e: figment::Error) -> Self {
        ClinicError::Config(Box::new(e))
    }
}

/// Why a create request body could not be turned into a new record.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum BindError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("malformed request body: {0}")]
    Malformed(String),
}

impl IntoResponse for ClinicError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            ClinicError::Bind(e) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "BAD_REQUEST".to_string(),
                    message: e.to_string(),
                },
            ),
            other => {
                error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
