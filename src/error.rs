use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::llm::ExternalServiceError;
use crate::meals::schema::SchemaViolation;

/// Failure of one generation request after the workflow has given up.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    External(#[from] ExternalServiceError),

    #[error("No output received from OpenAI")]
    NoOutput,

    /// The model answered twice and neither answer matched the meal contract.
    #[error("Failed to generate valid meal suggestions after retry")]
    InvalidOutput(#[source] SchemaViolation),

    #[error("No meal generated for reroll")]
    NoMealGenerated,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct PersistenceError {
    pub message: String,
    pub code: String,
}

impl PersistenceError {
    pub const NOT_CONFIGURED: &'static str = "PERSISTENCE_NOT_CONFIGURED";
    pub const UNEXPECTED: &'static str = "UNEXPECTED_ERROR";

    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
        }
    }

    pub fn not_configured() -> Self {
        Self::new(
            "Plan storage is not configured. Set DATABASE_URL to enable it.",
            Self::NOT_CONFIGURED,
        )
    }

    /// Wraps a database error, keeping the server-side SQLSTATE when there is one.
    pub fn from_sqlx(context: &str, err: sqlx::Error) -> Self {
        let code = match &err {
            sqlx::Error::Database(db) => db
                .code()
                .map(|c| c.into_owned())
                .unwrap_or_else(|| Self::UNEXPECTED.into()),
            _ => Self::UNEXPECTED.into(),
        };
        Self::new(format!("{}: {}", context, err), code)
    }
}

/// Boundary error: everything a handler can answer with besides success.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Configuration(String),

    /// Failure whose details stay in the logs; only the message is returned.
    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Configuration(_)
            | ApiError::Internal(_)
            | ApiError::Generation(_)
            | ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let code = match self {
            ApiError::Persistence(e) => Some(e.code.clone()),
            _ => None,
        };
        ErrorBody {
            error: self.to_string(),
            code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, %status, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
