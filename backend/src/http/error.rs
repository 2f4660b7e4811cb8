//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (validation error)
    BadRequest(String),
    /// Schedule store error
    Schedule(ScheduleError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Schedule(e) => match e {
                ScheduleError::MalformedInput(_) | ScheduleError::MissingStudentName => {
                    StatusCode::BAD_REQUEST
                }
                ScheduleError::Unauthenticated => StatusCode::UNAUTHORIZED,
                ScheduleError::Denied { .. } => StatusCode::FORBIDDEN,
                ScheduleError::UserCancelled { .. } => StatusCode::CONFLICT,
                ScheduleError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg),
            AppError::Schedule(e) => {
                let error = ApiError::new(e.code(), e.to_string());
                match &e {
                    ScheduleError::UserCancelled { conflicts } => {
                        let listed: Vec<String> = conflicts.iter().map(ToString::to_string).collect();
                        error.with_details(listed.join("; "))
                    }
                    ScheduleError::Storage(store_error) => {
                        log::error!("Storage failure: {}", store_error);
                        error.with_details(store_error.context().to_string())
                    }
                    _ => error,
                }
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::Schedule(err)
    }
}
