//! JSON error bodies and the status/severity mapping shared by every route.
//!
//! Handlers never build error replies by hand: each error type implements
//! [`IntoErrorResponse`] and calls [`IntoErrorResponse::into_http_response`],
//! which logs at a level matching the severity and returns the reply.
use coup_engine::errors::GameError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

/// Body returned by every failing API call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable code, e.g. `"invalid_card"`
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response {
        reply::with_status(reply::json(&self), status).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Decides the log level of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Bad input from the page; logged at info
    Client,
    Server,
    /// Shared state is no longer trustworthy
    Critical,
}

pub trait IntoErrorResponse {
    fn status_code(&self) -> StatusCode;

    fn error_code(&self) -> &'static str;

    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        if self.status_code().is_server_error() {
            ErrorSeverity::Server
        } else {
            ErrorSeverity::Client
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        match self.error_details() {
            Some(details) => {
                ErrorResponse::with_details(self.error_code(), self.error_message(), details)
            }
            None => ErrorResponse::new(self.error_code(), self.error_message()),
        }
    }

    /// Logs the error and turns it into a JSON reply.
    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        let body = self.to_error_response();

        match self.severity() {
            ErrorSeverity::Client => {
                tracing::info!(error = %body.error, status = status.as_u16(), "{}", body.message)
            }
            ErrorSeverity::Server => {
                tracing::error!(error = %body.error, status = status.as_u16(), "{}", body.message)
            }
            ErrorSeverity::Critical => tracing::error!(
                error = %body.error,
                status = status.as_u16(),
                critical = true,
                "{}",
                body.message
            ),
        }

        body.into_response(status)
    }
}

/// Engine validation failures are always the caller's fault.
impl IntoErrorResponse for GameError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_code(&self) -> &'static str {
        match self {
            GameError::InvalidCard(_) => "invalid_card",
            GameError::InvalidOutcome(_) => "invalid_result",
            GameError::TotalOutOfRange(_) => "total_out_of_range",
            GameError::PointOutOfRange(_) => "point_out_of_range",
            GameError::TooManyCards { .. } => "too_many_cards",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            GameError::InvalidCard(label) => Some(json!({ "label": label })),
            GameError::InvalidOutcome(label) => Some(json!({ "result": label })),
            GameError::TooManyCards { count, maximum } => {
                Some(json!({ "count": count, "maximum": maximum }))
            }
            GameError::TotalOutOfRange(_) | GameError::PointOutOfRange(_) => None,
        }
    }
}
