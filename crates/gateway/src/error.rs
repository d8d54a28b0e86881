//! JSON error bodies for the HTTP endpoints.
//!
//! Upload and query endpoints answer `{message, error?}`; the question
//! endpoint answers `{error}`. Client errors carry their own message with a
//! 400; anything else becomes a 500 with a fixed summary.

use {
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    pdfqa_common::Error,
    serde::Serialize,
    tracing::error,
};

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
enum Body {
    Message {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Error {
        error: String,
    },
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: Body,
}

impl ApiError {
    /// `{message}` for client errors, `{message: summary, error}` otherwise.
    pub fn message(err: &Error, summary: &str) -> Self {
        if err.is_client_error() {
            return Self {
                status: StatusCode::BAD_REQUEST,
                body: Body::Message {
                    message: err.message().to_string(),
                    error: None,
                },
            };
        }
        error!(error = %err, "{summary}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Body::Message {
                message: summary.to_string(),
                error: Some(err.message().to_string()),
            },
        }
    }

    /// `{error}`. Server-side details are logged, not returned.
    pub fn error(err: &Error, summary: &str) -> Self {
        if err.is_client_error() {
            return Self {
                status: StatusCode::BAD_REQUEST,
                body: Body::Error {
                    error: err.message().to_string(),
                },
            };
        }
        error!(error = %err, "{summary}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: Body::Error {
                error: summary.to_string(),
            },
        }
    }

    /// `{message}` with an explicit status, for rejected request bodies.
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: Body::Message {
                message: message.into(),
                error: None,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
