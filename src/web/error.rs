//! HTTP mapping for [`crate::errors::Error`].

use crate::errors::Error;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// User-facing message
    pub error: String,
}

impl Error {
    /// Status code reported for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
            Self::Duplicate { .. }
            | Self::BookingAlreadyAssigned { .. }
            | Self::NoBedsAvailable { .. } => StatusCode::CONFLICT,
            Self::RoomNotFound { .. }
            | Self::StudentNotFound { .. }
            | Self::BookingNotFound { .. }
            | Self::FeedbackNotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::RoleMismatch | Self::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::StudentProfileMissing => StatusCode::SEE_OTHER,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::PasswordHash { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!("Request failed: {self}");
            let body = ErrorBody {
                error: "Internal server error".to_string(),
            };
            return (status, Json(body)).into_response();
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        if matches!(self, Self::StudentProfileMissing) {
            return (status, [(header::LOCATION, "/signup")], Json(body)).into_response();
        }
        (status, Json(body)).into_response()
    }
}
