use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `PERMISSION_DENIED`, `NOT_FOUND`, `NO_CONTENT`,
    /// `DUPLICATE_NAME`, `DUPLICATE_TERM_IN_SPORT`, `ALREADY_VOTED`,
    /// `CONFLICT`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Term text must be 1-50 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    PermissionDenied,
    NotFound(String),
    /// Random pick over an empty set.
    NoContent(String),
    /// Sport name already taken.
    DuplicateName,
    /// (text, sport) pair already exists.
    DuplicateTermInSport,
    /// The (user, definition) vote constraint fired.
    AlreadyVoted,
    /// Generic storage-level race backstop.
    Conflict(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "Insufficient permissions".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::NoContent(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NO_CONTENT",
                    message: msg,
                },
            ),
            AppError::DuplicateName => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "DUPLICATE_NAME",
                    message: "A sport with this name already exists".into(),
                },
            ),
            AppError::DuplicateTermInSport => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "DUPLICATE_TERM_IN_SPORT",
                    message: "This term already exists for this sport".into(),
                },
            ),
            AppError::AlreadyVoted => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "ALREADY_VOTED",
                    message: "A vote by this user already exists for this definition".into(),
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}
