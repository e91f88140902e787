//! API Error Types
//!
//! One taxonomy for every handler. "Document absent" cases map to 404,
//! everything else the client can cause maps to 400.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::ValidationErrors;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Friend not found")]
    FriendNotFound,

    #[error("Thought not found")]
    ThoughtNotFound,

    #[error("No reaction found with this id")]
    ReactionNotFound,

    #[error("You need more friends than yourself!")]
    SelfFriend,

    #[error("Database error: {0}")]
    Database(String),
}

/// Error body returned by every failing route.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable description
    pub message: String,
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound
            | Self::FriendNotFound
            | Self::ThoughtNotFound
            | Self::ReactionNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::SelfFriend | Self::Database(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::FriendNotFound => "FRIEND_NOT_FOUND",
            Self::ThoughtNotFound => "THOUGHT_NOT_FOUND",
            Self::ReactionNotFound => "REACTION_NOT_FOUND",
            Self::SelfFriend => "SELF_FRIEND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => Self::Validation(format!("{field} already exists")),
            StoreError::MissingReference => {
                Self::Validation("Referenced document does not exist".into())
            }
            StoreError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let Self::Database(err) = &self {
            tracing::error!("Database error: {}", err);
        }

        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
