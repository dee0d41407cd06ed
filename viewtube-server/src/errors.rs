use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use viewtube_platform::{AuthError, ChannelError, CommentError, DatabaseError, VideoError};

pub type ServerResult<T> = Result<T, ServerError>;

/// The body returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid email or password.")]
    InvalidCredentials,
    #[error("Email already registered. Please login instead.")]
    EmailTaken,
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(String),
    #[error("{resource} not found.")]
    NotFound { resource: &'static str },
    #[error("{resource} with {field} of value {value} already exists.")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("Server error: {0}")]
    Unknown(String),
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound { resource: _ } => StatusCode::NOT_FOUND,
            Self::Conflict {
                resource: _,
                field: _,
                value: _,
            } => StatusCode::CONFLICT,
            Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if let Self::Unknown(message) = &self {
            log::error!("Request failed: {message}");
        }

        let body = ErrorBody {
            message: self.to_string(),
        };

        (self.as_status_code(), Json(body)).into_response()
    }
}

impl From<DatabaseError> for ServerError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound {
                resource,
                identifier: _,
            } => Self::NotFound { resource },
            DatabaseError::Conflict {
                resource,
                field,
                value,
            } => Self::Conflict {
                resource,
                field,
                value,
            },
            e => Self::Unknown(e.to_string()),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        match value {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::EmailTaken => Self::EmailTaken,
            AuthError::Validation(message) => Self::Validation(message.to_string()),
            AuthError::BadToken => Self::Unauthorized("Not authorized, token failed."),
            AuthError::Db(e) => e.into(),
            e => Self::Unknown(e.to_string()),
        }
    }
}

impl From<ChannelError> for ServerError {
    fn from(value: ChannelError) -> Self {
        match value {
            ChannelError::NameTooShort => Self::Validation(value.to_string()),
            ChannelError::Db(e) => e.into(),
        }
    }
}

impl From<VideoError> for ServerError {
    fn from(value: VideoError) -> Self {
        match value {
            VideoError::Db(e) => e.into(),
            e => Self::Forbidden(e.to_string()),
        }
    }
}

impl From<CommentError> for ServerError {
    fn from(value: CommentError) -> Self {
        match value {
            CommentError::EmptyText => Self::Validation(value.to_string()),
            CommentError::Db(e) => e.into(),
            e => Self::Forbidden(e.to_string()),
        }
    }
}
