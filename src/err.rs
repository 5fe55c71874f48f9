use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};

use crate::{views, RefStr};

pub async fn handler404(path: Uri) -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        views::not_found_page(&format!("Invalid path: {}", path)),
    )
}

#[derive(Debug, Clone)]
pub enum Error {
    DuplicateUsername { username: String },
    InvalidCredentials,
    Validation { field: &'static str },
    NotFound { message: String },
    Internal { kind: RefStr, message: String },
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound { message } => {
                (StatusCode::NOT_FOUND, views::not_found_page(&message)).into_response()
            }
            Error::Internal { kind, message } => {
                log::error!("{}: {}", kind, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    views::error_page("Something went wrong"),
                )
                    .into_response()
            }
            // Domain failures are normally intercepted at the handler and
            // turned into a form re-display; anything that still reaches here
            // is answered as a plain bad request.
            other => (
                StatusCode::BAD_REQUEST,
                views::error_page(&format!("{:?}", other)),
            )
                .into_response(),
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal {
            kind: "DatabaseError",
            message: err.to_string(),
        }
    }
}

impl From<pbkdf2::password_hash::Error> for Error {
    fn from(err: pbkdf2::password_hash::Error) -> Self {
        Self::Internal {
            kind: "PasswordHashError",
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            kind: "Unknown",
            message: err.to_string(),
        }
    }
}
