//! HTTP mapping of [`DomainError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::html;
use crate::domain::DomainError;

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        match self {
            DomainError::NotFound => html::status_page(
                StatusCode::NOT_FOUND,
                "Not Found",
                "The requested page does not exist.",
            ),
            // Forms re-render themselves; this only covers writes outside a form
            DomainError::Validation(errors) => html::status_page(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid submission",
                &errors.to_string(),
            ),
            DomainError::Database(e) => {
                tracing::error!("Database error: {}", e);
                html::status_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server Error",
                    "A database error occurred.",
                )
            }
            DomainError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                html::status_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server Error",
                    "Something went wrong.",
                )
            }
        }
    }
}
