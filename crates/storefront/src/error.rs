//! Unified error handling for the storefront.
//!
//! Provides a unified `AppError` type that logs server-side failures before
//! responding to the client. All route handlers return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use bistro_core::{CartError, CheckoutError};

use crate::services::orders::OrderApiError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart mutation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout transition failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// The order endpoint rejected or never received the submission.
    #[error("Order submission error: {0}")]
    OrderApi(#[from] OrderApiError),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Template(_) | Self::Internal(_) | Self::OrderApi(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Cart(err) => match err {
                CartError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                CartError::CountUnderflow { .. } | CartError::CountOverflow { .. } => {
                    StatusCode::BAD_REQUEST
                }
                CartError::CheckoutInProgress => StatusCode::CONFLICT,
            },
            Self::Checkout(err) => match err {
                CheckoutError::AlreadySubmitting => StatusCode::CONFLICT,
                CheckoutError::EmptyCart => StatusCode::BAD_REQUEST,
                CheckoutError::NotSubmitting => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::OrderApi(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Template(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Template(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::OrderApi(_) => "Order service error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
