//! Error taxonomy for the service core and its HTTP mapping
//!
//! Every business-rule violation is a typed, caller-visible variant.
//! Infrastructure failures ride in through `Store` and surface as 500s so
//! they are never mistaken for business failures. A declined payment is
//! not an error at all; see `services::checkout::CheckoutOutcome`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Typed failures surfaced by the service layer
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("email already registered")]
    DuplicateIdentity,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account temporarily locked")]
    AccountLocked,

    #[error("verify your email to continue")]
    NotVerified,

    #[error("missing or invalid session token")]
    Unauthenticated,

    #[error("operation not permitted")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("product not available: {0}")]
    ProductUnavailable(String),

    #[error("cart is empty")]
    EmptyCart,

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidInput(_)
            | ApiError::DuplicateIdentity
            | ApiError::ProductUnavailable(_)
            | ApiError::EmptyCart => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::NotVerified | ApiError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::AccountLocked => StatusCode::LOCKED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for service results
pub type ApiResult<T> = Result<T, ApiError>;
