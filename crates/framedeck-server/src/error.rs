//! Error translation between storage, warp rejections and HTTP responses
//!
//! Storage failures that are not the client's fault are logged here and
//! answered with a generic 500; their details never reach the response body.

use framedeck_model::ErrorBody;
use framedeck_store::StoreError;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::reject::{InvalidHeader, MethodNotAllowed};
use warp::{Rejection, Reply};

/// Message sent with every 500 response
pub const INTERNAL_MESSAGE: &str = "internal server error";

/// API error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Referenced record or route does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Request body malformed
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Route exists, method does not
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Request body over the configured limit
    #[error("payload too large")]
    PayloadTooLarge,

    /// Anything the client cannot act on
    #[error("internal server error")]
    Internal,
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable kind
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::PayloadTooLarge => "payload_too_large",
            Self::Internal => "internal",
        }
    }

    /// Response body for this error
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.status().as_u16(),
            error: self.kind().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::FrameNotFound(id) => Self::NotFound(format!("frame {id}")),
            StoreError::DemoNotFound(id) => Self::NotFound(format!("demo {id}")),
            StoreError::InvalidInput(message) => Self::BadRequest(message),
            other => {
                tracing::error!(error = %other, "storage failure");
                Self::Internal
            }
        }
    }
}

/// Turn any rejection into a JSON error response
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let api_error = if let Some(e) = err.find::<ApiError>() {
        e.clone()
    } else if err.is_not_found() {
        ApiError::NotFound("route".to_string())
    } else if let Some(e) = err.find::<InvalidHeader>() {
        ApiError::BadRequest(e.to_string())
    } else if err.find::<MethodNotAllowed>().is_some() {
        ApiError::MethodNotAllowed
    } else {
        tracing::error!(rejection = ?err, "unhandled rejection");
        ApiError::Internal
    };

    if api_error.status().is_client_error() {
        tracing::debug!(error = %api_error, "request rejected");
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&api_error.body()),
        api_error.status(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use framedeck_model::FrameId;

    #[test]
    fn store_not_found_maps_to_404() {
        let err = ApiError::from(StoreError::FrameNotFound(FrameId::new()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failures_hide_details() {
        let err = ApiError::from(StoreError::Unavailable("disk on fire at /var/db".to_string()));

        assert_eq!(err, ApiError::Internal);
        let body = err.body();
        assert_eq!(body.code, 500);
        assert_eq!(body.message, INTERNAL_MESSAGE);
        assert!(!body.message.contains("/var/db"));
    }

    #[test]
    fn invalid_input_maps_to_400() {
        let err = ApiError::from(StoreError::InvalidInput("empty".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "bad_request");
    }
}
