//! Client error types

/// Errors talking to the demo API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Request never produced a response
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Message from the error body, or the status reason
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Check if the server reported the target as missing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Check if repeating the same request could succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let missing = ClientError::Status {
            status: 404,
            message: "not found".to_string(),
        };
        assert!(missing.is_not_found());
        assert!(!missing.is_retryable());

        let down = ClientError::Status {
            status: 500,
            message: "internal server error".to_string(),
        };
        assert!(down.is_retryable());
        assert!(ClientError::Network("refused".to_string()).is_retryable());
        assert!(!ClientError::Decode("eof".to_string()).is_retryable());
    }

    #[test]
    fn status_display_includes_code() {
        let err = ClientError::Status {
            status: 400,
            message: "bad request".to_string(),
        };
        assert_eq!(err.to_string(), "server returned 400: bad request");
    }
}
