//! Request and error bodies exchanged over HTTP

use serde::{Deserialize, Serialize};

/// Body of `PUT /frames/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFrameHtml {
    /// Replacement markup
    pub html: String,
}

impl UpdateFrameHtml {
    /// Create update body
    #[inline]
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

/// JSON body returned with every non-success response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// HTTP status code
    pub code: u16,
    /// Error kind, e.g. `not_found`
    pub error: String,
    /// Client-safe description
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_body_requires_string_html() {
        assert!(serde_json::from_str::<UpdateFrameHtml>(r#"{"html":"<i>x</i>"}"#).is_ok());
        assert!(serde_json::from_str::<UpdateFrameHtml>(r#"{"html":42}"#).is_err());
        assert!(serde_json::from_str::<UpdateFrameHtml>(r"{}").is_err());
    }
}
