/// Errors from the ra.co client layer.
use thiserror::Error;

/// Errors that can occur while talking to the events API.
#[derive(Debug, Error)]
pub enum RaError {
    /// The area search returned no match.
    #[error("Area not found: {query}")]
    AreaNotFound {
        /// The searched area name.
        query: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP error (status {status}): {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The GraphQL server reported one or more errors.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The response did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl RaError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AreaNotFound { .. } => 4,
            Self::Transport(_) | Self::Http { .. } | Self::GraphQl(_) | Self::MalformedResponse(_) => 1,
        }
    }

    /// Machine-readable error code (snake_case) for the JSON error envelope.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AreaNotFound { .. } => "area_not_found",
            Self::Transport(_) => "transport_error",
            Self::Http { .. } => "http_error",
            Self::GraphQl(_) => "graphql_error",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

impl From<reqwest::Error> for RaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RaError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_not_found_names_query() {
        let err = RaError::AreaNotFound {
            query: "atlantis".to_owned(),
        };
        assert_eq!(err.to_string(), "Area not found: atlantis");
        assert_eq!(err.exit_code(), 4);
        assert_eq!(err.code(), "area_not_found");
    }

    #[test]
    fn test_upstream_errors_exit_one() {
        let errs = [
            RaError::Transport("connection refused".to_owned()),
            RaError::Http {
                status: 503,
                body: "unavailable".to_owned(),
            },
            RaError::GraphQl("bad filter".to_owned()),
            RaError::MalformedResponse("missing data".to_owned()),
        ];
        for err in &errs {
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn test_json_error_is_malformed_response() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RaError::from(parse_err);
        assert!(matches!(err, RaError::MalformedResponse(_)));
    }
}
