//! Error types for building, fetching and decoding current-conditions requests.
//!
//! Every variant is recoverable at the call site. Underlying causes stay reachable
//! through [`std::error::Error::source`] for logging; use
//! [`FetchError::user_message`] for anything shown to an end user.

use thiserror::Error;

/// Failure to turn user input into a request URL.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("query is empty")]
    EmptyQuery,

    #[error("could not encode request URL: {0}")]
    Encoding(#[source] url::ParseError),
}

/// Failure to decode a response body into a weather report.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is empty")]
    EmptyBody,

    #[error("unexpected response shape: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a single `fetch_current` call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] BuildError),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("weather service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not decode weather response: {0}")]
    Decode(#[from] DecodeError),
}

impl FetchError {
    /// Short, non-technical message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::InvalidQuery(BuildError::EmptyQuery) => {
                "Enter a place name or coordinates to search."
            }
            FetchError::InvalidQuery(BuildError::Encoding(_)) => {
                "That search could not be turned into a request."
            }
            FetchError::Network(e) if e.is_timeout() => {
                "The weather service took too long to respond."
            }
            FetchError::Network(_) => "Could not reach the weather service.",
            FetchError::Api { status: 400, .. } => "No matching location found.",
            FetchError::Api { status: 401 | 403, .. } => "The weather API key was rejected.",
            FetchError::Api { .. } => "The weather service returned an error.",
            FetchError::Decode(_) => "The weather service sent an unexpected response.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn decode_error_keeps_json_cause() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::from(DecodeError::from(json_err));

        let decode = err.source().expect("decode error is the source");
        assert!(decode.source().is_some(), "serde_json error must be preserved");
    }

    #[test]
    fn user_messages_do_not_leak_causes() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::Decode(DecodeError::Json(json_err));

        assert_eq!(err.user_message(), "The weather service sent an unexpected response.");
        assert!(err.to_string().contains("could not decode"));
    }

    #[test]
    fn api_status_messages() {
        let not_found = FetchError::Api { status: 400, message: "No matching location found.".into() };
        let forbidden = FetchError::Api { status: 403, message: "API key has been disabled.".into() };
        let broken = FetchError::Api { status: 502, message: "Bad Gateway".into() };

        assert_eq!(not_found.user_message(), "No matching location found.");
        assert_eq!(forbidden.user_message(), "The weather API key was rejected.");
        assert_eq!(broken.user_message(), "The weather service returned an error.");
    }
}
