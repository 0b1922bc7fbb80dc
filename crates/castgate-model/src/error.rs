//! Request-level error taxonomy.
//!
//! Every failure the handler can surface maps to a status code and a JSON
//! body here. The body key casing is not uniform: builder-style errors use
//! `message`, the two movie-id failures use `Message`, and the catch-all uses
//! `error`. The mixed casing is observed behavior of the service this
//! implementation preserves.

use serde_json::json;

/// An error surfaced by the crew lookup handler.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The request carried no query-string parameters at all.
    ///
    /// Status 500 is preserved as observed behavior even though this is
    /// semantically a client error.
    #[error("Missing query parameters")]
    MissingQueryParameters,

    /// The query-string parameters failed schema validation after coercion.
    #[error("Incorrect type. Must match Query parameters schema")]
    InvalidQueryParameters {
        /// The query-parameter schema document echoed to the caller.
        schema: serde_json::Value,
    },

    /// `movieId` was absent, unparseable, or zero.
    #[error("Missing movie Id")]
    MissingMovieId,

    /// No movie record exists for the given id.
    #[error("Invalid movie Id")]
    InvalidMovieId,

    /// Any unexpected failure (store access, serialization).
    #[error("{0}")]
    Internal(String),
}

impl LookupError {
    /// Wrap an unexpected failure, keeping only its display string.
    #[must_use]
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    /// The HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::MissingQueryParameters | Self::InvalidQueryParameters { .. } | Self::Internal(_) => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::MissingMovieId | Self::InvalidMovieId => http::StatusCode::NOT_FOUND,
        }
    }

    /// The JSON body for this error.
    #[must_use]
    pub fn body(&self) -> serde_json::Value {
        match self {
            Self::MissingQueryParameters => json!({ "message": self.to_string() }),
            Self::InvalidQueryParameters { schema } => {
                json!({ "message": self.to_string(), "schema": schema })
            }
            Self::MissingMovieId | Self::InvalidMovieId => {
                json!({ "Message": self.to_string() })
            }
            Self::Internal(message) => json!({ "error": message }),
        }
    }
}
