//! Movie and crew-role document types.
//!
//! Both types carry their key attributes as typed fields and treat everything
//! else as an opaque attribute bag, so that whatever shape the store holds
//! round-trips through the response envelope unchanged (numbers stay numbers,
//! nested objects stay nested objects).

use serde::{Deserialize, Serialize};

/// A movie record, keyed by `movieId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// The movie identifier.
    pub movie_id: i64,
    /// All remaining attributes of the record.
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// One crew member's role on a movie, keyed by the composite `(movieId, crew)`.
///
/// `crew` is an integer rank that orders crew entries within a movie and is
/// used as a strict lower-bound filter by the threshold query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieCrewRole {
    /// The movie identifier (partition key).
    pub movie_id: i64,
    /// The crew rank (sort key).
    pub crew: i64,
    /// All remaining attributes of the record.
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}
