//! Gateway event and response model.
//!
//! The inbound shape mirrors an HTTP-gateway proxy event: optional path
//! parameters and optional query-string parameters, both as string maps with
//! camelCase JSON field names. The outbound shape is a status code plus a
//! JSON body; the transport layer attaches the uniform header set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::movie::{Movie, MovieCrewRole};

/// An inbound gateway-style request event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayEvent {
    /// Path parameters, absent when the route carries none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_parameters: Option<HashMap<String, String>>,
    /// Query-string parameters, absent when the request carries no query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl GatewayEvent {
    /// Returns the raw value of a path parameter, if present.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }
}

/// The success envelope: `{"data": {"movie": ..., "cast": [...]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    /// The payload.
    pub data: ResponseData,
}

/// Payload of a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    /// The movie record.
    pub movie: Movie,
    /// All crew-role records for the movie, when the query parameters
    /// validated on the second pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<MovieCrewRole>>,
}

/// An outbound gateway-style response: a status code and a JSON body.
///
/// All responses are built through [`GatewayResponse::success`] and
/// [`GatewayResponse::from_error`] so that every path produces the same
/// header set downstream.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    /// The HTTP status code.
    pub status: http::StatusCode,
    /// The JSON body.
    pub body: serde_json::Value,
}

impl GatewayResponse {
    /// Build a `200 OK` response from the success envelope.
    #[must_use]
    pub fn success(body: &ResponseBody) -> Self {
        match serde_json::to_value(body) {
            Ok(json) => Self {
                status: http::StatusCode::OK,
                body: json,
            },
            Err(err) => Self::from_error(&LookupError::internal(err)),
        }
    }

    /// Build an error response with the status code and body shape of the
    /// given error.
    #[must_use]
    pub fn from_error(error: &LookupError) -> Self {
        Self {
            status: error.status_code(),
            body: error.body(),
        }
    }
}
