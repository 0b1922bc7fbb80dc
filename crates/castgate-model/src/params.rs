//! Crew-role query-parameter schema and validation.
//!
//! Query-string values always arrive as strings, so validation coerces them
//! to their declared types first (`"3"` to an integer, `"true"` to a
//! boolean) and only then checks the structure, mirroring coercing-validator
//! behavior. The schema document itself is declared once and echoed back to
//! the caller on validation failures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Typed view of the crew-role query parameters after coercion.
///
/// `movie_id` stays a raw string: the handler owns its parsing so that a
/// non-numeric id reaches the dedicated missing-movie-id path instead of
/// failing validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewRoleQueryParams {
    /// The raw movie identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<String>,
    /// Crew rank filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew: Option<i64>,
    /// Crew member name filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Role name filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Featured-credit flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

/// A query-parameter validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    /// A parameter that is not part of the schema was supplied.
    #[error("unrecognized query parameter: {0}")]
    UnknownParameter(String),
    /// A parameter value could not be coerced to its declared type.
    #[error("query parameter '{field}' is not a valid {expected}")]
    Coercion {
        /// The parameter name.
        field: String,
        /// The declared type.
        expected: &'static str,
    },
}

/// Validator for crew-role query parameters.
///
/// Holds the declared schema document; built once and reused across
/// invocations.
#[derive(Debug, Clone)]
pub struct QueryParamsValidator {
    schema: serde_json::Value,
}

impl QueryParamsValidator {
    /// Build the validator with the declared schema document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: json!({
                "$id": "CrewRoleQueryParams",
                "type": "object",
                "properties": {
                    "movieId": { "type": "string" },
                    "crew": { "type": "integer" },
                    "name": { "type": "string" },
                    "role": { "type": "string" },
                    "featured": { "type": "boolean" }
                },
                "additionalProperties": false
            }),
        }
    }

    /// The declared schema document.
    #[must_use]
    pub fn schema(&self) -> &serde_json::Value {
        &self.schema
    }

    /// Validate a raw query-string map, coercing values to their declared
    /// types.
    pub fn validate(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<CrewRoleQueryParams, ParamsError> {
        let mut parsed = CrewRoleQueryParams::default();

        for (key, raw) in params {
            match key.as_str() {
                "movieId" => parsed.movie_id = Some(raw.clone()),
                "crew" => parsed.crew = Some(coerce_integer(key, raw)?),
                "name" => parsed.name = Some(raw.clone()),
                "role" => parsed.role = Some(raw.clone()),
                "featured" => parsed.featured = Some(coerce_boolean(key, raw)?),
                other => return Err(ParamsError::UnknownParameter(other.to_owned())),
            }
        }

        Ok(parsed)
    }
}

impl Default for QueryParamsValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Coerce a string value to an integer.
fn coerce_integer(field: &str, raw: &str) -> Result<i64, ParamsError> {
    raw.parse::<i64>().map_err(|_| ParamsError::Coercion {
        field: field.to_owned(),
        expected: "integer",
    })
}

/// Coerce a string value to a boolean. Accepts the same spellings a coercing
/// validator does: `true`/`false` and `1`/`0`.
fn coerce_boolean(field: &str, raw: &str) -> Result<bool, ParamsError> {
    match raw {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ParamsError::Coercion {
            field: field.to_owned(),
            expected: "boolean",
        }),
    }
}
