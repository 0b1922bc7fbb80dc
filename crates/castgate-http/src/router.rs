//! Route resolution and query-string parsing.
//!
//! The gateway serves one lookup route with an optional crew path segment,
//! plus a health probe:
//!
//! ```text
//! GET /movies/crew?movieId=1
//! GET /movies/crew/5?movieId=1
//! GET /health
//! ```

use std::collections::HashMap;

use serde_json::json;

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// The movie crew lookup, with the raw crew path segment when present.
    CrewLookup {
        /// The raw `{crew}` path segment.
        crew: Option<String>,
    },
    /// The health probe.
    Health,
}

/// A request that matched no route, or matched one with the wrong method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// No route matches the path.
    #[error("Not found")]
    NotFound,
    /// The path is known but the method is not GET.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl RouteError {
    /// The HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// The JSON body for this error.
    #[must_use]
    pub fn body(&self) -> serde_json::Value {
        json!({ "message": self.to_string() })
    }
}

/// Resolve a request line to a route.
pub fn resolve_route(method: &http::Method, path: &str) -> Result<Route, RouteError> {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    let route = match segments.as_slice() {
        ["health"] => Route::Health,
        ["movies", "crew"] => Route::CrewLookup { crew: None },
        ["movies", "crew", crew] => Route::CrewLookup {
            crew: Some((*crew).to_owned()),
        },
        _ => return Err(RouteError::NotFound),
    };

    if *method != http::Method::GET {
        return Err(RouteError::MethodNotAllowed);
    }

    Ok(route)
}

/// Parse a raw query string into a parameter map.
///
/// Returns `None` when the request carried no query string at all; the
/// handler distinguishes "no query parameters" from "empty query
/// parameters". Repeated keys keep the last value.
#[must_use]
pub fn parse_query(query: Option<&str>) -> Option<HashMap<String, String>> {
    query.map(|raw| {
        form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    })
}
