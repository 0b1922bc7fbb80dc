//! HTTP service layer for the CastGate gateway.
//!
//! Resolves routes, turns HTTP requests into gateway events, runs the crew
//! lookup handler, and renders every response through one builder so the
//! header set is uniform across all paths.

mod body;
mod response;
mod router;
mod service;

pub use body::GatewayBody;
pub use response::{CONTENT_TYPE, CORS_ALLOW_HEADERS, CORS_ALLOW_ORIGIN, to_http_response};
pub use router::{Route, RouteError, parse_query, resolve_route};
pub use service::CrewGatewayService;
