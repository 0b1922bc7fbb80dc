//! Wire and domain types for the CastGate movie crew lookup gateway.
//!
//! This crate defines the gateway-style event and response model, the movie
//! and crew-role documents, the crew-role query-parameter schema (with string
//! coercion), and the request-level error taxonomy.

mod error;
mod event;
mod movie;
mod params;

pub use error::LookupError;
pub use event::{GatewayEvent, GatewayResponse, ResponseBody, ResponseData};
pub use movie::{Movie, MovieCrewRole};
pub use params::{CrewRoleQueryParams, ParamsError, QueryParamsValidator};
