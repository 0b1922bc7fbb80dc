//! Configuration and business logic for the CastGate movie crew lookup
//! gateway.

mod config;
mod handler;

pub use config::{CastGateConfig, StoreBackend, TableConfig};
pub use handler::CrewLookupHandler;
