//! Key-value document store seam for CastGate.
//!
//! The handler talks to an external table store through the [`DocumentStore`]
//! trait: `query` by textual key-condition expression and `get` by primary
//! key, both addressed by table name. Two backends are provided:
//!
//! - [`MemoryStore`]: in-process tables with DynamoDB-style sort-key
//!   ordering, used by tests and local development (optionally seeded from a
//!   JSON document).
//! - [`DynamoStore`]: a thin layer over `aws-sdk-dynamodb` that passes key
//!   conditions through verbatim and translates between JSON documents and
//!   attribute values.

mod document;
mod dynamo;
mod error;
mod expression;
mod memory;
mod store;

pub use document::{MarshallOptions, UnmarshallOptions, marshall_document, unmarshall_item};
pub use dynamo::DynamoStore;
pub use error::StoreError;
pub use expression::{CompareOp, ExpressionError, KeyCondition, SortTerm, parse_key_condition};
pub use memory::{MemoryStore, SeedData, SeedTable, TableSchema};
pub use store::{Document, DocumentKey, DocumentStore, ExpressionValues};
