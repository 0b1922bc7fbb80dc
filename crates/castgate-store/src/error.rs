//! Store error types.

use crate::expression::ExpressionError;

/// Errors produced by document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A key-condition expression failed to parse.
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// An expression references a placeholder with no bound value.
    #[error("no value bound for placeholder :{placeholder}")]
    UnboundValue {
        /// The placeholder name (without the leading `:`).
        placeholder: String,
    },

    /// The addressed table does not exist.
    #[error("table not found: {table}")]
    TableNotFound {
        /// The table name.
        table: String,
    },

    /// A key condition or key map references an attribute that is not part
    /// of the table's key schema.
    #[error("attribute '{attribute}' is not part of the key schema of table '{table}'")]
    KeySchemaMismatch {
        /// The table name.
        table: String,
        /// The offending attribute name.
        attribute: String,
    },

    /// A key attribute value has an invalid type or is missing.
    #[error("invalid key value for attribute '{attribute}': {reason}")]
    InvalidKey {
        /// The key attribute name.
        attribute: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The backing service reported a failure.
    #[error("store backend error: {0}")]
    Backend(String),
}
