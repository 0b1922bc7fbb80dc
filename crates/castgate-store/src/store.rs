//! The document store trait.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StoreError;

/// A document: a JSON object held by a table.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Placeholder bindings for a key-condition expression, keyed with the
/// leading `:` included (e.g. `":m"`).
pub type ExpressionValues = HashMap<String, serde_json::Value>;

/// A primary key: key attribute names to values.
pub type DocumentKey = HashMap<String, serde_json::Value>;

/// Read-only access to a key-value document store addressed by table name.
///
/// The two operations mirror the collaborator contract of the surrounding
/// platform: `query` evaluates a textual key-condition expression against a
/// single partition, `get` fetches one document by its full primary key.
#[async_trait]
pub trait DocumentStore: std::fmt::Debug + Send + Sync {
    /// Query documents matching a key-condition expression.
    ///
    /// `key_condition` has the form `pk = :ref` optionally followed by
    /// `AND sk <op> :ref2`; `values` binds the placeholders.
    async fn query(
        &self,
        table: &str,
        key_condition: &str,
        values: &ExpressionValues,
    ) -> Result<Vec<Document>, StoreError>;

    /// Fetch a single document by primary key. Returns `None` when no
    /// document exists under the key.
    async fn get(&self, table: &str, key: &DocumentKey) -> Result<Option<Document>, StoreError>;
}
