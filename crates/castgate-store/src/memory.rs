//! In-memory table store.
//!
//! Tables are registered with a partition key and an optional sort key.
//! Documents live in a [`DashMap`] keyed by partition, with a [`BTreeMap`]
//! per partition keyed by [`ScalarKey`], so sort-key range conditions are
//! evaluated as ordered range scans:
//!
//! ```text
//! DashMap<ScalarKey, BTreeMap<ScalarKey, Document>>
//! ```
//!
//! Ordering follows the store's comparison rules: numbers compare
//! numerically, strings byte-wise. Tables without a sort key use a sentinel
//! as the single per-partition entry.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::StoreError;
use crate::expression::{CompareOp, KeyCondition, SortTerm, parse_key_condition};
use crate::store::{Document, DocumentKey, DocumentStore, ExpressionValues};

// ---------------------------------------------------------------------------
// ScalarKey
// ---------------------------------------------------------------------------

/// A key-eligible scalar value with total ordering, usable as a `BTreeMap`
/// key.
///
/// Numbers keep their original textual representation and compare
/// numerically; strings compare byte-wise. The sentinel stands in for the
/// sort key of tables that have none and always compares equal to itself.
#[derive(Debug, Clone)]
enum ScalarKey {
    /// String key.
    S(String),
    /// Number key (stored as its original string form).
    N(String),
    /// Sentinel for tables without a sort key.
    Sentinel,
}

impl ScalarKey {
    /// Build a key from a JSON value. Only strings and numbers are
    /// key-eligible.
    fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self::S(s.clone())),
            serde_json::Value::Number(n) => Some(Self::N(n.to_string())),
            _ => None,
        }
    }
}

/// Parses a number string to `f64` for comparison purposes.
///
/// Returns `f64::NAN` on failure, which sorts to the end.
fn parse_number(s: &str) -> f64 {
    s.parse::<f64>().unwrap_or(f64::NAN)
}

impl PartialEq for ScalarKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScalarKey {}

impl PartialOrd for ScalarKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScalarKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::S(a), Self::S(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Self::N(a), Self::N(b)) => {
                let fa = parse_number(a);
                let fb = parse_number(b);
                fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
            }
            (Self::Sentinel, Self::Sentinel) => Ordering::Equal,
            // Different variants should not meet within one partition, but
            // the ordering must still be deterministic.
            (Self::S(_), _) => Ordering::Less,
            (_, Self::S(_)) => Ordering::Greater,
            (Self::N(_), _) => Ordering::Less,
            (_, Self::N(_)) => Ordering::Greater,
        }
    }
}

impl std::hash::Hash for ScalarKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::S(s) | Self::N(s) => s.hash(state),
            Self::Sentinel => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Table schema & seed format
// ---------------------------------------------------------------------------

/// Key schema of a registered table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    /// The table name.
    pub name: String,
    /// The partition key attribute name.
    pub partition_key: String,
    /// The optional sort key attribute name.
    #[serde(default)]
    pub sort_key: Option<String>,
}

/// Seed document for preloading a [`MemoryStore`].
#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    /// Tables to register and fill.
    pub tables: Vec<SeedTable>,
}

/// One table in a seed document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTable {
    /// The table's key schema.
    #[serde(flatten)]
    pub schema: TableSchema,
    /// Documents to load.
    #[serde(default)]
    pub items: Vec<Document>,
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Table {
    schema: TableSchema,
    partitions: DashMap<ScalarKey, BTreeMap<ScalarKey, Document>>,
}

/// In-memory document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: DashMap<String, Table>,
}

impl MemoryStore {
    /// Create an empty store with no tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, replacing any existing table of the same name.
    pub fn register_table(&self, schema: TableSchema) {
        debug!(table = %schema.name, partition_key = %schema.partition_key, "registered table");
        self.tables.insert(
            schema.name.clone(),
            Table {
                schema,
                partitions: DashMap::new(),
            },
        );
    }

    /// Insert or replace a document, extracting its primary key from the
    /// table's key schema.
    pub fn put(&self, table: &str, document: Document) -> Result<(), StoreError> {
        let table = self.require_table(table)?;

        let partition = extract_key(&document, &table.schema.partition_key)?;
        let sort = match &table.schema.sort_key {
            Some(attr) => extract_key(&document, attr)?,
            None => ScalarKey::Sentinel,
        };

        table
            .partitions
            .entry(partition)
            .or_default()
            .insert(sort, document);
        Ok(())
    }

    /// Register and fill every table in a seed document.
    pub fn load_seed(&self, seed: SeedData) -> Result<(), StoreError> {
        for table in seed.tables {
            let name = table.schema.name.clone();
            self.register_table(table.schema);
            for item in table.items {
                self.put(&name, item)?;
            }
        }
        Ok(())
    }

    fn require_table(&self, name: &str) -> Result<dashmap::mapref::one::Ref<'_, String, Table>, StoreError> {
        self.tables.get(name).ok_or_else(|| StoreError::TableNotFound {
            table: name.to_owned(),
        })
    }
}

/// Extract a key attribute from a document as a [`ScalarKey`].
fn extract_key(document: &Document, attribute: &str) -> Result<ScalarKey, StoreError> {
    let value = document
        .get(attribute)
        .ok_or_else(|| StoreError::InvalidKey {
            attribute: attribute.to_owned(),
            reason: "attribute missing from document".to_owned(),
        })?;
    ScalarKey::from_value(value).ok_or_else(|| StoreError::InvalidKey {
        attribute: attribute.to_owned(),
        reason: "key attributes must be strings or numbers".to_owned(),
    })
}

/// Resolve a placeholder against the bound expression values.
///
/// Bindings are keyed with the leading `:` included, matching the shape the
/// caller submits (`":m" -> 1`).
fn resolve_value<'a>(
    values: &'a ExpressionValues,
    placeholder: &str,
) -> Result<&'a serde_json::Value, StoreError> {
    values
        .get(&format!(":{placeholder}"))
        .ok_or_else(|| StoreError::UnboundValue {
            placeholder: placeholder.to_owned(),
        })
}

/// Collect the documents of one partition matching an optional sort term.
fn collect_partition(
    partition: &BTreeMap<ScalarKey, Document>,
    sort: Option<(&SortTerm, ScalarKey)>,
) -> Vec<Document> {
    let Some((term, key)) = sort else {
        return partition.values().cloned().collect();
    };

    match term.op {
        CompareOp::Eq => partition.get(&key).cloned().into_iter().collect(),
        CompareOp::Lt => collect_range(partition, Bound::Unbounded, Bound::Excluded(key)),
        CompareOp::Le => collect_range(partition, Bound::Unbounded, Bound::Included(key)),
        CompareOp::Gt => collect_range(partition, Bound::Excluded(key), Bound::Unbounded),
        CompareOp::Ge => collect_range(partition, Bound::Included(key), Bound::Unbounded),
    }
}

/// Collect documents within a range of sort keys, in ascending order.
fn collect_range(
    partition: &BTreeMap<ScalarKey, Document>,
    lower: Bound<ScalarKey>,
    upper: Bound<ScalarKey>,
) -> Vec<Document> {
    partition
        .range((lower, upper))
        .map(|(_, doc)| doc.clone())
        .collect()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(
        &self,
        table: &str,
        key_condition: &str,
        values: &ExpressionValues,
    ) -> Result<Vec<Document>, StoreError> {
        let condition: KeyCondition = parse_key_condition(key_condition)?;
        let table_ref = self.require_table(table)?;
        let schema = &table_ref.schema;

        if condition.partition_attribute != schema.partition_key {
            return Err(StoreError::KeySchemaMismatch {
                table: table.to_owned(),
                attribute: condition.partition_attribute,
            });
        }

        let partition_value = resolve_value(values, &condition.partition_value_ref)?;
        let partition_key =
            ScalarKey::from_value(partition_value).ok_or_else(|| StoreError::InvalidKey {
                attribute: schema.partition_key.clone(),
                reason: "key attributes must be strings or numbers".to_owned(),
            })?;

        let sort = match &condition.sort {
            Some(term) => {
                if schema.sort_key.as_deref() != Some(term.attribute.as_str()) {
                    return Err(StoreError::KeySchemaMismatch {
                        table: table.to_owned(),
                        attribute: term.attribute.clone(),
                    });
                }
                let value = resolve_value(values, &term.value_ref)?;
                let key = ScalarKey::from_value(value).ok_or_else(|| StoreError::InvalidKey {
                    attribute: term.attribute.clone(),
                    reason: "key attributes must be strings or numbers".to_owned(),
                })?;
                Some((term, key))
            }
            None => None,
        };

        let documents = table_ref
            .partitions
            .get(&partition_key)
            .map(|partition| collect_partition(partition.value(), sort))
            .unwrap_or_default();

        debug!(table, count = documents.len(), "memory query");
        Ok(documents)
    }

    async fn get(&self, table: &str, key: &DocumentKey) -> Result<Option<Document>, StoreError> {
        let table_ref = self.require_table(table)?;
        let schema = &table_ref.schema;

        for attribute in key.keys() {
            let known = attribute == &schema.partition_key
                || schema.sort_key.as_deref() == Some(attribute.as_str());
            if !known {
                return Err(StoreError::KeySchemaMismatch {
                    table: table.to_owned(),
                    attribute: attribute.clone(),
                });
            }
        }

        let partition_value =
            key.get(&schema.partition_key)
                .ok_or_else(|| StoreError::InvalidKey {
                    attribute: schema.partition_key.clone(),
                    reason: "attribute missing from key".to_owned(),
                })?;
        let partition_key =
            ScalarKey::from_value(partition_value).ok_or_else(|| StoreError::InvalidKey {
                attribute: schema.partition_key.clone(),
                reason: "key attributes must be strings or numbers".to_owned(),
            })?;

        let sort_key = match &schema.sort_key {
            Some(attr) => {
                let value = key.get(attr).ok_or_else(|| StoreError::InvalidKey {
                    attribute: attr.clone(),
                    reason: "attribute missing from key".to_owned(),
                })?;
                ScalarKey::from_value(value).ok_or_else(|| StoreError::InvalidKey {
                    attribute: attr.clone(),
                    reason: "key attributes must be strings or numbers".to_owned(),
                })?
            }
            None => ScalarKey::Sentinel,
        };

        Ok(table_ref
            .partitions
            .get(&partition_key)
            .and_then(|partition| partition.get(&sort_key).cloned()))
    }
}
