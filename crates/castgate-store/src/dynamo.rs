//! DynamoDB-backed document store.
//!
//! Key conditions are validated locally with the shared parser and then
//! passed through to the service verbatim; documents are translated at the
//! boundary by the marshalling layer.

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use tracing::debug;

use crate::document::{
    MarshallOptions, UnmarshallOptions, marshall_value_required, unmarshall_item,
};
use crate::error::StoreError;
use crate::expression::parse_key_condition;
use crate::store::{Document, DocumentKey, DocumentStore, ExpressionValues};

/// Document store backed by a DynamoDB table service.
#[derive(Debug)]
pub struct DynamoStore {
    client: Client,
    marshall: MarshallOptions,
    unmarshall: UnmarshallOptions,
}

impl DynamoStore {
    /// Wrap a configured client with the default document-client options:
    /// empty values convert to NULL, null attributes are dropped on write,
    /// and numbers are read back as plain JSON numbers.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            marshall: MarshallOptions::default(),
            unmarshall: UnmarshallOptions::default(),
        }
    }

    /// Wrap a configured client with explicit marshalling options.
    #[must_use]
    pub fn with_options(
        client: Client,
        marshall: MarshallOptions,
        unmarshall: UnmarshallOptions,
    ) -> Self {
        Self {
            client,
            marshall,
            unmarshall,
        }
    }
}

#[async_trait]
impl DocumentStore for DynamoStore {
    async fn query(
        &self,
        table: &str,
        key_condition: &str,
        values: &ExpressionValues,
    ) -> Result<Vec<Document>, StoreError> {
        // Catch malformed expressions before they reach the wire.
        parse_key_condition(key_condition)?;

        let bound = values
            .iter()
            .map(|(name, value)| {
                (
                    name.clone(),
                    marshall_value_required(value, &self.marshall),
                )
            })
            .collect();

        let output = self
            .client
            .query()
            .table_name(table)
            .key_condition_expression(key_condition)
            .set_expression_attribute_values(Some(bound))
            .send()
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))?;

        let documents: Vec<Document> = output
            .items
            .unwrap_or_default()
            .iter()
            .map(|item| unmarshall_item(item, &self.unmarshall))
            .collect();

        debug!(table, count = documents.len(), "dynamodb query");
        Ok(documents)
    }

    async fn get(&self, table: &str, key: &DocumentKey) -> Result<Option<Document>, StoreError> {
        let key_map = key
            .iter()
            .map(|(name, value)| {
                (
                    name.clone(),
                    marshall_value_required(value, &self.marshall),
                )
            })
            .collect();

        let output = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(key_map))
            .send()
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))?;

        Ok(output
            .item
            .map(|item| unmarshall_item(&item, &self.unmarshall)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::config::{BehaviorVersion, Region};
    use serde_json::json;

    fn offline_store() -> DynamoStore {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        DynamoStore::new(Client::from_conf(config))
    }

    #[tokio::test]
    async fn test_should_reject_malformed_expression_before_sending() {
        let store = offline_store();
        let values = ExpressionValues::from([(":m".to_owned(), json!(1))]);
        let result = store.query("movies", "movieId ==== :m", &values).await;
        assert!(matches!(result, Err(StoreError::Expression(_))));
    }
}
