//! The movie crew lookup handler.
//!
//! One request flows through validation and up to three store reads:
//!
//! 1. a crew-rank query against the rank table, filtered by `crew > :c` when
//!    the path carried a crew threshold (issued for its load only; the
//!    response never includes its result);
//! 2. a movie fetch by id;
//! 3. an unfiltered crew query whose items become `cast`.
//!
//! Every failure is converted into a response; `handle` never propagates an
//! error.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use castgate_model::{
    GatewayEvent, GatewayResponse, LookupError, Movie, MovieCrewRole, QueryParamsValidator,
    ResponseBody, ResponseData,
};
use castgate_store::{Document, DocumentKey, DocumentStore, ExpressionValues};

use crate::config::TableConfig;

/// Handler for the movie crew lookup operation.
///
/// Holds its dependencies explicitly (the store, the table names, and the
/// compiled query-parameter validator), so one instance is built at startup
/// and shared across invocations.
#[derive(Debug)]
pub struct CrewLookupHandler {
    store: Arc<dyn DocumentStore>,
    tables: TableConfig,
    validator: QueryParamsValidator,
}

impl CrewLookupHandler {
    /// Create a handler over a store and table configuration.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, tables: TableConfig) -> Self {
        Self {
            store,
            tables,
            validator: QueryParamsValidator::new(),
        }
    }

    /// Handle one gateway event, always producing a response.
    pub async fn handle(&self, event: &GatewayEvent) -> GatewayResponse {
        debug!(event = ?event, "received event");

        match self.lookup(event).await {
            Ok(body) => GatewayResponse::success(&body),
            Err(error) => {
                warn!(%error, "lookup failed");
                GatewayResponse::from_error(&error)
            }
        }
    }

    async fn lookup(&self, event: &GatewayEvent) -> Result<ResponseBody, LookupError> {
        // A crew threshold that fails to parse degrades to "no threshold"
        // without surfacing an error.
        let crew = event
            .path_param("crew")
            .and_then(|raw| raw.parse::<i64>().ok());

        let Some(params) = event.query_string_parameters.as_ref() else {
            return Err(LookupError::MissingQueryParameters);
        };

        let parsed =
            self.validator
                .validate(params)
                .map_err(|_| LookupError::InvalidQueryParameters {
                    schema: self.validator.schema().clone(),
                })?;

        let movie_id = parsed
            .movie_id
            .as_deref()
            .and_then(parse_movie_id)
            .ok_or(LookupError::MissingMovieId)?;

        // The rank query is issued but not folded into the response; `cast`
        // always comes from the unfiltered query below.
        let ranked = self.query_crew_ranks(movie_id, crew).await?;
        debug!(count = ranked.len(), "crew rank query completed");

        let movie = self
            .store
            .get(&self.tables.movies_table, &movie_key(movie_id))
            .await
            .map_err(LookupError::internal)?
            .ok_or(LookupError::InvalidMovieId)?;
        let movie: Movie = from_document(movie)?;

        let cast = if self.validator.validate(params).is_ok() {
            Some(self.query_cast(movie_id).await?)
        } else {
            None
        };

        Ok(ResponseBody {
            data: ResponseData { movie, cast },
        })
    }

    /// Query the rank table, applying the strict crew threshold when one was
    /// given.
    async fn query_crew_ranks(
        &self,
        movie_id: i64,
        crew: Option<i64>,
    ) -> Result<Vec<Document>, LookupError> {
        let mut values = ExpressionValues::new();
        values.insert(":m".to_owned(), json!(movie_id));

        let condition = match crew {
            Some(rank) => {
                values.insert(":c".to_owned(), json!(rank));
                "movieId = :m AND crew > :c"
            }
            None => "movieId = :m",
        };

        self.store
            .query(&self.tables.rank_table, condition, &values)
            .await
            .map_err(LookupError::internal)
    }

    /// Query the full crew list for a movie.
    async fn query_cast(&self, movie_id: i64) -> Result<Vec<MovieCrewRole>, LookupError> {
        let values = ExpressionValues::from([(":m".to_owned(), json!(movie_id))]);
        let documents = self
            .store
            .query(&self.tables.crew_table, "movieId = :m", &values)
            .await
            .map_err(LookupError::internal)?;

        documents.into_iter().map(from_document).collect()
    }
}

/// Parse a movie id. An id of 0 is treated as missing.
fn parse_movie_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id != 0)
}

/// The primary key of a movie record.
fn movie_key(movie_id: i64) -> DocumentKey {
    HashMap::from([("movieId".to_owned(), json!(movie_id))])
}

/// Deserialize a stored document into a typed record.
fn from_document<T: serde::de::DeserializeOwned>(document: Document) -> Result<T, LookupError> {
    serde_json::from_value(serde_json::Value::Object(document)).map_err(LookupError::internal)
}
