//! End-to-end tests for the CastGate server.
//!
//! Each test spins up the full service in-process on an ephemeral port
//! (memory store, handler, hyper service) and drives it over HTTP with
//! reqwest, so `cargo test` needs no running environment.

use std::sync::Arc;

use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;

use castgate_core::{CrewLookupHandler, TableConfig};
use castgate_http::CrewGatewayService;
use castgate_store::{MemoryStore, SeedData};

#[cfg(test)]
mod test_errors;
#[cfg(test)]
mod test_lookup;

/// The standard seed used by most tests: one movie with three crew members,
/// one movie with none.
#[must_use]
pub fn default_seed() -> serde_json::Value {
    serde_json::json!({
        "tables": [
            {
                "name": "movies",
                "partitionKey": "movieId",
                "items": [
                    {"movieId": 1, "title": "Heat", "year": 1995, "rating": 8.3},
                    {"movieId": 2, "title": "Ronin", "year": 1998}
                ]
            },
            {
                "name": "movie-crew-ranks",
                "partitionKey": "movieId",
                "sortKey": "crew",
                "items": [
                    {"movieId": 1, "crew": 1, "name": "A. Director"},
                    {"movieId": 1, "crew": 2, "name": "B. Editor"},
                    {"movieId": 1, "crew": 3, "name": "C. Composer"}
                ]
            },
            {
                "name": "movie-crew",
                "partitionKey": "movieId",
                "sortKey": "crew",
                "items": [
                    {"movieId": 1, "crew": 1, "name": "A. Director", "role": "Director", "featured": true},
                    {"movieId": 1, "crew": 2, "name": "B. Editor", "role": "Editor", "featured": false},
                    {"movieId": 1, "crew": 3, "name": "C. Composer", "role": "Composer", "featured": false}
                ]
            }
        ]
    })
}

/// Start the full service on an ephemeral port with the given seed, and
/// return its base URL. The server lives as long as the test's runtime.
pub async fn spawn_server(seed: serde_json::Value) -> String {
    let store = MemoryStore::new();
    let seed: SeedData = serde_json::from_value(seed).expect("valid seed document");
    store.load_seed(seed).expect("load seed");

    let handler = Arc::new(CrewLookupHandler::new(
        Arc::new(store),
        TableConfig::default(),
    ));
    let service = CrewGatewayService::new(handler);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let svc = service.clone();
            tokio::spawn(async move {
                let http = HttpConnBuilder::new(TokioExecutor::new());
                let _ = http.serve_connection(TokioIo::new(stream), svc).await;
            });
        }
    });

    format!("http://{addr}")
}

/// GET a path and return the status code and parsed JSON body.
pub async fn get_json(base: &str, path: &str) -> (u16, serde_json::Value) {
    let response = reqwest::get(format!("{base}{path}"))
        .await
        .expect("request succeeds");
    let status = response.status().as_u16();
    let body = response.json().await.expect("JSON body");
    (status, body)
}
