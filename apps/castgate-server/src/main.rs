//! CastGate server - movie crew lookup gateway.
//!
//! Serves the crew lookup surface over one of two store backends: in-process
//! tables (optionally seeded from a JSON file) or a DynamoDB table service.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:9321 castgate-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:9321` | Bind address |
//! | `TABLE_NAME` | `movie-crew-ranks` | Crew-rank threshold query table |
//! | `MOVIES_TABLE_NAME` | `movies` | Movies table |
//! | `CREW_TABLE_NAME` | `movie-crew` | Cast query table |
//! | `STORE_BACKEND` | `memory` | `memory` or `dynamodb` |
//! | `SEED_DATA` | *(unset)* | Seed file for the memory backend |
//! | `DEFAULT_REGION` | `us-east-1` | Region for the DynamoDB backend |
//! | `DYNAMODB_ENDPOINT` | *(unset)* | Endpoint override for the DynamoDB backend |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use castgate_core::{CastGateConfig, CrewLookupHandler, StoreBackend};
use castgate_http::CrewGatewayService;
use castgate_store::{DocumentStore, DynamoStore, MemoryStore, SeedData, TableSchema};

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config
/// value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the in-process store: register the three configured tables and load
/// the seed file when one is configured.
fn build_memory_store(config: &CastGateConfig) -> Result<MemoryStore> {
    let store = MemoryStore::new();

    store.register_table(TableSchema {
        name: config.tables.rank_table.clone(),
        partition_key: "movieId".to_owned(),
        sort_key: Some("crew".to_owned()),
    });
    store.register_table(TableSchema {
        name: config.tables.movies_table.clone(),
        partition_key: "movieId".to_owned(),
        sort_key: None,
    });
    store.register_table(TableSchema {
        name: config.tables.crew_table.clone(),
        partition_key: "movieId".to_owned(),
        sort_key: Some("crew".to_owned()),
    });

    if let Some(path) = &config.seed_data {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read seed file: {path}"))?;
        let seed: SeedData =
            serde_json::from_str(&raw).with_context(|| format!("invalid seed file: {path}"))?;
        store.load_seed(seed).context("failed to load seed data")?;
        info!(path = %path, "loaded seed data");
    }

    Ok(store)
}

/// Build the DynamoDB-backed store from the shared AWS configuration.
async fn build_dynamo_store(config: &CastGateConfig) -> DynamoStore {
    let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.default_region.clone()))
        .load()
        .await;

    let mut builder = aws_sdk_dynamodb::config::Builder::from(&shared);
    if let Some(endpoint) = &config.dynamodb_endpoint {
        builder = builder.endpoint_url(endpoint);
    }

    DynamoStore::new(aws_sdk_dynamodb::Client::from_conf(builder.build()))
}

/// Run the accept loop, serving connections until a shutdown signal is
/// received.
async fn serve(listener: TcpListener, service: CrewGatewayService) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = CastGateConfig::from_env();
    init_tracing(&config.log_level)?;

    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(build_memory_store(&config)?),
        StoreBackend::DynamoDb => Arc::new(build_dynamo_store(&config).await),
    };
    info!(backend = ?config.store_backend, "initialized store backend");

    let handler = Arc::new(CrewLookupHandler::new(store, config.tables.clone()));
    let service = CrewGatewayService::new(handler);

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, version = VERSION, "starting CastGate server");

    serve(listener, service).await
}
