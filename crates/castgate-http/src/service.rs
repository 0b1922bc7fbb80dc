//! Hyper `Service` implementation for the gateway.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hyper::body::Incoming;
use serde_json::json;
use tracing::info;

use castgate_core::CrewLookupHandler;
use castgate_model::{GatewayEvent, GatewayResponse};

use crate::body::GatewayBody;
use crate::response::to_http_response;
use crate::router::{Route, parse_query, resolve_route};

/// Hyper service that routes gateway requests to the crew lookup handler.
#[derive(Debug, Clone)]
pub struct CrewGatewayService {
    handler: Arc<CrewLookupHandler>,
}

impl CrewGatewayService {
    /// Create a service over a shared handler.
    #[must_use]
    pub fn new(handler: Arc<CrewLookupHandler>) -> Self {
        Self { handler }
    }
}

impl hyper::service::Service<http::Request<Incoming>> for CrewGatewayService {
    type Response = http::Response<GatewayBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(&req, handler.as_ref(), &request_id).await;
            info!(
                method = %req.method(),
                path = req.uri().path(),
                status = response.status().as_u16(),
                request_id = %request_id,
                "handled request",
            );
            Ok(response)
        })
    }
}

/// Process one request through routing and the handler.
///
/// Generic over the body type: the lookup is a GET surface and never reads
/// the request body.
async fn process_request<B>(
    req: &http::Request<B>,
    handler: &CrewLookupHandler,
    request_id: &str,
) -> http::Response<GatewayBody> {
    let route = match resolve_route(req.method(), req.uri().path()) {
        Ok(route) => route,
        Err(err) => {
            let response = GatewayResponse {
                status: err.status_code(),
                body: err.body(),
            };
            return to_http_response(&response, request_id);
        }
    };

    let response = match route {
        Route::Health => GatewayResponse {
            status: http::StatusCode::OK,
            body: json!({"status": "running"}),
        },
        Route::CrewLookup { crew } => {
            let event = GatewayEvent {
                path_parameters: crew
                    .map(|value| HashMap::from([("crew".to_owned(), value)])),
                query_string_parameters: parse_query(req.uri().query()),
            };
            handler.handle(&event).await
        }
    };

    to_http_response(&response, request_id)
}
