//! Response rendering.
//!
//! Every response, whether success or error, goes through
//! [`to_http_response`], so the header set never varies by path.

use castgate_model::GatewayResponse;

use crate::body::GatewayBody;

/// Content type of all gateway responses.
pub const CONTENT_TYPE: &str = "application/json";

/// Allowed origins for cross-origin requests.
pub const CORS_ALLOW_ORIGIN: &str = "*";

/// Allowed headers for cross-origin requests.
pub const CORS_ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";

/// Render a gateway response as an HTTP response with the uniform header
/// set.
#[must_use]
pub fn to_http_response(
    response: &GatewayResponse,
    request_id: &str,
) -> http::Response<GatewayBody> {
    let json = serde_json::to_vec(&response.body)
        .expect("serializing a JSON value cannot fail");

    let mut http_response = http::Response::builder()
        .status(response.status)
        .header("content-type", CONTENT_TYPE)
        .header("access-control-allow-origin", CORS_ALLOW_ORIGIN)
        .header("access-control-allow-headers", CORS_ALLOW_HEADERS)
        .body(GatewayBody::from_json(json))
        .expect("valid gateway response");

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        http_response.headers_mut().insert("x-request-id", hv);
    }

    http_response
}
