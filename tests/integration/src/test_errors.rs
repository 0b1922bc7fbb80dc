//! Error-path tests: the full response table of the lookup contract.

use crate::{default_seed, get_json, spawn_server};

#[tokio::test]
async fn test_should_return_500_when_query_string_absent() {
    let base = spawn_server(default_seed()).await;
    let (status, body) = get_json(&base, "/movies/crew").await;

    assert_eq!(status, 500);
    assert_eq!(body["message"], "Missing query parameters");
}

#[tokio::test]
async fn test_should_return_500_with_schema_on_invalid_parameters() {
    let base = spawn_server(default_seed()).await;
    let (status, body) = get_json(&base, "/movies/crew?movieId=1&featured=maybe").await;

    assert_eq!(status, 500);
    assert_eq!(
        body["message"],
        "Incorrect type. Must match Query parameters schema"
    );
    // The echoed schema is the actual query-parameter schema.
    assert_eq!(body["schema"]["$id"], "CrewRoleQueryParams");
    assert!(body["schema"]["properties"]["featured"].is_object());
}

#[tokio::test]
async fn test_should_return_500_on_unknown_parameter() {
    let base = spawn_server(default_seed()).await;
    let (status, body) = get_json(&base, "/movies/crew?movieId=1&director=x").await;

    assert_eq!(status, 500);
    assert_eq!(
        body["message"],
        "Incorrect type. Must match Query parameters schema"
    );
}

#[tokio::test]
async fn test_should_return_404_when_movie_id_absent() {
    let base = spawn_server(default_seed()).await;
    let (status, body) = get_json(&base, "/movies/crew?featured=true").await;

    assert_eq!(status, 404);
    assert_eq!(body["Message"], "Missing movie Id");
    // Capital-M key only; no lowercase variant.
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_should_return_404_when_movie_id_not_numeric() {
    let base = spawn_server(default_seed()).await;
    let (status, body) = get_json(&base, "/movies/crew?movieId=abc").await;

    assert_eq!(status, 404);
    assert_eq!(body["Message"], "Missing movie Id");
}

#[tokio::test]
async fn test_should_return_404_when_movie_id_is_zero() {
    let base = spawn_server(default_seed()).await;
    let (status, body) = get_json(&base, "/movies/crew?movieId=0").await;

    assert_eq!(status, 404);
    assert_eq!(body["Message"], "Missing movie Id");
}

#[tokio::test]
async fn test_should_return_404_when_movie_not_stored() {
    let base = spawn_server(default_seed()).await;
    let (status, body) = get_json(&base, "/movies/crew?movieId=42").await;

    assert_eq!(status, 404);
    assert_eq!(body["Message"], "Invalid movie Id");
}

#[tokio::test]
async fn test_should_return_404_for_unknown_route() {
    let base = spawn_server(default_seed()).await;
    let (status, body) = get_json(&base, "/unknown").await;

    assert_eq!(status, 404);
    assert_eq!(body["message"], "Not found");
}

#[tokio::test]
async fn test_should_return_405_for_non_get_method() {
    let base = spawn_server(default_seed()).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/movies/crew?movieId=1"))
        .send()
        .await
        .expect("request succeeds");
    assert_eq!(response.status().as_u16(), 405);

    let body: serde_json::Value = response.json().await.expect("JSON body");
    assert_eq!(body["message"], "Method not allowed");
}

#[tokio::test]
async fn test_should_attach_cors_headers_to_every_response() {
    let base = spawn_server(default_seed()).await;

    for path in [
        "/movies/crew?movieId=1",
        "/movies/crew?movieId=42",
        "/movies/crew",
        "/unknown",
    ] {
        let response = reqwest::get(format!("{base}{path}"))
            .await
            .expect("request succeeds");
        let headers = response.headers();
        assert_eq!(
            headers
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*"),
            "missing CORS origin header on {path}",
        );
        assert_eq!(
            headers
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/json"),
            "missing content type on {path}",
        );
        assert!(
            headers.get("x-request-id").is_some(),
            "missing request id on {path}",
        );
    }
}
