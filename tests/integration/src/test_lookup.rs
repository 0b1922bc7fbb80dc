//! Success-path tests for the crew lookup surface.

use crate::{default_seed, get_json, spawn_server};

#[tokio::test]
async fn test_should_return_movie_and_full_cast() {
    let base = spawn_server(default_seed()).await;
    let (status, body) = get_json(&base, "/movies/crew?movieId=1").await;

    assert_eq!(status, 200);
    assert_eq!(body["data"]["movie"]["movieId"], 1);
    assert_eq!(body["data"]["movie"]["title"], "Heat");

    let cast = body["data"]["cast"].as_array().expect("cast present");
    assert_eq!(cast.len(), 3);
    assert_eq!(cast[0]["name"], "A. Director");
    assert_eq!(cast[0]["role"], "Director");
}

#[tokio::test]
async fn test_should_keep_numeric_fields_numeric_in_response() {
    let base = spawn_server(default_seed()).await;
    let (_, body) = get_json(&base, "/movies/crew?movieId=1").await;

    // Stored numbers must come back as JSON numbers, not strings.
    assert!(body["data"]["movie"]["year"].is_i64());
    assert!(body["data"]["movie"]["rating"].is_f64());
    assert!(body["data"]["cast"][0]["crew"].is_i64());
}

#[tokio::test]
async fn test_should_return_cast_in_rank_order() {
    let base = spawn_server(default_seed()).await;
    let (_, body) = get_json(&base, "/movies/crew?movieId=1").await;

    let ranks: Vec<i64> = body["data"]["cast"]
        .as_array()
        .expect("cast present")
        .iter()
        .filter_map(|role| role["crew"].as_i64())
        .collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_should_not_filter_cast_by_crew_path_parameter() {
    let base = spawn_server(default_seed()).await;

    // The crew segment feeds only the rank query, which never reaches the
    // response body.
    let (status, body) = get_json(&base, "/movies/crew/5?movieId=1").await;
    assert_eq!(status, 200);
    let cast = body["data"]["cast"].as_array().expect("cast present");
    assert_eq!(cast.len(), 3);
}

#[tokio::test]
async fn test_should_return_empty_cast_for_movie_without_crew() {
    let base = spawn_server(default_seed()).await;
    let (status, body) = get_json(&base, "/movies/crew?movieId=2").await;

    assert_eq!(status, 200);
    assert_eq!(body["data"]["movie"]["title"], "Ronin");
    let cast = body["data"]["cast"].as_array().expect("cast present");
    assert!(cast.is_empty());
}

#[tokio::test]
async fn test_should_accept_coercible_query_parameters() {
    let base = spawn_server(default_seed()).await;

    // String-encoded boolean and integer filters validate after coercion.
    let (status, _) = get_json(&base, "/movies/crew?movieId=1&featured=true&crew=2").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_should_ignore_unparseable_crew_segment() {
    let base = spawn_server(default_seed()).await;
    let (status, _) = get_json(&base, "/movies/crew/chief?movieId=1").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_should_serve_health_probe() {
    let base = spawn_server(default_seed()).await;
    let (status, body) = get_json(&base, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "running");
}
