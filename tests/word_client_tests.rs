//! Mock HTTP tests for RandomWordClient.

use std::time::Duration;

use handle::words::{RandomWordClient, WordApiError, DEFAULT_WORD_API_URL};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> RandomWordClient {
    RandomWordClient::with_base_url(server.uri()).unwrap()
}

#[test]
fn test_new_uses_public_api() {
    let client = RandomWordClient::new().unwrap();
    assert_eq!(client.base_url(), DEFAULT_WORD_API_URL);
}

#[tokio::test]
async fn test_fetch_word_uppercases() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/word"))
        .and(query_param("length", "5"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec!["crane"]))
        .expect(1)
        .mount(&server)
        .await;

    let word = client_for(&server).fetch_word().await.unwrap();
    assert_eq!(word.as_str(), "CRANE");
}

#[tokio::test]
async fn test_fetch_word_empty_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/word"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<String>::new()))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_word().await;
    assert!(matches!(result, Err(WordApiError::EmptyResponse)));
}

#[tokio::test]
async fn test_fetch_word_rejects_unusable_word() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/word"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec!["don't"]))
        .mount(&server)
        .await;

    let result = client_for(&server).fetch_word().await;
    assert!(matches!(result, Err(WordApiError::InvalidWord(_))));
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/word"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such route"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .fetch_word_with_retry_config(3, Duration::from_millis(1), Duration::from_millis(5))
        .await;

    match result {
        Err(WordApiError::ApiError { status, body }) => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "no such route");
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unavailable_is_retried_then_gives_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/word"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .fetch_word_with_retry_config(2, Duration::from_millis(1), Duration::from_millis(5))
        .await;

    match result {
        Err(WordApiError::NetworkError { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("Expected NetworkError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_retry_recovers_after_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/word"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/word"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec!["slate"]))
        .mount(&server)
        .await;

    let word = client_for(&server)
        .fetch_word_with_retry_config(2, Duration::from_millis(1), Duration::from_millis(5))
        .await
        .unwrap();
    assert_eq!(word.as_str(), "SLATE");
}
