mod common;

use common::{api_for, failed, ok, practice};
use mindsetkit_client::ApiError;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn success_yields_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/practices/Practice_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(practice(1))))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let found = api.practices().find_by_id("Practice_1").await.unwrap();
    assert_eq!(found.uid, "Practice_1");
    assert_eq!(found.short_uid.as_deref(), Some("p1"));
}

#[tokio::test]
async fn error_flag_becomes_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/practices/Practice_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(failed("nope")))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .practices()
        .find_by_id("Practice_1")
        .await
        .unwrap_err();
    assert!(matches!(&err, ApiError::Application { message } if message == "nope"));
}

#[tokio::test]
async fn non_success_status_carries_envelope_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/practices/Practice_1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(failed("not yours")))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .practices()
        .delete("Practice_1")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(err.message(), Some("not yours"));
}

#[tokio::test]
async fn non_success_status_falls_back_to_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/practices/popular"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .practices()
        .fetch_popular()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.message(), Some("Internal Server Error"));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/practices/Practice_1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .practices()
        .find_by_id("Practice_1")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn data_of_the_wrong_shape_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/practices/Practice_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!("not a practice"))))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .practices()
        .find_by_id("Practice_1")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let config = mindsetkit_client::ClientConfig::new("http://127.0.0.1:1").unwrap();
    let api = mindsetkit_client::MskApi::new(config).unwrap();

    let err = api.practices().fetch_popular().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn malformed_uid_never_reaches_the_wire() {
    let server = MockServer::start().await;
    let api = api_for(&server);

    let err = api.practices().delete("Lesson_1").await.unwrap_err();
    assert!(err.is_contract_violation());
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}
