mod common;

use std::time::Duration;

use common::{
    CHAT_PATH, FORECAST_PATH, GEOCODE_PATH, fast_retry, forecast_payload, geocode_payload, london,
    requests_to,
};
use skyline_weather::{
    data::{
        chat::{ChatBackend, ChatClient, ChatError},
        client::{ApiError, RetryPolicy},
        forecast::ForecastClient,
        geocode::{GeocodeClient, is_ambiguous},
    },
    domain::{chat::ChatRole, weather::Units},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path, query_param},
};

fn forecast_client(server: &MockServer) -> ForecastClient {
    ForecastClient::with_base_url(format!("{}{FORECAST_PATH}", server.uri())).with_retry(fast_retry())
}

fn geocode_client(server: &MockServer) -> GeocodeClient {
    GeocodeClient::with_base_url(format!("{}{GEOCODE_PATH}", server.uri())).with_retry(fast_retry())
}

fn chat_client(server: &MockServer) -> ChatClient {
    ChatClient::with_base_url(format!("{}/v1beta", server.uri()), Some("test-key".to_string()))
        .with_model("test-model")
}

#[tokio::test]
async fn forecast_request_carries_unit_and_horizon_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("latitude", "51.50853"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .and(query_param("wind_speed_unit", "mph"))
        .and(query_param("precipitation_unit", "inch"))
        .and(query_param("timezone", "auto"))
        .and(query_param("forecast_days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_payload(64.0)))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = forecast_client(&server)
        .fetch(&london(), Units::imperial(), 7)
        .await
        .expect("forecast");

    assert_eq!(snapshot.day_count(), 7);
    assert_eq!(
        snapshot.current.as_ref().and_then(|c| c.temperature_2m),
        Some(64.0)
    );
    assert_eq!(snapshot.hours_for_day(2).len(), 24);
}

#[tokio::test]
async fn forecast_retries_server_errors_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    common::mount_forecast(&server, forecast_payload(18.4)).await;

    let snapshot = forecast_client(&server)
        .fetch(&london(), Units::metric(), 7)
        .await
        .expect("third attempt succeeds");

    assert_eq!(snapshot.day_count(), 7);
    assert_eq!(requests_to(&server, FORECAST_PATH).await, 3);
}

#[tokio::test]
async fn forecast_gives_up_after_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = forecast_client(&server)
        .fetch(&london(), Units::metric(), 7)
        .await
        .expect_err("rate limited");

    assert_eq!(err, ApiError::RateLimited);
    assert_eq!(requests_to(&server, FORECAST_PATH).await, 3);
}

#[tokio::test]
async fn forecast_client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let err = forecast_client(&server)
        .fetch(&london(), Units::metric(), 7)
        .await
        .expect_err("bad request");

    assert!(matches!(err, ApiError::Unknown { status: Some(400), .. }));
    assert!(!err.is_retryable());
    assert_eq!(requests_to(&server, FORECAST_PATH).await, 1);
}

#[tokio::test]
async fn malformed_forecast_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let err = ForecastClient::with_base_url(format!("{}{FORECAST_PATH}", server.uri()))
        .with_retry(RetryPolicy::none())
        .fetch(&london(), Units::metric(), 7)
        .await
        .expect_err("decode");
    assert_eq!(err, ApiError::Decode);
}

#[tokio::test]
async fn geocode_ranks_exact_names_by_population() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .and(query_param("name", "London"))
        .and(query_param("count", "5"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_payload()))
        .mount(&server)
        .await;

    let ranked = geocode_client(&server)
        .search("  London ", 5)
        .await
        .expect("search");

    let ids: Vec<u64> = ranked.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![2_643_743, 6_058_560, 2_643_734]);
    assert_eq!(ranked[0].display_name(), "London, England, United Kingdom");
    assert!(!is_ambiguous("London", &ranked));
}

#[tokio::test]
async fn geocode_close_populations_are_ambiguous() {
    let server = MockServer::start().await;
    common::mount_geocode(&server, common::springfield_payload()).await;

    let ranked = geocode_client(&server)
        .search("Springfield", 5)
        .await
        .expect("search");

    assert_eq!(ranked[0].admin1.as_deref(), Some("Missouri"));
    assert!(is_ambiguous("Springfield", &ranked));
}

#[tokio::test]
async fn geocode_without_results_is_empty() {
    let server = MockServer::start().await;
    common::mount_geocode(&server, serde_json::json!({ "generationtime_ms": 0.4 })).await;

    let ranked = geocode_client(&server)
        .search("Qqqzx", 5)
        .await
        .expect("absent results are not an error");
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn short_geocode_query_never_hits_network() {
    let server = MockServer::start().await;
    common::mount_geocode(&server, geocode_payload()).await;

    let ranked = geocode_client(&server).search(" L ", 5).await.expect("search");

    assert!(ranked.is_empty());
    assert_eq!(requests_to(&server, GEOCODE_PATH).await, 0);
}

#[tokio::test]
async fn chat_sends_primed_conversation_with_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": {
                "topK": 40,
                "maxOutputTokens": 1024
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "Bring an umbrella" }, { "text": " after lunch." }]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = [
        (ChatRole::User, "Is it cold?"),
        (ChatRole::Assistant, "Not really."),
    ];
    let reply = chat_client(&server)
        .complete("You are a weather assistant.", &history, "Will it rain?")
        .await
        .expect("reply");
    assert_eq!(reply, "Bring an umbrella after lunch.");

    let requests = server.received_requests().await.unwrap_or_default();
    let body: serde_json::Value = requests[0].body_json().expect("json body");
    let contents = body["contents"].as_array().expect("contents");
    let roles: Vec<&str> = contents
        .iter()
        .filter_map(|c| c["role"].as_str())
        .collect();
    assert_eq!(roles, vec!["user", "model", "user", "model", "user"]);
    assert_eq!(
        contents[0]["parts"][0]["text"],
        "You are a weather assistant."
    );
    assert_eq!(contents[4]["parts"][0]["text"], "Will it rain?");
}

#[tokio::test]
async fn chat_failures_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = chat_client(&server)
        .complete("prompt", &[], "hello")
        .await
        .expect_err("server error");

    assert_eq!(err, ChatError::Api(ApiError::Server { status: 500 }));
    assert_eq!(requests_to(&server, CHAT_PATH).await, 1);
}

#[tokio::test]
async fn chat_without_candidates_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let err = chat_client(&server)
        .complete("prompt", &[], "hello")
        .await
        .expect_err("empty");
    assert_eq!(err, ChatError::EmptyResponse);
}

#[tokio::test]
async fn slow_chat_reply_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "candidates": [{ "content": { "parts": [{ "text": "Too late." }] } }]
                }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let err = chat_client(&server)
        .with_timeout(Duration::from_millis(50))
        .complete("prompt", &[], "hello")
        .await
        .expect_err("timed out");

    assert_eq!(err, ChatError::Api(ApiError::Network));
}
