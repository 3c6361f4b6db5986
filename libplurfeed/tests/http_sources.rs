//! HTTP-level tests for the Twitter and Instagram sources
//!
//! Each test points a source at a local wiremock server and checks the
//! request it sends and how the response is normalized.

use chrono::{TimeZone, Utc};
use libplurfeed::config::{FeedConfig, InstagramConfig, TwitterConfig};
use libplurfeed::error::PlatformError;
use libplurfeed::platforms::instagram::InstagramClient;
use libplurfeed::platforms::twitter::TwitterClient;
use libplurfeed::platforms::FeedSource;
use libplurfeed::{Platform, PlurfeedError};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn secret(value: &str) -> Option<SecretString> {
    Some(SecretString::from(value.to_string()))
}

fn twitter_client(server: &MockServer) -> TwitterClient {
    let config = TwitterConfig {
        consumer_key: secret("consumer-key"),
        consumer_secret: secret("consumer-secret"),
        access_token: secret("access-token"),
        access_token_secret: secret("access-token-secret"),
        base_url: Some(server.uri()),
    };
    TwitterClient::from_config(config, &FeedConfig::default()).unwrap()
}

fn instagram_client(server: &MockServer) -> InstagramClient {
    let config = InstagramConfig {
        access_token: secret("ig-token"),
        base_url: Some(server.uri()),
    };
    InstagramClient::from_config(config, &FeedConfig::default()).unwrap()
}

#[tokio::test]
async fn test_twitter_fetch_sends_signed_timeline_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/statuses/home_timeline.json"))
        .and(query_param("count", "2"))
        .and(query_param("tweet_mode", "extended"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id_str": "20",
                "full_text": "newer",
                "created_at": "Mon Jan 01 11:00:00 +0000 2024",
                "user": { "screen_name": "amy" }
            },
            {
                "id_str": "10",
                "full_text": "older",
                "created_at": "Mon Jan 01 09:00:00 +0000 2024",
                "user": { "screen_name": "bob" }
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let posts = twitter_client(&server).fetch(2).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id(), "20");
    assert_eq!(posts[0].author(), Some("amy"));
    assert_eq!(posts[1].id(), "10");
    assert_eq!(posts[1].text(), "older");
    assert_eq!(
        posts[1].timestamp(),
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    );

    let requests = server.received_requests().await.unwrap();
    let authorization = requests[0]
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(authorization.starts_with("OAuth "));
    assert!(authorization.contains("oauth_consumer_key=\"consumer-key\""));
    assert!(authorization.contains("oauth_token=\"access-token\""));
    assert!(authorization.contains("oauth_signature=\""));
    assert!(!authorization.contains("consumer-secret"));
}

#[tokio::test]
async fn test_twitter_unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/statuses/home_timeline.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"errors":[{"code":32,"message":"Could not authenticate you."}]}"#,
        ))
        .mount(&server)
        .await;

    let error = twitter_client(&server).fetch(20).await.unwrap_err();
    match &error {
        PlurfeedError::Platform(PlatformError::Authentication(msg)) => {
            assert!(msg.contains("401"));
            assert!(msg.contains("Could not authenticate you."));
        }
        other => panic!("Expected authentication error, got {:?}", other),
    }
    assert_eq!(error.exit_code(), 2);
}

#[tokio::test]
async fn test_twitter_malformed_timestamp_aborts_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/statuses/home_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id_str": "1",
                "full_text": "fine",
                "created_at": "Mon Jan 01 11:00:00 +0000 2024",
                "user": { "screen_name": "amy" }
            },
            {
                "id_str": "2",
                "full_text": "broken",
                "created_at": "yesterday",
                "user": { "screen_name": "amy" }
            }
        ])))
        .mount(&server)
        .await;

    let result = twitter_client(&server).fetch(20).await;
    assert!(matches!(
        result,
        Err(PlurfeedError::Platform(PlatformError::Parse(_)))
    ));
}

#[tokio::test]
async fn test_instagram_fetch_sends_bounded_page_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/media"))
        .and(query_param("fields", "id,caption,media_url,timestamp"))
        .and(query_param("access_token", "ig-token"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "id": "42",
                    "caption": null,
                    "media_url": "http://x/y",
                    "timestamp": "2024-01-01T12:00:00Z"
                },
                {
                    "id": "41",
                    "caption": "beach day",
                    "media_url": "http://x/z",
                    "timestamp": "2023-12-31T08:30:00+0000"
                }
            ],
            "paging": { "cursors": { "before": "a", "after": "b" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let posts = instagram_client(&server).fetch(5).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p.platform() == Platform::Media));
    assert_eq!(posts[0].text(), "");
    assert_eq!(posts[0].author(), None);
    assert_eq!(posts[0].media_url(), Some("http://x/y"));
    assert_eq!(
        posts[0].timestamp(),
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    );
    assert_eq!(posts[1].text(), "beach day");
    assert_eq!(
        posts[1].timestamp(),
        Utc.with_ymd_and_hms(2023, 12, 31, 8, 30, 0).unwrap()
    );
}

#[tokio::test]
async fn test_instagram_empty_body_yields_no_posts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/media"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(instagram_client(&server).fetch(20).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_instagram_server_error_maps_to_response_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/media"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    match instagram_client(&server).fetch(20).await {
        Err(PlurfeedError::Platform(PlatformError::Response(msg))) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("upstream down"));
        }
        other => panic!("Expected response error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_instagram_invalid_json_maps_to_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/media"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string("{\"data\": [oops"),
        )
        .mount(&server)
        .await;

    let error = instagram_client(&server).fetch(20).await.unwrap_err();
    assert!(matches!(
        error,
        PlurfeedError::Platform(PlatformError::Parse(_))
    ));
    assert!(!error.to_string().contains("ig-token"));
}

#[tokio::test]
async fn test_unreachable_host_maps_to_network_error() {
    let config = InstagramConfig {
        access_token: secret("ig-token"),
        base_url: Some("http://127.0.0.1:1".to_string()),
    };
    let feed = FeedConfig {
        limit: 20,
        timeout_secs: 2,
    };
    let client = InstagramClient::from_config(config, &feed).unwrap();

    match client.fetch(20).await {
        Err(PlurfeedError::Platform(PlatformError::Network(msg))) => {
            assert!(msg.contains("Instagram"));
            assert!(!msg.contains("ig-token"));
        }
        other => panic!("Expected network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_configured_timeout_bounds_slow_responses() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1.1/statuses/home_timeline.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = TwitterConfig {
        consumer_key: secret("consumer-key"),
        consumer_secret: secret("consumer-secret"),
        access_token: secret("access-token"),
        access_token_secret: secret("access-token-secret"),
        base_url: Some(server.uri()),
    };
    let feed = FeedConfig {
        limit: 20,
        timeout_secs: 1,
    };
    let client = TwitterClient::from_config(config, &feed).unwrap();

    let started = std::time::Instant::now();
    match client.fetch(20).await {
        Err(PlurfeedError::Platform(PlatformError::Network(msg))) => {
            assert!(msg.contains("timed out"), "unexpected message: {}", msg);
        }
        other => panic!("Expected network timeout, got {:?}", other),
    }
    assert!(started.elapsed() < std::time::Duration::from_secs(4));
}
