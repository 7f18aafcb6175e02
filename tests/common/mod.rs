// Shared test helpers; not all items are used by every test binary.
#![allow(unused)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use noterelay::config::Config;
use noterelay::gateway::{GatewayState, build_router};
use noterelay::misskey::SECRET_HEADER;
use noterelay::relay::Relay;
use noterelay::twitter::TwitterClient;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request as MockRequest, Respond, ResponseTemplate};

pub const SECRET: &str = "integration-secret";
pub const UPLOAD_PATH: &str = "/i/media/upload.json";
pub const CREATE_TWEET_PATH: &str = "/graphql/QID/CreateTweet";

/// Minimal PNG signature padded to `len` bytes.
pub fn png_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.resize(len.max(8), 0);
    bytes
}

/// Answers `INIT` with a media id derived from `total_bytes`, so ids are
/// predictable even when uploads run concurrently.
struct IdFromSize;

impl Respond for IdFromSize {
    fn respond(&self, request: &MockRequest) -> ResponseTemplate {
        let size = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "total_bytes")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        ResponseTemplate::new(202).set_body_json(json!({"media_id_string": format!("m{size}")}))
    }
}

/// Mock Twitter + file host. Upload endpoints accept everything; the
/// `CreateTweet` response is supplied by the caller.
pub async fn twitter_mock(create_tweet: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(query_param("command", "INIT"))
        .respond_with(IdFromSize)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(query_param("command", "APPEND"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(query_param("command", "FINALIZE"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"media_id_string": "x"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CREATE_TWEET_PATH))
        .respond_with(create_tweet)
        .mount(&server)
        .await;
    server
}

pub fn tweet_created(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": {"create_tweet": {"tweet_results": {"result": {"rest_id": id}}}}
    }))
}

/// Serve `bytes` at `/files/{name}` and return its URL.
pub async fn host_file(server: &MockServer, name: &str, bytes: Vec<u8>) -> String {
    Mock::given(method("GET"))
        .and(path(format!("/files/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(server)
        .await;
    format!("{}/files/{}", server.uri(), name)
}

pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.misskey.webhook_secret = SECRET.to_string();
    config.twitter.auth_token = "auth".into();
    config.twitter.ct0 = "ct0".into();
    config.twitter.upload_url = format!("{}{}", server.uri(), UPLOAD_PATH);
    config.twitter.graphql_url = format!("{}/graphql", server.uri());
    config.twitter.create_tweet_query_id = "QID".into();
    config
}

pub fn app_for(config: &Config) -> Router {
    let publisher = Arc::new(TwitterClient::new(&config.twitter));
    let relay = Arc::new(Relay::new(config, publisher));
    build_router(GatewayState::new(relay))
}

/// POST a note event to `/` and return status + plain-text reply.
pub async fn deliver(app: Router, secret: &str, note: Value) -> (StatusCode, String) {
    let req = Request::builder()
        .method("POST")
        .uri("/")
        .header(SECRET_HEADER, secret)
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({"type": "note", "body": {"note": note}})).unwrap(),
        ))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 64 * 1024)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Bodies of every `CreateTweet` call the mock received.
pub async fn tweets_sent(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == CREATE_TWEET_PATH)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

/// Number of `INIT` commands the mock received.
pub async fn uploads_started(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| {
            r.url.path() == UPLOAD_PATH && r.url.query_pairs().any(|(k, v)| k == "command" && v == "INIT")
        })
        .count()
}

pub fn tweet_text(body: &Value) -> &str {
    body["variables"]["tweet_text"].as_str().unwrap()
}

pub fn media_ids(body: &Value) -> Vec<String> {
    body["variables"]["media"]["media_entities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["media_id"].as_str().unwrap().to_string())
        .collect()
}
