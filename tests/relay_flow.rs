mod common;

use axum::http::StatusCode;
use common::{
    SECRET, app_for, config_for, deliver, host_file, media_ids, png_bytes, tweet_created,
    tweet_text, tweets_sent, twitter_mock, uploads_started,
};
use noterelay::config::VideoStrategy;
use serde_json::json;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn test_two_pngs_are_uploaded_in_order() {
    let server = twitter_mock(tweet_created("100")).await;
    let a = host_file(&server, "a.png", png_bytes(10)).await;
    let b = host_file(&server, "b.png", png_bytes(20)).await;
    let app = app_for(&config_for(&server));

    let (status, reply) = deliver(
        app,
        SECRET,
        json!({
            "text": "hello",
            "visibility": "public",
            "files": [{"url": a, "type": "image/png"}, {"url": b, "type": "image/png"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply, "successfully tweeted");
    let tweets = tweets_sent(&server).await;
    assert_eq!(tweets.len(), 1);
    assert_eq!(tweet_text(&tweets[0]), "hello");
    assert_eq!(media_ids(&tweets[0]), vec!["m10", "m20"]);
}

#[tokio::test]
async fn test_fifth_image_is_linked() {
    let server = twitter_mock(tweet_created("101")).await;
    let mut files = Vec::new();
    for i in 1..=5 {
        let url = host_file(&server, &format!("{i}.png"), png_bytes(i * 10)).await;
        files.push(json!({"url": url, "type": "image/png"}));
    }
    let fifth = files[4]["url"].as_str().unwrap().to_string();
    let app = app_for(&config_for(&server));

    let (status, _) = deliver(app, SECRET, json!({"visibility": "home", "files": files})).await;

    assert_eq!(status, StatusCode::OK);
    let tweets = tweets_sent(&server).await;
    assert_eq!(tweet_text(&tweets[0]), format!("\n🖼 {fifth}"));
    assert_eq!(media_ids(&tweets[0]), vec!["m10", "m20", "m30", "m40"]);
    assert_eq!(uploads_started(&server).await, 4);
}

#[tokio::test]
async fn test_png_and_mp4_uploads_png_and_excludes_video() {
    let server = twitter_mock(tweet_created("102")).await;
    let png = host_file(&server, "p.png", png_bytes(16)).await;
    let mp4 = format!("{}/files/v.mp4", server.uri());
    let app = app_for(&config_for(&server));

    let (status, _) = deliver(
        app,
        SECRET,
        json!({
            "text": "clip",
            "visibility": "public",
            "files": [{"url": png, "type": "image/png"}, {"url": mp4, "type": "video/mp4"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let tweets = tweets_sent(&server).await;
    let text = tweet_text(&tweets[0]);
    assert_eq!(text, format!("clip\n🖼 {png}"));
    assert!(!text.contains("v.mp4"));
    assert_eq!(media_ids(&tweets[0]), vec!["m16"]);
}

#[tokio::test]
async fn test_prefer_video_uploads_the_video() {
    let server = twitter_mock(tweet_created("103")).await;
    let png = host_file(&server, "p.png", png_bytes(16)).await;
    let mp4 = host_file(&server, "v.mp4", vec![0u8; 64]).await;
    let mut config = config_for(&server);
    config.relay.video_strategy = VideoStrategy::PreferVideo;
    let app = app_for(&config);

    let (status, _) = deliver(
        app,
        SECRET,
        json!({
            "text": "clip",
            "visibility": "public",
            "files": [{"url": png, "type": "image/png"}, {"url": mp4, "type": "video/mp4"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let tweets = tweets_sent(&server).await;
    assert_eq!(tweet_text(&tweets[0]), format!("clip\n🖼 {png}"));
    assert_eq!(media_ids(&tweets[0]), vec!["m64"]);
}

#[tokio::test]
async fn test_content_warning_prefixes_text() {
    let server = twitter_mock(tweet_created("104")).await;
    let app = app_for(&config_for(&server));

    let (status, _) = deliver(
        app,
        SECRET,
        json!({"cw": "spoilers", "text": "the butler did it", "visibility": "public"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let tweets = tweets_sent(&server).await;
    assert_eq!(tweet_text(&tweets[0]), "spoilers...\n\nthe butler did it");
    assert!(media_ids(&tweets[0]).is_empty());
}

#[tokio::test]
async fn test_rejections_never_reach_twitter() {
    let server = twitter_mock(tweet_created("105")).await;
    let png = host_file(&server, "p.png", png_bytes(16)).await;
    let config = config_for(&server);

    let cases = [
        ("wrong", json!({"text": "x", "visibility": "public"}), "wrong secret"),
        (
            SECRET,
            json!({"text": "x", "visibility": "public", "localOnly": true, "files": [{"url": png, "type": "image/png"}]}),
            "post visibility: \"local only\"",
        ),
        (
            SECRET,
            json!({"text": "x", "visibility": "followers"}),
            "post visibility: \"followers\"",
        ),
        (SECRET, json!({"visibility": "public"}), "empty content"),
    ];
    for (secret, note, expected) in cases {
        let (status, reply) = deliver(app_for(&config), secret, note).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(reply, expected);
    }

    assert!(tweets_sent(&server).await.is_empty());
    assert_eq!(uploads_started(&server).await, 0);
}

#[tokio::test]
async fn test_failed_upload_aborts_before_tweeting() {
    let server = twitter_mock(tweet_created("106")).await;
    let good = host_file(&server, "good.png", png_bytes(16)).await;
    let missing = format!("{}/files/missing.png", server.uri());
    let app = app_for(&config_for(&server));

    let (status, reply) = deliver(
        app,
        SECRET,
        json!({
            "text": "two pics",
            "visibility": "public",
            "files": [{"url": good, "type": "image/png"}, {"url": missing, "type": "image/png"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(reply, "error while uploading media");
    assert!(tweets_sent(&server).await.is_empty());
}

#[tokio::test]
async fn test_rejected_tweet_is_403() {
    let server = twitter_mock(ResponseTemplate::new(200).set_body_json(json!({
        "errors": [{"message": "Authorization: denied by access control", "code": 37}]
    })))
    .await;
    let app = app_for(&config_for(&server));

    let (status, reply) =
        deliver(app, SECRET, json!({"text": "hello", "visibility": "public"})).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(reply, "error while tweeting");
    assert_eq!(tweets_sent(&server).await.len(), 1);
}
