use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use viewtube_platform::{Config, Database, MemoryDatabase, Platform};
use viewtube_server::{create_app, ServerContext};

fn app() -> Router {
    let database: Arc<dyn Database> = Arc::new(MemoryDatabase::new());

    let config = Config {
        port: 0,
        database_url: String::new(),
        jwt_secret: "test-secret".to_string(),
    };

    let platform = Arc::new(Platform::new(database, &config));

    create_app(ServerContext { platform })
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request is built");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request is handled");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body is read")
        .to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is json")
    };

    (status, value)
}

async fn register_and_login(app: &Router, username: &str, email: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": username, "email": email, "password": "secret1" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful.");

    body["token"].as_str().expect("login returns a token").to_string()
}

async fn create_channel(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/channels",
        Some(token),
        Some(json!({ "channelName": name })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);

    body["channel"]["id"].as_i64().expect("channel has an id")
}

async fn create_video(app: &Router, token: &str, channel_id: i64, title: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/videos",
        Some(token),
        Some(json!({
            "title": title,
            "thumbnailUrl": "u1",
            "videoUrl": "u2",
            "category": "Tech",
            "channelId": channel_id,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Video created successfully.");

    body["video"]["id"].as_i64().expect("video has an id")
}

#[tokio::test]
async fn health_check_responds() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_login_upload_and_list() {
    let app = app();

    let token = register_and_login(&app, "Bob", "bob@x.com").await;
    let channel_id = create_channel(&app, &token, "Bob's Lab").await;
    let video_id = create_video(&app, &token, channel_id, "T").await;

    let (status, body) = send(&app, Method::GET, "/api/videos?category=Tech", None, None).await;

    assert_eq!(status, StatusCode::OK);

    let listed = body.as_array().expect("listing is an array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"].as_i64(), Some(video_id));
    assert_eq!(listed[0]["channel"]["channelName"], "Bob's Lab");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = app();

    register_and_login(&app, "Bob", "bob@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "Imposter", "email": "bob@x.com", "password": "hunter22" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already registered. Please login instead.");
}

#[tokio::test]
async fn failed_logins_are_indistinguishable() {
    let app = app();

    register_and_login(&app, "Bob", "bob@x.com").await;

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "bob@x.com", "password": "wrong-password" })),
    )
    .await;

    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "nobody@x.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, wrong_status);
    assert_eq!(wrong_body["message"], unknown_body["message"]);
}

#[tokio::test]
async fn me_returns_the_profile_with_channels() {
    let app = app();

    let token = register_and_login(&app, "Bob", "bob@x.com").await;
    let channel_id = create_channel(&app, &token, "Bob's Lab").await;

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "Bob");
    assert_eq!(body["user"]["channels"], json!([channel_id]));
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn protected_routes_reject_missing_tokens() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/channels",
        None,
        Some(json!({ "channelName": "No token" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/videos/1/like",
        Some("garbage-token"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn every_fetch_counts_as_a_view() {
    let app = app();

    let token = register_and_login(&app, "Bob", "bob@x.com").await;
    let channel_id = create_channel(&app, &token, "Bob's Lab").await;
    let video_id = create_video(&app, &token, channel_id, "T").await;

    let uri = format!("/api/videos/{video_id}");

    for expected in 1..=3 {
        let (status, body) = send(&app, Method::GET, &uri, None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["views"].as_i64(), Some(expected));
    }
}

#[tokio::test]
async fn like_then_dislike_then_like_counts_once() {
    let app = app();

    let token = register_and_login(&app, "Bob", "bob@x.com").await;
    let channel_id = create_channel(&app, &token, "Bob's Lab").await;
    let video_id = create_video(&app, &token, channel_id, "T").await;

    let like = format!("/api/videos/{video_id}/like");
    let dislike = format!("/api/videos/{video_id}/dislike");

    send(&app, Method::POST, &like, Some(&token), None).await;
    send(&app, Method::POST, &dislike, Some(&token), None).await;
    let (status, body) = send(&app, Method::POST, &like, Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Video liked.");
    assert_eq!(body["likesCount"].as_i64(), Some(1));
    assert_eq!(body["dislikesCount"].as_i64(), Some(0));
}

#[tokio::test]
async fn only_the_uploader_may_modify_a_video() {
    let app = app();

    let owner = register_and_login(&app, "Bob", "bob@x.com").await;
    let channel_id = create_channel(&app, &owner, "Bob's Lab").await;
    let video_id = create_video(&app, &owner, channel_id, "T").await;

    let stranger = register_and_login(&app, "Eve", "eve@x.com").await;

    let uri = format!("/api/videos/{video_id}");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&stranger),
        Some(json!({ "title": "Defaced" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You can only edit your own videos.");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&stranger), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleted_videos_leave_listings_but_not_comments() {
    let app = app();

    let token = register_and_login(&app, "Bob", "bob@x.com").await;
    let channel_id = create_channel(&app, &token, "Bob's Lab").await;
    let video_id = create_video(&app, &token, channel_id, "T").await;

    let comments_uri = format!("/api/comments/video/{video_id}");

    let (status, _) = send(
        &app,
        Method::POST,
        &comments_uri,
        Some(&token),
        Some(json!({ "text": "first!" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/videos/{video_id}"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&app, Method::GET, "/api/videos", None, None).await;
    assert_eq!(listed.as_array().map(|a| a.len()), Some(0));

    let (_, channel_videos) = send(
        &app,
        Method::GET,
        &format!("/api/channels/{channel_id}/videos"),
        None,
        None,
    )
    .await;
    assert_eq!(channel_videos.as_array().map(|a| a.len()), Some(0));

    // Comments are orphaned, not removed
    let (_, comments) = send(&app, Method::GET, &comments_uri, None, None).await;
    assert_eq!(comments.as_array().map(|a| a.len()), Some(1));
}

#[tokio::test]
async fn comment_lifecycle() {
    let app = app();

    let token = register_and_login(&app, "Bob", "bob@x.com").await;
    let channel_id = create_channel(&app, &token, "Bob's Lab").await;
    let video_id = create_video(&app, &token, channel_id, "T").await;

    let comments_uri = format!("/api/comments/video/{video_id}");

    let (status, body) = send(
        &app,
        Method::POST,
        &comments_uri,
        Some(&token),
        Some(json!({ "text": "nice video" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment"]["user"]["username"], "Bob");

    let comment_id = body["comment"]["id"].as_i64().expect("comment has an id");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/comments/{comment_id}"),
        Some(&token),
        Some(json!({ "text": "edited" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["comment"]["text"], "edited");

    let stranger = register_and_login(&app, "Eve", "eve@x.com").await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/comments/{comment_id}"),
        Some(&stranger),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/comments/{comment_id}"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Comment deleted.");
}

#[tokio::test]
async fn channel_page_is_public_and_populated() {
    let app = app();

    let token = register_and_login(&app, "Bob", "bob@x.com").await;
    let channel_id = create_channel(&app, &token, "Bob's Lab").await;
    create_video(&app, &token, channel_id, "T").await;

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/channels/{channel_id}"),
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["channelName"], "Bob's Lab");
    assert_eq!(body["owner"]["username"], "Bob");
    assert_eq!(body["videos"].as_array().map(|a| a.len()), Some(1));
    assert_eq!(body["subscribers"].as_i64(), Some(0));

    let (status, body) = send(&app, Method::GET, "/api/channels/999", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Channel not found.");
}

#[tokio::test]
async fn upload_requires_owning_the_channel() {
    let app = app();

    let owner = register_and_login(&app, "Bob", "bob@x.com").await;
    let channel_id = create_channel(&app, &owner, "Bob's Lab").await;

    let stranger = register_and_login(&app, "Eve", "eve@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/videos",
        Some(&stranger),
        Some(json!({
            "title": "T",
            "thumbnailUrl": "u1",
            "videoUrl": "u2",
            "category": "Tech",
            "channelId": channel_id,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "You can only upload videos to your own channel."
    );
}
