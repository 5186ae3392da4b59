// tests/profile_tests.rs

mod common;

use common::{WithToken, error_message, read, spawn_app};

#[tokio::test]
async fn follow_and_unfollow_round_trip() {
    let app = spawn_app().await;
    let jake = app.register("jake").await;
    app.register("celeb").await;

    let response = app
        .post("/api/profiles/celeb/follow")
        .token(&jake)
        .send()
        .await
        .unwrap();
    let (status, body) = read(response).await;
    assert_eq!(status, 200);
    assert_eq!(body["profile"]["username"], "celeb");
    assert_eq!(body["profile"]["following"], true);

    let response = app.get("/api/profiles/celeb").token(&jake).send().await.unwrap();
    let (_, body) = read(response).await;
    assert_eq!(body["profile"]["following"], true);

    let response = app
        .delete("/api/profiles/celeb/follow")
        .token(&jake)
        .send()
        .await
        .unwrap();
    let (status, body) = read(response).await;
    assert_eq!(status, 200);
    assert_eq!(body["profile"]["following"], false);
}

#[tokio::test]
async fn following_twice_is_rejected() {
    let app = spawn_app().await;
    let jake = app.register("jake").await;
    app.register("celeb").await;

    let first = app
        .post("/api/profiles/celeb/follow")
        .token(&jake)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 200);

    let second = app
        .post("/api/profiles/celeb/follow")
        .token(&jake)
        .send()
        .await
        .unwrap();
    let (status, body) = read(second).await;
    assert_eq!(status, 422);
    assert_eq!(error_message(&body), "User is already following this followee");
}

#[tokio::test]
async fn unfollowing_without_following_is_rejected() {
    let app = spawn_app().await;
    let jake = app.register("jake").await;
    app.register("celeb").await;

    let response = app
        .delete("/api/profiles/celeb/follow")
        .token(&jake)
        .send()
        .await
        .unwrap();
    let (status, body) = read(response).await;
    assert_eq!(status, 422);
    assert_eq!(error_message(&body), "User is not following this followee");
}

#[tokio::test]
async fn anonymous_viewer_sees_following_false() {
    let app = spawn_app().await;
    let jake = app.register("jake").await;
    app.register("celeb").await;
    app.post("/api/profiles/celeb/follow")
        .token(&jake)
        .send()
        .await
        .unwrap();

    let response = app.get("/api/profiles/celeb").send().await.unwrap();
    let (status, body) = read(response).await;
    assert_eq!(status, 200);
    assert_eq!(body["profile"]["following"], false);
}

#[tokio::test]
async fn unknown_profile_is_404_and_follow_needs_login() {
    let app = spawn_app().await;
    let jake = app.register("jake").await;

    let response = app.get("/api/profiles/ghost").send().await.unwrap();
    let (status, body) = read(response).await;
    assert_eq!(status, 404);
    assert!(body["errors"]["body"].is_array());

    let response = app
        .post("/api/profiles/ghost/follow")
        .token(&jake)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = app.post("/api/profiles/jake/follow").send().await.unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .post("/api/profiles/jake/follow")
        .token(&jake)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);
}
