//! Painting catalogue: pricing, updates, soft delete, comments and likes.

mod common;

use axum::http::Method;
use common::{decimal, response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn final_price_applies_discount_on_add_and_update() {
    let app = TestApp::new().await;
    let artist_id = app.seed_artist().await;
    let painting_id = app.seed_painting(&artist_id, 1000, 10).await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/paintings/getById/{painting_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(decimal(&body["finalPrice"]), dec!(900));
    assert_eq!(body["theme"], "General");
    assert_eq!(body["stock"], 1);
    assert_eq!(body["artist"]["name"], "Asha");

    let response = app
        .request(
            Method::PUT,
            &format!("/api/paintings/updateById/{painting_id}"),
            Some(json!({ "discount": 25 })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Painting updated successfully");
    assert_eq!(decimal(&body["painting"]["finalPrice"]), dec!(750));
}

#[tokio::test]
async fn add_requires_core_fields_and_valid_season() {
    let app = TestApp::new().await;
    let artist_id = app.seed_artist().await;

    let response = app
        .request(
            Method::POST,
            "/api/paintings/add",
            Some(json!({ "title": "Untitled", "artistId": artist_id })),
        )
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(
        response_json(response).await["message"],
        "All required fields must be provided."
    );

    let response = app
        .request(
            Method::POST,
            "/api/paintings/add",
            Some(json!({
                "title": "Untitled",
                "description": "Study",
                "imageURLs": ["https://img.example/u.jpg"],
                "price": 500,
                "seasonOrFestival": "Monsoon",
                "artistId": artist_id,
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .request(
            Method::POST,
            "/api/paintings/add",
            Some(json!({
                "title": "Untitled",
                "description": "Study",
                "imageURLs": ["https://img.example/u.jpg"],
                "price": 500,
                "discount": 120,
                "seasonOrFestival": "Diwali",
                "artistId": artist_id,
            })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn soft_deleted_paintings_leave_the_catalogue() {
    let app = TestApp::new().await;
    let artist_id = app.seed_artist().await;
    let kept = app.seed_painting(&artist_id, 800, 0).await;
    let removed = app.seed_painting(&artist_id, 1200, 5).await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/paintings/deleteById/{removed}"),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        response_json(response).await["message"],
        "Painting deleted successfully"
    );

    let listed = response_json(app.request(Method::GET, "/api/paintings/getAll", None).await).await;
    let listed = listed.as_array().expect("painting list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], kept);

    let response = app
        .request(
            Method::GET,
            &format!("/api/paintings/getById/{removed}"),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn comments_and_likes() {
    let app = TestApp::new().await;
    let artist_id = app.seed_artist().await;
    let painting_id = app.seed_painting(&artist_id, 1000, 0).await;
    let user_id = app.seed_user("ravi@x.com", "9876543210").await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/paintings/{painting_id}/comments"),
            Some(json!({ "userId": user_id, "text": "Lovely colours" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Comment added");
    assert_eq!(body["comments"][0]["text"], "Lovely colours");
    assert_eq!(body["comments"][0]["userId"], user_id);

    for _ in 0..2 {
        let response = app
            .request(
                Method::POST,
                &format!("/api/paintings/{painting_id}/likes"),
                Some(json!({ "userId": user_id })),
            )
            .await;
        assert_eq!(response.status(), 200);
        let body = response_json(response).await;
        assert_eq!(body["likes"].as_array().map(Vec::len), Some(1));
    }

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/paintings/{painting_id}/likes/{user_id}"),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Like removed");
    assert_eq!(body["likes"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn comment_from_unknown_user_is_not_found() {
    let app = TestApp::new().await;
    let artist_id = app.seed_artist().await;
    let painting_id = app.seed_painting(&artist_id, 1000, 0).await;

    let response = app
        .request(
            Method::POST,
            &format!("/api/paintings/{painting_id}/comments"),
            Some(json!({ "userId": uuid::Uuid::new_v4(), "text": "Hi" })),
        )
        .await;
    assert_eq!(response.status(), 404);
}
