//! HTTP Integration Tests for Thoughts
//!
//! Covers thought CRUD, owner linking and reassignment between users.
//!
//! Run with: `cargo test --test thoughts_http_test -- --nocapture`

mod helpers;

use axum::http::StatusCode;
use helpers::{create_thought, create_user, id_of, ids, TestApp};
use serde_json::json;
use uuid::Uuid;

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_thought_links_owner() {
    let app = TestApp::new();
    let user = create_user(&app, "ada").await;

    let (status, json) = app
        .post(
            "/api/thoughts",
            &json!({ "username": "ada", "thoughtText": "Hello" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "add successfully");
    let thought = &json["added"];
    assert_eq!(thought["thoughtText"], "Hello");
    assert_eq!(thought["username"], "ada");
    assert_eq!(thought["userId"], user["id"]);
    assert!(thought["reactions"].as_array().unwrap().is_empty());

    let (_, user) = app.get(&format!("/api/users/{}", id_of(&user))).await;
    assert_eq!(user["thoughts"][0]["id"], thought["id"]);
}

#[tokio::test]
async fn test_create_thought_with_initial_reactions() {
    let app = TestApp::new();
    create_user(&app, "ada").await;

    let (status, json) = app
        .post(
            "/api/thoughts",
            &json!({
                "username": "ada",
                "thoughtText": "Hello",
                "reactions": [{ "reactionBody": "hi back", "username": "grace" }],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let reactions = json["added"]["reactions"].as_array().unwrap();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0]["reactionBody"], "hi back");
    assert!(reactions[0]["reactionId"].is_string());
}

#[tokio::test]
async fn test_create_thought_with_repeated_reaction_id_is_400() {
    let app = TestApp::new();
    let user = create_user(&app, "ada").await;
    let reaction_id = Uuid::new_v4();

    let (status, json) = app
        .post(
            "/api/thoughts",
            &json!({
                "username": "ada",
                "thoughtText": "hi",
                "reactions": [
                    { "reactionId": reaction_id, "reactionBody": "a", "username": "grace" },
                    { "reactionId": reaction_id, "reactionBody": "b", "username": "grace" },
                ],
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "reactionId already exists");

    let (_, thoughts) = app.get("/api/thoughts").await;
    assert!(thoughts.as_array().unwrap().is_empty());
    let (_, user) = app.get(&format!("/api/users/{}", id_of(&user))).await;
    assert!(user["thoughts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_thought_for_unknown_user_is_404_and_stores_nothing() {
    let app = TestApp::new();

    let (status, json) = app
        .post(
            "/api/thoughts",
            &json!({ "username": "nobody", "thoughtText": "orphan" }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "USER_NOT_FOUND");

    let (_, thoughts) = app.get("/api/thoughts").await;
    assert!(thoughts.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_thought_text_length_limits() {
    let app = TestApp::new();
    create_user(&app, "ada").await;

    let (status, _) = app
        .post(
            "/api/thoughts",
            &json!({ "username": "ada", "thoughtText": "x".repeat(280) }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app
        .post(
            "/api/thoughts",
            &json!({ "username": "ada", "thoughtText": "x".repeat(281) }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_ERROR");

    let (status, _) = app
        .post(
            "/api/thoughts",
            &json!({ "username": "ada", "thoughtText": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Read
// ============================================================================

#[tokio::test]
async fn test_list_and_get_thoughts() {
    let app = TestApp::new();
    create_user(&app, "ada").await;
    let first = create_thought(&app, "ada", "one").await;
    create_thought(&app, "ada", "two").await;

    let (status, json) = app.get("/api/thoughts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);

    let (status, json) = app.get(&format!("/api/thoughts/{}", id_of(&first))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["thoughtText"], "one");
}

#[tokio::test]
async fn test_get_unknown_thought_is_404() {
    let app = TestApp::new();

    let (status, json) = app.get(&format!("/api/thoughts/{}", Uuid::new_v4())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "THOUGHT_NOT_FOUND");
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_thought_text() {
    let app = TestApp::new();
    create_user(&app, "ada").await;
    let thought = create_thought(&app, "ada", "draft").await;

    let (status, json) = app
        .put(
            &format!("/api/thoughts/{}", id_of(&thought)),
            &json!({ "thoughtText": "final" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["thoughtText"], "final");
    assert_eq!(json["username"], "ada");
}

#[tokio::test]
async fn test_reassign_thought_is_idempotent() {
    let app = TestApp::new();
    let ada = create_user(&app, "ada").await;
    let grace = create_user(&app, "grace").await;
    let thought = create_thought(&app, "ada", "moving").await;
    let uri = format!("/api/thoughts/{}", id_of(&thought));

    for _ in 0..2 {
        let (status, json) = app.put(&uri, &json!({ "username": "grace" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["username"], "grace");
        assert_eq!(json["userId"], grace["id"]);
    }

    let (_, ada) = app.get(&format!("/api/users/{}", id_of(&ada))).await;
    assert!(ada["thoughts"].as_array().unwrap().is_empty());

    let (_, grace) = app.get(&format!("/api/users/{}", id_of(&grace))).await;
    let owned = grace["thoughts"].as_array().unwrap();
    assert_eq!(owned.len(), 1, "thought appears exactly once");
    assert_eq!(owned[0]["id"], thought["id"]);
}

#[tokio::test]
async fn test_update_to_unknown_user_is_404_and_keeps_owner() {
    let app = TestApp::new();
    let ada = create_user(&app, "ada").await;
    let thought = create_thought(&app, "ada", "stay").await;

    let (status, json) = app
        .put(
            &format!("/api/thoughts/{}", id_of(&thought)),
            &json!({ "username": "nobody", "thoughtText": "moved?" }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "USER_NOT_FOUND");

    let (_, json) = app.get(&format!("/api/thoughts/{}", id_of(&thought))).await;
    assert_eq!(json["thoughtText"], "stay");
    assert_eq!(json["userId"], ada["id"]);
}

#[tokio::test]
async fn test_update_unknown_thought_is_404() {
    let app = TestApp::new();

    let (status, json) = app
        .put(
            &format!("/api/thoughts/{}", Uuid::new_v4()),
            &json!({ "thoughtText": "x" }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "THOUGHT_NOT_FOUND");
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_thought_unlinks_owner() {
    let app = TestApp::new();
    let user = create_user(&app, "ada").await;
    let keep = create_thought(&app, "ada", "keep").await;
    let dropped = create_thought(&app, "ada", "drop").await;

    let (status, json) = app
        .delete(&format!("/api/thoughts/{}", id_of(&dropped)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "delete successfully");
    assert!(json["updated"].is_object(), "owner summary is always present");
    assert_eq!(json["updated"]["id"], user["id"]);
    assert_eq!(json["updated"]["username"], "ada");
    assert_eq!(ids(&json["updated"]["thoughts"]), vec![id_of(&keep)]);
}

#[tokio::test]
async fn test_delete_thought_twice_is_404() {
    let app = TestApp::new();
    create_user(&app, "ada").await;
    let thought = create_thought(&app, "ada", "once").await;
    let uri = format!("/api/thoughts/{}", id_of(&thought));

    let (status, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "THOUGHT_NOT_FOUND");
}

// ============================================================================
// Walkthrough
// ============================================================================

#[tokio::test]
async fn test_ada_walkthrough() {
    let app = TestApp::new();
    let ada = create_user(&app, "ada").await;
    assert_eq!(ada["friendCount"], 0);

    let thought = create_thought(&app, "ada", "Hello").await;

    let (_, ada_now) = app.get(&format!("/api/users/{}", id_of(&ada))).await;
    let thoughts = ada_now["thoughts"].as_array().unwrap();
    assert_eq!(thoughts.len(), 1);
    assert_eq!(thoughts[0]["thoughtText"], "Hello");

    let (status, json) = app
        .delete(&format!("/api/thoughts/{}", id_of(&thought)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&json["updated"]["thoughts"]).is_empty());

    let (_, ada_now) = app.get(&format!("/api/users/{}", id_of(&ada))).await;
    assert!(ada_now["thoughts"].as_array().unwrap().is_empty());
}
