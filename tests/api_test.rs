use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use learnhub::api::router;
use learnhub::network::{build_network_descriptor, build_wallet_connector_config};
use learnhub::state::AppState;
use learnhub::store::{Catalog, InMemoryStore};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/catalog.json");
    let catalog = Catalog::load(&path).expect("Failed to load catalog");
    let network = build_network_descriptor();
    let wallet = build_wallet_connector_config("test-project", vec![network.clone()]);

    router(AppState {
        store: Arc::new(InMemoryStore::with_catalog(catalog).expect("Failed to seed store")),
        network: Arc::new(network),
        wallet: Arc::new(wallet),
        passing_score_percent: 70,
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_and_configuration_endpoints() {
    let app = app();

    let (status, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, network) = send(&app, get("/network")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(network["id"], 656476);
    assert_eq!(network["testnet"], true);

    let (status, wallet) = send(&app, get("/wallet-config")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wallet["projectId"], "test-project");
    assert_eq!(wallet["ssr"], false);
    assert_eq!(wallet["chains"][0], network);
}

#[tokio::test]
async fn test_course_listing_carries_progress() {
    let app = app();

    let (status, courses) = send(&app, get("/courses?user_id=u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(courses[0]["id"], "blockchain-basics");
    assert_eq!(courses[0]["difficulty"], "beginner");
    assert_eq!(courses[0]["modules_count"], 2);
    assert_eq!(courses[0]["completed_modules"], 0);
    assert!(courses[0].get("progress").is_none());

    let (status, progress) = send(&app, post("/courses/blockchain-basics/start", json!({ "user_id": "u1" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["status"], "in_progress");

    let (_, courses) = send(&app, get("/courses?user_id=u1")).await;
    assert_eq!(courses[0]["progress"]["status"], "in_progress");
}

#[tokio::test]
async fn test_locked_course_returns_forbidden() {
    let app = app();

    let (status, body) = send(&app, post("/courses/wallets-and-keys/start", json!({ "user_id": "u1" }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "course wallets-and-keys is locked");
}

#[tokio::test]
async fn test_modules_endpoint_returns_tagged_content() {
    let app = app();

    let (status, modules) = send(&app, get("/courses/blockchain-basics/modules?user_id=u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(modules[0]["content"]["type"], "lesson");
    assert_eq!(modules[0]["content"]["sections"][1]["type"], "list");
    assert_eq!(modules[1]["content"]["type"], "quiz");
    assert_eq!(modules[1]["quiz_questions"][0]["question_type"], "multiple_choice");

    let (status, _) = send(&app, get("/courses/missing/modules?user_id=u1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quiz_flow_through_http() {
    let app = app();

    let (status, attempt) = send(
        &app,
        post(
            "/modules/bb-quiz/attempts",
            json!({ "user_id": "u1", "answers": { "bb-q1": "The parent hash", "bb-q2": "false" } }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(attempt["attempt_number"], 1);
    assert_eq!(attempt["passed"], true);

    let (status, _) = send(&app, post("/modules/bb-intro/complete", json!({ "user_id": "u1" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, completion) = send(
        &app,
        post("/modules/bb-quiz/complete", json!({ "user_id": "u1", "time_spent_minutes": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completion["course_progress"]["status"], "completed");
    assert_eq!(completion["course_progress"]["progress_percentage"], 100);
    assert_eq!(completion["module_progress"]["time_spent_minutes"], 7);

    let (status, certificates) = send(&app, get("/users/u1/certificates")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(certificates.as_array().map(Vec::len), Some(1));
    assert_eq!(certificates[0]["final_score"], 100);
}

#[tokio::test]
async fn test_blank_user_is_rejected() {
    let app = app();

    let (status, body) = send(&app, post("/courses/blockchain-basics/start", json!({ "user_id": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "400 Bad Request");
}
