use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

use dialogue_cell::router::chat_routes;
use dialogue_cell::DialogueState;
use scheduling_cell::models::ClinicSchedule;
use scheduling_cell::ScheduleStore;
use shared_config::AppConfig;

fn test_config() -> AppConfig {
    AppConfig {
        generation_api_url: String::new(),
        generation_api_key: String::new(),
        generation_model: "test-model".to_string(),
        generation_timeout_secs: 5,
        faq_service_url: String::new(),
        faq_confidence_threshold: 0.5,
        schedule_data_path: String::new(),
        clinic_name: "HealthCare Plus Clinic".to_string(),
        clinic_phone: "+1-555-123-4567".to_string(),
        session_ttl_minutes: 60,
    }
}

fn create_test_app(dir: &TempDir) -> Router {
    let path = dir.path().join("clinic_schedule.json");
    let store = Arc::new(ScheduleStore::load(path, ClinicSchedule::default()).unwrap());
    chat_routes(Arc::new(DialogueState::new(&test_config(), store)))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn message_turn_returns_reply_intent_and_session() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);

    let request = Request::builder()
        .method("POST")
        .uri("/message")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "message": "Hello there" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json_response = body_json(response).await;
    assert_eq!(json_response["intent"], "GREETING");
    assert_eq!(json_response["phase"], "GREETING");
    assert!(!json_response["message"].as_str().unwrap().is_empty());
    assert!(!json_response["session_id"].as_str().unwrap().is_empty());
    // No slot selected, so no booking status block.
    assert!(json_response.get("booking_status").is_none());
}

#[tokio::test]
async fn empty_message_is_a_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);

    let request = Request::builder()
        .method("POST")
        .uri("/message")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "message": "   " }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json_response = body_json(response).await;
    assert_eq!(json_response["error"], "Message must not be empty");
}

#[tokio::test]
async fn session_roundtrip_over_http() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir);

    let request = Request::builder()
        .method("POST")
        .uri("/message")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "message": "Hello there" }).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let session_id = body_json(response).await["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/session/{}", session_id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let history = body_json(response).await;
    assert_eq!(history["messages"].as_array().unwrap().len(), 2);
    assert_eq!(history["messages"][0]["role"], "user");
    assert_eq!(history["messages"][1]["role"], "assistant");

    let request = Request::builder()
        .method("DELETE")
        .uri(&format!("/session/{}", session_id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .method("GET")
        .uri(&format!("/session/{}", session_id))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
