//! Intake submission against an in-process axum webhook.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use bb_domain::config::IntakeConfig;
use bb_tools::{submit_service_request, IntakeTool, LocalTool, ServiceRequest, ToolRegistry};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Captured {
    bodies: Arc<Mutex<Vec<Value>>>,
    content_types: Arc<Mutex<Vec<String>>>,
}

async fn start_webhook(status: StatusCode) -> (SocketAddr, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route(
            "/hook",
            post(
                move |State(cap): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    let ct = headers
                        .get("content-type")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    cap.content_types.lock().unwrap().push(ct);
                    cap.bodies.lock().unwrap().push(body);
                    (status, "ignored body")
                },
            ),
        )
        .with_state(captured.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, captured)
}

fn record() -> ServiceRequest {
    ServiceRequest {
        customer_name: "J. Doe".into(),
        contact_email: "j@example.com".into(),
        phone_number: "555-0100".into(),
        service_requested: "repair".into(),
        site_type: "Residential".into(),
        location_zip: "89101".into(),
        issue_summary: "wifi down".into(),
        urgency_level: "high".into(),
        source: "BattleBorn_AI_Agent".into(),
    }
}

#[tokio::test]
async fn status_200_confirms_with_customer_name() {
    let (addr, captured) = start_webhook(StatusCode::OK).await;
    let client = reqwest::Client::new();
    let line = submit_service_request(&client, &format!("http://{addr}/hook"), &record()).await;
    assert_eq!(line, "Success! The request for J. Doe has been securely logged.");

    let bodies = captured.bodies.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["location_zip"], json!("89101"));
    assert_eq!(bodies[0]["source"], json!("BattleBorn_AI_Agent"));
    assert!(captured.content_types.lock().unwrap()[0].starts_with("application/json"));
}

#[tokio::test]
async fn status_201_is_also_success() {
    let (addr, _) = start_webhook(StatusCode::CREATED).await;
    let client = reqwest::Client::new();
    let line = submit_service_request(&client, &format!("http://{addr}/hook"), &record()).await;
    assert!(line.starts_with("Success!"));
}

#[tokio::test]
async fn no_content_is_not_treated_as_logged() {
    let (addr, captured) = start_webhook(StatusCode::NO_CONTENT).await;
    let client = reqwest::Client::new();
    let line = submit_service_request(&client, &format!("http://{addr}/hook"), &record()).await;
    assert_eq!(line, "Request sent, but server responded with status: 204.");
    assert_eq!(captured.bodies.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn other_status_is_reported_with_code() {
    let (addr, captured) = start_webhook(StatusCode::INTERNAL_SERVER_ERROR).await;
    let client = reqwest::Client::new();
    let line = submit_service_request(&client, &format!("http://{addr}/hook"), &record()).await;
    assert_eq!(line, "Request sent, but server responded with status: 500.");
    // Exactly one attempt.
    assert_eq!(captured.bodies.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn transport_failure_is_described_not_raised() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = reqwest::Client::new();
    let line = submit_service_request(&client, &format!("http://{addr}/hook"), &record()).await;
    assert!(line.starts_with("Error communicating with the server: "));
    // The root cause survives, not just reqwest's outer "error sending request".
    let lower = line.to_lowercase();
    assert!(
        lower.contains("refused") || lower.contains("os error"),
        "missing cause: {line}"
    );
}

#[tokio::test]
async fn registry_dispatch_stamps_configured_source() {
    let (addr, captured) = start_webhook(StatusCode::CREATED).await;
    let cfg = IntakeConfig {
        webhook_url: format!("http://{addr}/hook"),
        source: "BattleBorn_AI_Agent".into(),
    };
    let mut reg = ToolRegistry::new();
    reg.register(IntakeTool::new(&cfg));

    let args = json!({
        "name": "J. Doe",
        "email": "j@example.com",
        "phone": "555-0100",
        "service_type": "repair",
        "site_type": "Residential",
        "location": "89101",
        "issue_description": "wifi down",
        "urgency": "high"
    });
    let (out, is_error) = reg.dispatch("submit_service_request", &args).await;
    assert!(!is_error);
    assert_eq!(out, "Success! The request for J. Doe has been securely logged.");

    let body = &captured.bodies.lock().unwrap()[0];
    assert_eq!(body["customer_name"], json!("J. Doe"));
    assert_eq!(body["service_requested"], json!("repair"));
    assert_eq!(body["source"], json!("BattleBorn_AI_Agent"));
    assert_eq!(body.as_object().unwrap().len(), 9);
}

#[tokio::test]
async fn bad_arguments_never_reach_the_webhook() {
    let (addr, captured) = start_webhook(StatusCode::OK).await;
    let tool = IntakeTool::new(&IntakeConfig {
        webhook_url: format!("http://{addr}/hook"),
        source: "BattleBorn_AI_Agent".into(),
    });
    assert!(tool.call(json!({ "name": "only a name" })).await.is_err());
    assert!(captured.bodies.lock().unwrap().is_empty());
}
