//! Startup halts with a diagnostic when the key is missing or rejected.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use bb_agent::bootstrap::build_runtime;
use bb_domain::config::{Config, DispatchMode};

async fn start_model_info(good_key: &'static str) -> String {
    let app = Router::new().route(
        "/v1beta/models/:model",
        get(move |Query(q): Query<HashMap<String, String>>| async move {
            if q.get("key").map(String::as_str) == Some(good_key) {
                (StatusCode::OK, Json(json!({ "name": "models/gemini-1.5-flash" })))
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": {
                            "code": 400,
                            "message": "API key not valid. Please pass a valid API key.",
                            "details": [{ "reason": "API_KEY_INVALID" }]
                        }
                    })),
                )
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn config_with_key(base_url: String, key: &str) -> Config {
    let mut config = Config::default();
    config.llm.base_url = base_url;
    config.llm.timeout_ms = 5_000;
    config.llm.auth.env = None;
    config.llm.auth.key = Some(key.into());
    config.intake.webhook_url = "http://127.0.0.1:9/hook".into();
    config
}

#[tokio::test]
async fn rejected_key_halts_startup_with_hint() {
    let base = start_model_info("good").await;
    let err = build_runtime(Arc::new(config_with_key(base, "bad")))
        .await
        .err()
        .unwrap();
    let msg = err.to_string();
    assert!(msg.contains("API_KEY_INVALID"));
    assert!(msg.contains("Hint:"));
}

#[tokio::test]
async fn accepted_key_builds_runtime_with_intake_tool() {
    let base = start_model_info("good").await;
    let runtime = build_runtime(Arc::new(config_with_key(base, "good")))
        .await
        .unwrap();
    assert_eq!(runtime.tools.tool_names(), vec!["submit_service_request"]);

    let session = runtime.session(Some(DispatchMode::Completion), None);
    assert_eq!(session.mode(), DispatchMode::Completion);
    assert_eq!(session.model(), None);
}

#[tokio::test]
async fn missing_key_halts_before_any_request() {
    let mut config = Config::default();
    config.llm.auth.env = Some("BB_TEST_STARTUP_KEY_NEVER_SET_4242".into());
    config.intake.webhook_url = "http://127.0.0.1:9/hook".into();

    let err = build_runtime(Arc::new(config)).await.err().unwrap();
    let msg = err.to_string();
    assert!(msg.contains("BB_TEST_STARTUP_KEY_NEVER_SET_4242"));
    assert!(msg.contains("Hint:"));
}

#[tokio::test]
async fn config_errors_halt_startup() {
    let mut config = Config::default();
    config.llm.model = String::new();
    config.llm.auth.key = Some("whatever".into());

    let err = build_runtime(Arc::new(config)).await.err().unwrap();
    assert!(err.to_string().contains("config validation failed"));
}
