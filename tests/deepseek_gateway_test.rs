// tests/deepseek_gateway_test.rs
// DeepSeek gateway against a local stand-in for the chat completions API

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use boredom_buster::config::BusterConfig;
use boredom_buster::games::{GameSession, HaikuGenerator, drive};
use boredom_buster::llm::{CompletionError, CompletionGateway, CompletionRequest, DeepSeekGateway};
use boredom_buster::prompt::fallback;

// ============================================================================
// TEST SETUP UTILITIES
// ============================================================================

#[derive(Clone, Default)]
struct Seen {
    auth: Arc<Mutex<Option<String>>>,
    body: Arc<Mutex<Option<Value>>>,
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr, api_key: Option<&str>) -> BusterConfig {
    let base = format!("http://{}/v1", addr);
    let api_key = api_key.map(str::to_string);
    BusterConfig::from_lookup(move |key| match key {
        "BUSTER_API_BASE_URL" => Some(base.clone()),
        "DEEPSEEK_API_KEY" => api_key.clone(),
        "BUSTER_REQUEST_TIMEOUT" => Some("1".to_string()),
        _ => None,
    })
}

async fn recording_handler(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    *seen.auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *seen.body.lock().unwrap() = Some(body);

    Json(json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "Crisp autumn morning" },
            "finish_reason": "stop"
        }]
    }))
}

// ============================================================================
// Success path
// ============================================================================

#[tokio::test]
async fn test_completion_sends_bearer_and_openai_body() {
    let seen = Seen::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(recording_handler))
        .with_state(seen.clone());
    let addr = serve(app).await;

    let gateway = DeepSeekGateway::new(&config_for(addr, Some("sk-test")));
    let request = CompletionRequest::new("Write a haiku about autumn").with_system_message("be poetic");
    let result = gateway.complete(request).await;

    assert_eq!(result, Ok("Crisp autumn morning".to_string()));
    assert_eq!(seen.auth.lock().unwrap().as_deref(), Some("Bearer sk-test"));

    let body = seen.body.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "deepseek-chat");
    assert_eq!(body["max_tokens"], 500);
    assert_eq!(body["messages"][0], json!({ "role": "system", "content": "be poetic" }));
    assert_eq!(
        body["messages"][1],
        json!({ "role": "user", "content": "Write a haiku about autumn" })
    );
    // Sent exactly as configured, not widened from a lossy float
    assert_eq!(body["temperature"], json!(0.8));
}

#[tokio::test]
async fn test_missing_key_sends_no_auth_header() {
    let seen = Seen::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(recording_handler))
        .with_state(seen.clone());
    let addr = serve(app).await;

    let gateway = DeepSeekGateway::new(&config_for(addr, None));
    let result = gateway.complete(CompletionRequest::new("hi")).await;

    assert!(result.is_ok());
    assert!(seen.auth.lock().unwrap().is_none());
}

// ============================================================================
// Failure mapping
// ============================================================================

#[tokio::test]
async fn test_non_success_status_is_service_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
    );
    let addr = serve(app).await;

    let gateway = DeepSeekGateway::new(&config_for(addr, Some("sk-test")));
    let result = gateway.complete(CompletionRequest::new("hi")).await;

    assert_eq!(
        result,
        Err(CompletionError::Service {
            status: 503,
            body: "overloaded".to_string()
        })
    );
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let app = Router::new().route("/v1/chat/completions", post(|| async { "definitely not json" }));
    let addr = serve(app).await;

    let gateway = DeepSeekGateway::new(&config_for(addr, Some("sk-test")));
    let result = gateway.complete(CompletionRequest::new("hi")).await;

    assert!(matches!(result, Err(CompletionError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_empty_choices_is_malformed() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) }),
    );
    let addr = serve(app).await;

    let gateway = DeepSeekGateway::new(&config_for(addr, Some("sk-test")));
    let result = gateway.complete(CompletionRequest::new("hi")).await;

    assert!(matches!(result, Err(CompletionError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = DeepSeekGateway::new(&config_for(addr, Some("sk-test")));
    let result = gateway.complete(CompletionRequest::new("hi")).await;

    assert!(matches!(result, Err(CompletionError::Transport(_))));
}

#[tokio::test]
async fn test_slow_service_times_out_as_transport_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "choices": [{ "message": { "content": "too late" } }] }))
        }),
    );
    let addr = serve(app).await;

    let gateway = DeepSeekGateway::new(&config_for(addr, Some("sk-test")));
    let result = gateway.complete(CompletionRequest::new("hi")).await;

    assert!(matches!(result, Err(CompletionError::Transport(_))));
}

#[tokio::test]
async fn test_empty_content_is_a_valid_completion() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "choices": [{ "message": { "content": "" } }] })) }),
    );
    let addr = serve(app).await;

    let gateway = DeepSeekGateway::new(&config_for(addr, Some("sk-test")));
    let result = gateway.complete(CompletionRequest::new("hi")).await;

    assert_eq!(result, Ok(String::new()));
}

#[tokio::test]
async fn test_body_stalling_after_headers_is_transport_error() {
    // Headers promise a body that never finishes arriving
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let head = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 200\r\n\r\n{\"choices\"";
        socket.write_all(head.as_bytes()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let gateway = DeepSeekGateway::new(&config_for(addr, Some("sk-test")));
    let result = gateway.complete(CompletionRequest::new("hi")).await;

    assert!(matches!(result, Err(CompletionError::Transport(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_connection_dropped_mid_body_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let head = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 200\r\n\r\n{\"choices\"";
        socket.write_all(head.as_bytes()).await.unwrap();
        // Dropping the socket cuts the body short
    });

    let gateway = DeepSeekGateway::new(&config_for(addr, Some("sk-test")));
    let result = gateway.complete(CompletionRequest::new("hi")).await;

    assert!(matches!(result, Err(CompletionError::Transport(_))), "got {:?}", result);
}

// ============================================================================
// Through a game
// ============================================================================

#[tokio::test]
async fn test_haiku_falls_back_when_service_errors() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = serve(app).await;
    let gateway = DeepSeekGateway::new(&config_for(addr, Some("sk-test")));

    let mut haiku = HaikuGenerator::new();
    haiku.set_title("Quiet Office");
    let pending = haiku.generate().unwrap();
    drive(&mut haiku, pending, &gateway).await;

    assert_eq!(haiku.haiku(), Some(fallback::HAIKU_FALLBACK));
    assert!(!haiku.is_awaiting());
}
