//! A2A Protocol Compliance Tests
//!
//! These tests drive the HTTP router end to end and verify the wire contract:
//! JSON-RPC envelopes, error codes, task lifecycle and discovery documents.

use a2a_runtime::{
    agent::{handler_fn, AgentDescriptor, AgentRegistry},
    config::ServerConfig,
    protocol::{AgentError, Message},
    server::A2AServer,
};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn echo(id: &str, name: &str) -> AgentDescriptor {
    AgentDescriptor::new(
        id,
        name,
        handler_fn(|message: Message, _ctx| async move {
            Ok::<_, AgentError>(Message::agent(message.text().unwrap_or_default()))
        }),
    )
}

fn failing(id: &str) -> AgentDescriptor {
    AgentDescriptor::new(
        id,
        "Failing",
        handler_fn(|_message: Message, _ctx| async move {
            Err::<Message, _>(
                AgentError::new("UPSTREAM_UNAVAILABLE", "backend is down")
                    .with_details(json!({"retryAfter": 30})),
            )
        }),
    )
}

fn router(descriptors: Vec<AgentDescriptor>) -> Router {
    let registry = AgentRegistry::from_descriptors(descriptors).unwrap();
    A2AServer::new(ServerConfig::new(0), registry)
        .unwrap()
        .router()
}

async fn request(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn rpc(router: &Router, method: &str, params: Value) -> (StatusCode, Value) {
    let body = json!({"jsonrpc": "2.0", "id": "req", "method": method, "params": params});
    request(
        router,
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn discover(router: &Router, uri: &str) -> (StatusCode, Value) {
    request(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

fn hi(task_id: &str) -> Value {
    json!({
        "id": task_id,
        "message": {"role": "user", "parts": [{"type": "text", "text": "hi"}]}
    })
}

#[tokio::test]
async fn test_send_completes_with_text_artifact() {
    let router = router(vec![echo("agent://echo", "Echo")]);

    let (status, body) = rpc(&router, "tasks/send", hi("t1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["id"], "req");
    assert_eq!(body["result"]["id"], "t1");
    assert_eq!(body["result"]["status"]["state"], "completed");
    assert_eq!(body["result"]["artifacts"][0]["parts"][0]["type"], "text");
    assert_eq!(body["result"]["artifacts"][0]["parts"][0]["text"], "hi");
}

#[tokio::test]
async fn test_get_after_send_shows_both_messages() {
    let router = router(vec![echo("agent://echo", "Echo")]);
    rpc(&router, "tasks/send", hi("t1")).await;

    let (status, body) = rpc(&router, "tasks/get", json!({"id": "t1"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["status"]["state"], "completed");
    let history = body["result"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[1]["role"], "agent");
}

#[tokio::test]
async fn test_repeated_send_reuses_task() {
    let router = router(vec![echo("agent://echo", "Echo")]);

    rpc(&router, "tasks/send", hi("t1")).await;
    let (_, body) = rpc(&router, "tasks/send", hi("t1")).await;

    assert_eq!(body["result"]["id"], "t1");
    assert_eq!(body["result"]["history"].as_array().unwrap().len(), 4);
    assert_eq!(body["result"]["artifacts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_length_trims_returned_history() {
    let router = router(vec![echo("agent://echo", "Echo")]);
    rpc(&router, "tasks/send", hi("t1")).await;

    let (_, body) = rpc(&router, "tasks/get", json!({"id": "t1", "historyLength": 1})).await;
    let history = body["result"]["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["role"], "agent");
}

#[tokio::test]
async fn test_unknown_task() {
    let router = router(vec![echo("agent://echo", "Echo")]);

    let (status, body) = rpc(&router, "tasks/cancel", json!({"id": "never-sent"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32001);

    let (_, body) = rpc(&router, "tasks/get", json!({"id": "never-sent"})).await;
    assert_eq!(body["error"]["code"], -32001);
    assert_eq!(body["error"]["data"]["taskId"], "never-sent");
}

#[tokio::test]
async fn test_cancel_completed_task_leaves_state_unchanged() {
    let router = router(vec![echo("agent://echo", "Echo")]);
    rpc(&router, "tasks/send", hi("t1")).await;

    let (_, body) = rpc(&router, "tasks/cancel", json!({"id": "t1"})).await;
    assert_eq!(body["error"]["code"], -32002);

    let (_, body) = rpc(&router, "tasks/get", json!({"id": "t1"})).await;
    assert_eq!(body["result"]["status"]["state"], "completed");
}

#[tokio::test]
async fn test_handler_failure_fails_task() {
    let router = router(vec![failing("agent://flaky")]);

    let (status, body) = rpc(&router, "tasks/send", hi("t1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32603);
    assert_eq!(body["error"]["data"]["taskId"], "t1");
    assert_eq!(body["error"]["data"]["code"], "UPSTREAM_UNAVAILABLE");
    assert_eq!(body["error"]["data"]["message"], "backend is down");
    assert_eq!(body["error"]["data"]["details"]["retryAfter"], 30);

    let (_, body) = rpc(&router, "tasks/get", json!({"id": "t1"})).await;
    assert_eq!(body["result"]["status"]["state"], "failed");

    // failed is terminal as far as cancel is concerned
    let (_, body) = rpc(&router, "tasks/cancel", json!({"id": "t1"})).await;
    assert_eq!(body["error"]["code"], -32002);
}

#[tokio::test]
async fn test_discovery_is_per_agent() {
    let router = router(vec![echo("a", "Agent A"), echo("b", "Agent B")]);

    let (status, card) = discover(&router, "/a/.well-known/agent.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["name"], "Agent A");

    let (_, card) = discover(&router, "/b/.well-known/agent.json").await;
    assert_eq!(card["name"], "Agent B");
}

#[tokio::test]
async fn test_discovery_document_shape() {
    let router = router(vec![echo("agent://echo", "Echo")]);

    let (_, card) = discover(&router, "/.well-known/agent.json").await;

    assert_eq!(card["name"], "Echo");
    assert!(card["url"].as_str().unwrap().ends_with("/echo"));
    for flag in ["streaming", "pushNotifications", "stateTransitionHistory"] {
        assert!(card["capabilities"][flag].is_boolean(), "{}", flag);
    }
    assert!(card["skills"].is_array());
    assert_eq!(card["defaultInputModes"], json!(["text"]));
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let router = router(vec![echo("agent://echo", "Echo")]);

    let (status, body) = request(
        &router,
        Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"jsonrpc": "2.0", "#))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32700);
}

#[tokio::test]
async fn test_invalid_params_and_unknown_methods() {
    let router = router(vec![echo("agent://echo", "Echo")]);

    let (status, body) = rpc(&router, "tasks/send", json!({"id": "t1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32602);

    let (_, body) = rpc(
        &router,
        "tasks/send",
        json!({"id": "t1", "message": {"role": "user", "parts": []}}),
    )
    .await;
    assert_eq!(body["error"]["code"], -32602);

    let (_, body) = rpc(&router, "tasks/delete", json!({"id": "t1"})).await;
    assert_eq!(body["error"]["code"], -32601);

    // rejected calls create nothing
    let (_, body) = rpc(&router, "tasks/get", json!({"id": "t1"})).await;
    assert_eq!(body["error"]["code"], -32001);
}

#[tokio::test]
async fn test_no_agents_registered() {
    let router = router(vec![]);

    let (status, body) = rpc(&router, "tasks/send", hi("t1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32601);

    let (status, body) = discover(&router, "/.well-known/agent.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}
