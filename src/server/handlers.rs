//! HTTP handlers of the A2A server

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

use crate::{
    agent::generate_card,
    codec::JsonRpcResponse,
    protocol::A2AError,
    routing::{AGENT_CARD_PATH, AGENT_HEADER},
    server::AppState,
    service::RpcTarget,
};

/// `GET /health`
pub(crate) async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "agents": state.dispatcher.router().registry().len(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /.well-known/agent.json`
pub(crate) async fn root_agent_card(State(state): State<AppState>) -> Response {
    agent_card(&state, &format!("/{}", AGENT_CARD_PATH))
}

/// `GET /{*path}`, only discovery paths are served
pub(crate) async fn agent_get(State(state): State<AppState>, uri: Uri) -> Response {
    agent_card(&state, uri.path())
}

/// `POST /`
pub(crate) async fn rpc_root(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    rpc(&state, &headers, None, &body).await
}

/// `POST /{*agent_path}`
pub(crate) async fn rpc_agent(
    State(state): State<AppState>,
    Path(agent_path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    rpc(&state, &headers, Some(agent_path.as_str()), &body).await
}

fn agent_card(state: &AppState, request_path: &str) -> Response {
    let resolved = match state.dispatcher.router().resolve_discovery(request_path) {
        Some(resolved) => resolved,
        None => return not_found("Not found"),
    };

    match resolved {
        Ok(agent) => {
            debug!(agent_id = %agent.id, "Serving agent card");
            Json(generate_card(&agent, &state.base_url)).into_response()
        }
        Err(e) => not_found(&e.to_string()),
    }
}

async fn rpc(state: &AppState, headers: &HeaderMap, path: Option<&str>, body: &[u8]) -> Response {
    let target = RpcTarget {
        header: headers.get(AGENT_HEADER).and_then(|v| v.to_str().ok()),
        path,
    };

    let outcome = state.dispatcher.dispatch(body, target).await;
    let status = if outcome.envelope_error {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };

    encode(state, status, &outcome.response)
}

fn encode(state: &AppState, status: StatusCode, response: &JsonRpcResponse) -> Response {
    let codec = state.dispatcher.codec();

    match codec.encode_response(response) {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, codec.content_type().to_string())],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode RPC response");
            let fallback = JsonRpcResponse::failure(
                response.id.clone(),
                &A2AError::Internal("failed to encode response".into()),
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Json(fallback)).into_response()
        }
    }
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}
