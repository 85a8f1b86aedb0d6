//! JSON-RPC dispatch: from a raw request body to a response envelope
//!
//! Every failure along the way becomes a JSON-RPC error response; nothing is
//! propagated to the HTTP layer except whether the envelope itself was bad.

use std::sync::Arc;

use tower::ServiceExt;
use tower_layer::Layer;
use tracing::{debug, info_span, warn, Instrument};

use crate::{
    codec::{Codec, JsonRpcCodec, JsonRpcRequest, JsonRpcResponse},
    layer::{A2AValidationLayer, A2AValidationService},
    protocol::{error::A2AError, operation::A2AOperation},
    routing::AgentRouter,
    service::{A2AProtocolService, A2ARequest, RequestContext},
    store::TaskStore,
};

/// Explicit agent addressing supplied with an RPC call
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcTarget<'a> {
    /// Value of the agent header
    pub header: Option<&'a str>,
    /// Agent path taken from the request URL
    pub path: Option<&'a str>,
}

/// Result of dispatching one RPC call
#[derive(Debug, Clone)]
pub struct RpcOutcome {
    pub response: JsonRpcResponse,

    /// The envelope could not be parsed or was malformed
    pub envelope_error: bool,
}

impl RpcOutcome {
    fn reply(response: JsonRpcResponse) -> Self {
        Self {
            response,
            envelope_error: false,
        }
    }
}

/// Validated protocol service stack used for every call
pub type RpcService = A2AValidationService<A2AProtocolService>;

/// Decodes RPC calls, routes them to an agent and runs them through the
/// service stack
#[derive(Clone)]
pub struct RpcDispatcher {
    router: AgentRouter,
    service: RpcService,
    codec: Arc<dyn Codec>,
}

impl RpcDispatcher {
    pub fn new(router: AgentRouter, store: Arc<TaskStore>) -> Self {
        let service = A2AValidationLayer::new().layer(A2AProtocolService::new(store));

        Self {
            router,
            service,
            codec: Arc::new(JsonRpcCodec::new()),
        }
    }

    pub fn router(&self) -> &AgentRouter {
        &self.router
    }

    pub fn codec(&self) -> &Arc<dyn Codec> {
        &self.codec
    }

    /// Handle one RPC call
    pub async fn dispatch(&self, body: &[u8], target: RpcTarget<'_>) -> RpcOutcome {
        let request = match self.codec.decode_request(body) {
            Ok(request) => request,
            Err(decode) => {
                warn!(code = decode.error.code(), error = %decode.error, "Rejected RPC envelope");
                return RpcOutcome {
                    response: JsonRpcResponse::failure(decode.id, &decode.error),
                    envelope_error: decode.error.is_envelope_error(),
                };
            }
        };

        let agent = match self.router.resolve_rpc_target(target.header, target.path) {
            Ok(agent) => agent,
            Err(e) => {
                debug!(method = %request.method, error = %e, "No agent for RPC call");
                return RpcOutcome::reply(JsonRpcResponse::failure(request.id, &e));
            }
        };

        let JsonRpcRequest { id, method, params } = request;
        let span = info_span!("rpc", method = %method, agent_id = %agent.id);

        let result = async {
            let operation = A2AOperation::from_rpc(&method, params)?;
            debug!(task_id = %operation.task_id(), "Dispatching operation");

            let context = RequestContext::new(agent).with_request_id(id.clone());
            let task = self
                .service
                .clone()
                .oneshot(A2ARequest::new(operation, context))
                .await?;

            serde_json::to_value(task).map_err(A2AError::from)
        }
        .instrument(span.clone())
        .await;

        match result {
            Ok(task) => RpcOutcome::reply(JsonRpcResponse::success(id, task)),
            Err(e) => {
                span.in_scope(|| debug!(code = e.code(), error = %e, "RPC call failed"));
                RpcOutcome::reply(JsonRpcResponse::failure(id, &e))
            }
        }
    }
}
