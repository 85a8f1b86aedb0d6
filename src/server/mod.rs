//! HTTP server exposing registered agents over A2A JSON-RPC
//!
//! Routes:
//!
//! | Method | Path                              | Purpose                      |
//! |--------|-----------------------------------|------------------------------|
//! | GET    | `/health`                         | liveness and agent count     |
//! | GET    | `/.well-known/agent.json`         | card of the default agent    |
//! | GET    | `/{agent}/.well-known/agent.json` | card of a specific agent     |
//! | POST   | `/`                               | JSON-RPC endpoint            |
//! | POST   | `/{agent}`                        | JSON-RPC addressed to agent  |
//!
//! The `X-A2A-Agent` header overrides the agent named in the path.

mod handlers;

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use url::Url;

use crate::{
    agent::AgentRegistry,
    config::ServerConfig,
    protocol::A2AError,
    routing::AgentRouter,
    service::RpcDispatcher,
    store::TaskStore,
};

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) dispatcher: RpcDispatcher,
    pub(crate) base_url: Url,
}

/// A2A protocol server
///
/// Owns the agent registry and the task store for the lifetime of the
/// process.
pub struct A2AServer {
    config: ServerConfig,
    registry: Arc<AgentRegistry>,
    store: Arc<TaskStore>,
    base_url: Url,
}

impl A2AServer {
    /// Create a server for the given agents
    pub fn new(config: ServerConfig, registry: AgentRegistry) -> Result<Self, A2AError> {
        let base_url = config.resolved_base_url()?;

        Ok(Self {
            config,
            registry: Arc::new(registry),
            store: Arc::new(TaskStore::new()),
            base_url,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    /// Build the Axum router for this server
    pub fn router(&self) -> Router {
        let router = AgentRouter::new(
            Arc::clone(&self.registry),
            self.config.fallback_to_first_agent,
        );
        let state = AppState {
            dispatcher: RpcDispatcher::new(router, Arc::clone(&self.store)),
            base_url: self.base_url.clone(),
        };

        Router::new()
            .route("/health", get(handlers::health))
            .route("/.well-known/agent.json", get(handlers::root_agent_card))
            .route("/", post(handlers::rpc_root))
            .route(
                "/{*agent_path}",
                get(handlers::agent_get).post(handlers::rpc_agent),
            )
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Bind the configured address and serve until SIGINT or SIGTERM
    pub async fn serve(self) -> Result<(), A2AError> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| A2AError::Transport(format!("failed to bind {}: {}", addr, e)))?;

        self.serve_with_listener(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    ///
    /// In-flight requests are allowed to finish after `shutdown` resolves.
    pub async fn serve_with_listener<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), A2AError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr: SocketAddr = listener
            .local_addr()
            .map_err(|e| A2AError::Transport(e.to_string()))?;

        info!(
            address = %local_addr,
            base_url = %self.base_url,
            agents = self.registry.len(),
            "A2A server listening"
        );
        for agent in self.registry.all() {
            info!(agent_id = %agent.id, name = %agent.name, "Agent registered");
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| A2AError::Transport(e.to_string()))?;

        info!("A2A server stopped");
        Ok(())
    }
}

/// Resolve when the process receives SIGINT (Ctrl+C) or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
