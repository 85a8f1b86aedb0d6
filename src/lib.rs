//! # A2A Runtime
//!
//! A Tower-based runtime that hosts Agent2Agent (A2A) agents behind a
//! JSON-RPC 2.0 endpoint.
//!
//! Agents are registered once at startup with an identifier, descriptive
//! metadata and a message handler. The runtime publishes an agent card for
//! each of them, routes RPC calls to the addressed agent, tracks every
//! conversation as a task with a well-defined lifecycle, and reports all
//! failures as JSON-RPC errors.
//!
//! ## Features
//!
//! - **Multi-agent**: one server, many agents, addressed by header or path
//! - **Composable**: protocol execution is a Tower `Service`, validation a `Layer`
//! - **Safe handlers**: handler errors and panics fail the task, never the server
//! - **Async**: built on tokio and axum
//!
//! ## Example
//!
//! ```rust,no_run
//! use a2a_runtime::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), A2AError> {
//!     let mut registry = AgentRegistry::new();
//!     registry.register(AgentDescriptor::new(
//!         "agent://echo",
//!         "Echo",
//!         handler_fn(|message: Message, _ctx| async move {
//!             Ok::<_, AgentError>(Message::agent(message.text().unwrap_or_default()))
//!         }),
//!     ))?;
//!
//!     A2AServer::new(ServerConfig::from_env()?, registry)?
//!         .serve()
//!         .await
//! }
//! ```

pub mod agent;
pub mod codec;
pub mod config;
pub mod layer;
pub mod protocol;
pub mod routing;
pub mod server;
pub mod service;
pub mod store;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        agent::{handler_fn, AgentDescriptor, AgentRegistry, HandlerContext, MessageHandler},
        config::ServerConfig,
        protocol::error::{A2AError, AgentError},
        protocol::{AgentCard, AgentSkill, Message, Part, Role, Task, TaskState},
        server::A2AServer,
    };
}
