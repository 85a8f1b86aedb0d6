//! Agents: descriptors, the registry that owns them, and discovery cards

pub mod card;
pub mod descriptor;
pub mod handler;
pub mod registry;

pub use card::generate_card;
pub use descriptor::{strip_scheme, AgentDescriptor};
pub use handler::{handler_fn, AgentLogger, FnHandler, HandlerContext, MessageHandler};
pub use registry::AgentRegistry;
