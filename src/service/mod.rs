//! Tower Service implementations

pub mod core;
pub mod dispatcher;
pub mod request;

pub use core::A2AProtocolService;
pub use dispatcher::{RpcDispatcher, RpcOutcome, RpcTarget};
pub use request::{A2ARequest, RequestContext};
