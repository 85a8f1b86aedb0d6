//! Serialization codecs for protocol bindings

pub mod jsonrpc;

pub use jsonrpc::{DecodeError, JsonRpcCodec, JsonRpcError, JsonRpcRequest, JsonRpcResponse};

use bytes::Bytes;

use crate::protocol::error::A2AError;

/// Codec trait for decoding requests and encoding responses of a binding
pub trait Codec: Send + Sync {
    /// Deserialize and validate a request envelope
    ///
    /// # Arguments
    ///
    /// * `body` - The raw request body
    ///
    /// # Returns
    ///
    /// The validated envelope, or the envelope error with the request id that
    /// could be recovered
    fn decode_request(&self, body: &[u8]) -> Result<JsonRpcRequest, DecodeError>;

    /// Serialize a response envelope for transport
    fn encode_response(&self, response: &JsonRpcResponse) -> Result<Bytes, A2AError>;

    /// Get the content type for this codec
    ///
    /// # Returns
    ///
    /// The MIME type (e.g., "application/json")
    fn content_type(&self) -> &str;
}
