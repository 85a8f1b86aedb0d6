//! JSON-RPC 2.0 codec for the A2A protocol
//!
//! Decodes inbound request envelopes and encodes response envelopes. Envelope
//! problems are reported together with whatever request id could be
//! recovered, so the error response can still echo it.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{codec::Codec, protocol::error::A2AError};

/// The only protocol version accepted
pub const JSONRPC_VERSION: &str = "2.0";

/// A validated JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    /// Caller's request id, `null` when absent
    pub id: Value,
    pub method: String,
    pub params: Option<Value>,
}

/// Envelope as received, before validation
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    jsonrpc: Option<Value>,
    #[serde(default)]
    method: Option<Value>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
}

/// JSON-RPC 2.0 response envelope
///
/// Carries either `result` or `error`, never both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: &A2AError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError::from(error)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl From<&A2AError> for JsonRpcError {
    fn from(error: &A2AError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
            data: error.data(),
        }
    }
}

/// Envelope decoding failure with the recovered request id
#[derive(Debug)]
pub struct DecodeError {
    pub id: Value,
    pub error: A2AError,
}

impl DecodeError {
    fn new(id: Value, error: A2AError) -> Self {
        Self { id, error }
    }
}

/// JSON-RPC 2.0 codec
#[derive(Debug, Clone, Default)]
pub struct JsonRpcCodec;

impl JsonRpcCodec {
    pub fn new() -> Self {
        Self
    }

    fn validate(raw: RawEnvelope) -> Result<JsonRpcRequest, DecodeError> {
        let id = match raw.id {
            None => Value::Null,
            Some(id @ (Value::Null | Value::String(_) | Value::Number(_))) => id,
            Some(_) => {
                return Err(DecodeError::new(
                    Value::Null,
                    A2AError::InvalidRequest("id must be a string, number or null".into()),
                ))
            }
        };

        match raw.jsonrpc {
            Some(Value::String(ref version)) if version == JSONRPC_VERSION => {}
            _ => {
                return Err(DecodeError::new(
                    id,
                    A2AError::InvalidRequest(format!("jsonrpc must be \"{}\"", JSONRPC_VERSION)),
                ))
            }
        }

        let method = match raw.method {
            Some(Value::String(method)) if !method.is_empty() => method,
            _ => {
                return Err(DecodeError::new(
                    id,
                    A2AError::InvalidRequest("method must be a non-empty string".into()),
                ))
            }
        };

        Ok(JsonRpcRequest {
            id,
            method,
            params: raw.params,
        })
    }
}

impl Codec for JsonRpcCodec {
    fn decode_request(&self, body: &[u8]) -> Result<JsonRpcRequest, DecodeError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| DecodeError::new(Value::Null, A2AError::Parse(e.to_string())))?;

        if value.is_array() {
            return Err(DecodeError::new(
                Value::Null,
                A2AError::InvalidRequest("batch requests are not supported".into()),
            ));
        }
        if !value.is_object() {
            return Err(DecodeError::new(
                Value::Null,
                A2AError::InvalidRequest("request must be a JSON object".into()),
            ));
        }

        let raw: RawEnvelope = serde_json::from_value(value)
            .map_err(|e| DecodeError::new(Value::Null, A2AError::InvalidRequest(e.to_string())))?;

        Self::validate(raw)
    }

    fn encode_response(&self, response: &JsonRpcResponse) -> Result<Bytes, A2AError> {
        let bytes = serde_json::to_vec(response)?;
        Ok(Bytes::from(bytes))
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}
