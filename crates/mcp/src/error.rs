use serde::{Deserialize, Serialize};

use liupan_common::{DeployError, DivinationError};

use crate::protocol::ToolCallResult;

/// JSON-RPC 2.0 "method not found".
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Server error used for top-level fatal failures (malformed input,
/// anything escaping the dispatch path).
pub const INTERNAL_ERROR: i32 = -32000;

/// Fixed user-facing message for storage-layer deployment failures.
/// Internal storage detail is never surfaced to the caller.
pub const STORAGE_ERROR_MESSAGE: &str =
    "Failed to save content to storage. Please try again later.";

/// Structured JSON-RPC 2.0 error object sent in error responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcError {
    pub fn method_not_found() -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: "Method not found".to_string(),
        }
    }

    pub fn internal_server_error() -> Self {
        Self {
            code: INTERNAL_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

/// Failures raised while handling a tool invocation: argument validation
/// plus the two collaborator error types.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Missing required argument: {name}")]
    MissingArgument { name: &'static str },

    #[error("{message}")]
    InvalidArgument { message: String },

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Divination(#[from] DivinationError),
}

impl ToolError {
    /// Collapse the failure into a renderable tool result. Never fails:
    /// storage-layer deploy errors map to the fixed [`STORAGE_ERROR_MESSAGE`],
    /// everything else passes its own message through.
    pub fn normalize(&self) -> ToolCallResult {
        tracing::error!(error = %self, "tool call failed");

        let message = match self {
            ToolError::Deploy(DeployError::Storage { .. }) => STORAGE_ERROR_MESSAGE.to_string(),
            other => {
                let text = other.to_string();
                if text.is_empty() {
                    "Unknown error occurred".to_string()
                } else {
                    text
                }
            }
        };
        ToolCallResult::error_text(format!("Error: {message}"))
    }
}
