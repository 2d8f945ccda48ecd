mod error;
mod format;
mod tools;

pub mod protocol;
pub mod router;

pub use error::{INTERNAL_ERROR, JsonRpcError, METHOD_NOT_FOUND, STORAGE_ERROR_MESSAGE, ToolError};
pub use format::format_chart;
pub use protocol::{JsonRpcResponse, ToolCallResult, ToolContent, ToolDefinition};
pub use router::{McpRouter, PROTOCOL_VERSION};
