use std::sync::Arc;

use serde_json::{Value, json};

use liupan_common::{ContentStore, DivinationEngine};

use crate::error::JsonRpcError;
use crate::protocol::JsonRpcResponse;
use crate::tools;

/// MCP protocol version implemented by this server.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Routes JSON-RPC requests to the tool handlers. Stateless: every dispatch
/// is independent and the collaborators are shared immutably, so requests
/// may be processed concurrently without coordination.
pub struct McpRouter {
    store: Arc<dyn ContentStore>,
    engine: Arc<dyn DivinationEngine>,
}

impl McpRouter {
    pub fn new(store: Arc<dyn ContentStore>, engine: Arc<dyn DivinationEngine>) -> Self {
        Self { store, engine }
    }

    /// Dispatch a JSON-RPC request body, evaluated in fixed precedence
    /// order on `(method, params.name)`. `base_url` is the scheme+host the
    /// transport derived for this request; deployed content is addressed
    /// relative to it.
    ///
    /// The request `id` is echoed verbatim. A body without a recognizable
    /// method falls through to "Method not found".
    pub async fn dispatch(&self, body: &Value, base_url: &str) -> JsonRpcResponse {
        let id = body.get("id").cloned();
        let method = body
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let tool = body.pointer("/params/name").and_then(Value::as_str);
        let arguments = body.pointer("/params/arguments");

        match (method, tool) {
            ("initialize", _) => JsonRpcResponse::success(id, initialize_result()),

            ("tools/list", _) => {
                JsonRpcResponse::success(id, json!({ "tools": tools::tool_definitions() }))
            }

            ("tools/call", Some("deploy_html")) => {
                let result = tools::deploy_html(self.store.as_ref(), arguments, base_url).await;
                JsonRpcResponse::success(id, json!(result))
            }

            ("tools/call", Some("calculate_liuren_pan")) => {
                let result = tools::calculate_liuren_pan(self.engine.as_ref(), arguments);
                JsonRpcResponse::success(id, json!(result))
            }

            ("resources/list", _) | ("prompts/list", _) => {
                // empty collection keyed by the method's first path segment
                let key = method.split('/').next().unwrap_or(method);
                JsonRpcResponse::success(id, json!({ key: [] }))
            }

            _ => JsonRpcResponse::error(id, JsonRpcError::method_not_found()),
        }
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "serverInfo": {
            "name": "liupan-mcp-server",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "capabilities": {
            "tools": {}
        }
    })
}
