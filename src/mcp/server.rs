//! MCP JSON-RPC protocol handler over stdio.
//!
//! Reads JSON-RPC requests from stdin, routes tool calls to the west
//! pipeline, and sends JSON-RPC responses to stdout. Implements the MCP
//! protocol methods: `initialize`, `initialized`, `tools/list`,
//! `tools/call`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use super::handlers;
use super::tools;
use crate::config::Settings;

// ---------------------------------------------------------------------------
// JSON-RPC message types
// ---------------------------------------------------------------------------

/// Incoming JSON-RPC request.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// Outgoing JSON-RPC response.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

/// Run the MCP server on stdin/stdout.
///
/// Reads JSON-RPC messages line-by-line from stdin, dispatches them, and
/// writes responses to stdout. Diagnostic logs go to stderr and the log
/// file; stdout carries nothing but protocol frames. Returns when stdin
/// closes.
pub async fn run_server(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut writer = tokio::io::stdout();
    let mut lines = reader.lines();

    info!("west-mcp server running on stdio");

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                let response =
                    JsonRpcResponse::error(Value::Null, -32700, format!("Invalid JSON: {}", e));
                write_response(&mut writer, &response).await;
                continue;
            }
        };

        if request.jsonrpc != "2.0" {
            if let Some(id) = request.id {
                let response = JsonRpcResponse::error(id, -32600, "Invalid JSON-RPC version");
                write_response(&mut writer, &response).await;
            }
            continue;
        }

        let response = handle_request(&settings, &request).await;

        // Notifications (no id) don't get a response
        if request.id.is_none() {
            continue;
        }

        if let Some(response) = response {
            write_response(&mut writer, &response).await;
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Handle a single JSON-RPC request and return a response.
async fn handle_request(
    settings: &Settings,
    request: &JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    let id = request.id.clone().unwrap_or(Value::Null);

    match request.method.as_str() {
        "initialize" => Some(handle_initialize(id)),
        "initialized" | "notifications/initialized" => {
            info!("Client sent 'initialized' notification");
            None
        }
        "tools/list" => Some(handle_tools_list(id)),
        "tools/call" => Some(handle_tools_call(settings, id, &request.params).await),
        "notifications/cancelled" => {
            // Client cancelled a request -- just log it
            info!("Request cancelled: {:?}", request.params);
            None
        }
        _ => Some(JsonRpcResponse::error(
            id,
            -32601,
            format!("Unknown method: {}", request.method),
        )),
    }
}

/// Handle `initialize` -- return server capabilities.
fn handle_initialize(id: Value) -> JsonRpcResponse {
    JsonRpcResponse::success(
        id,
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": "west-mcp",
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

/// Handle `tools/list` -- return the catalog's tool definitions.
fn handle_tools_list(id: Value) -> JsonRpcResponse {
    let tool_values: Vec<Value> = tools::list_tools()
        .into_iter()
        .map(|t| {
            json!({
                "name": t.name,
                "description": t.description,
                "inputSchema": t.input_schema,
            })
        })
        .collect();

    JsonRpcResponse::success(id, json!({ "tools": tool_values }))
}

/// Handle `tools/call` -- dispatch into the west pipeline.
async fn handle_tools_call(settings: &Settings, id: Value, params: &Value) -> JsonRpcResponse {
    let tool_name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
    if tool_name.is_empty() {
        return JsonRpcResponse::error(id, -32602, "Missing tool name in params");
    }

    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return JsonRpcResponse::error(id, -32602, "Tool arguments must be an object"),
    };

    let result = handlers::west::handle_tool(settings, tool_name, &arguments).await;

    match serde_json::to_value(&result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, -32603, format!("Failed to serialize tool result: {}", e)),
    }
}

/// Write a JSON-RPC response to stdout (one line).
async fn write_response<W: AsyncWriteExt + Unpin>(writer: &mut W, response: &JsonRpcResponse) {
    match serde_json::to_string(response) {
        Ok(json) => {
            let line = format!("{}\n", json);
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                error!("Failed to write response: {}", e);
            }
            if let Err(e) = writer.flush().await {
                error!("Failed to flush stdout: {}", e);
            }
        }
        Err(e) => {
            error!("Failed to serialize response: {}", e);
        }
    }
}
