//! MCP (Model Context Protocol) server over stdio
//!
//! One JSON-RPC 2.0 message per line in, one response per line out.
//! Notifications are consumed silently.

use scrapekit::{ScrapeRequest, Tool, TOOL_DESCRIPTION};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

const TOOL_NAME: &str = "scrapekit";
const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

/// Incoming JSON-RPC message
#[derive(Debug, Deserialize)]
struct RpcMessage {
    #[serde(default)]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

impl RpcMessage {
    fn is_notification(&self) -> bool {
        self.id.is_none() && self.method.starts_with("notifications/")
    }
}

/// Protocol-level failure, reported in the `error` member
#[derive(Debug, Serialize)]
struct RpcError {
    code: i32,
    message: String,
}

impl RpcError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Outgoing JSON-RPC message
#[derive(Debug, Serialize)]
struct RpcReply {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

impl RpcReply {
    fn new(id: Option<Value>, outcome: Result<Value, RpcError>) -> Self {
        let (result, error) = match outcome {
            Ok(value) => (Some(value), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            jsonrpc: "2.0",
            id,
            result,
            error,
        }
    }
}

/// Tool result content: one text block plus optional extras
fn text_result(text: String, extra: Value) -> Value {
    let mut result = json!({ "content": [{ "type": "text", "text": text }] });
    if let (Some(target), Value::Object(extra)) = (result.as_object_mut(), extra) {
        target.extend(extra);
    }
    result
}

struct McpServer {
    tool: Tool,
}

impl McpServer {
    fn new(tool: Tool) -> Self {
        Self { tool }
    }

    async fn dispatch(&self, message: RpcMessage) -> RpcReply {
        debug!(method = %message.method, "MCP request");
        let outcome = match message.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "tools/list" => Ok(self.tools_list()),
            "tools/call" => self.tools_call(message.params).await,
            other => Err(RpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            )),
        };
        RpcReply::new(message.id, outcome)
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": TOOL_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    fn tools_list(&self) -> Value {
        json!({
            "tools": [{
                "name": TOOL_NAME,
                "description": TOOL_DESCRIPTION,
                "inputSchema": self.tool.input_schema(),
                "outputSchema": self.tool.output_schema()
            }]
        })
    }

    async fn tools_call(&self, params: Value) -> Result<Value, RpcError> {
        let name = params.get("name").and_then(Value::as_str).unwrap_or_default();
        if name != TOOL_NAME {
            return Err(RpcError::new(
                INVALID_PARAMS,
                format!("Unknown tool: {}", name),
            ));
        }

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
        let request: ScrapeRequest = serde_json::from_value(arguments)
            .map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid arguments: {}", e)))?;

        // Scrape failures are tool results, not protocol errors
        Ok(match self.tool.execute(request).await {
            Ok(response) => {
                let text = response.text.clone();
                text_result(text, json!({ "structuredContent": response }))
            }
            Err(e) => {
                warn!(error = %e, "Tool call failed");
                text_result(e.user_message(), json!({ "isError": true }))
            }
        })
    }

    /// Handle one input line; `None` means nothing is written back
    async fn handle_line(&self, line: &str) -> Option<RpcReply> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match serde_json::from_str::<RpcMessage>(line) {
            Ok(message) if message.is_notification() => None,
            Ok(message) => Some(self.dispatch(message).await),
            Err(e) => Some(RpcReply::new(
                None,
                Err(RpcError::new(PARSE_ERROR, format!("Parse error: {}", e))),
            )),
        }
    }

    /// Serve until `input` is exhausted
    async fn serve<R: BufRead, W: Write>(&self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "Failed to read request line");
                    continue;
                }
            };

            if let Some(reply) = self.handle_line(&line).await {
                let json = serde_json::to_string(&reply).map_err(io::Error::other)?;
                writeln!(output, "{}", json)?;
                output.flush()?;
            }
        }
        Ok(())
    }
}

/// Run the MCP server over stdio
pub async fn run_server(tool: Tool) {
    let server = McpServer::new(tool);
    let stdin = io::stdin();
    if let Err(e) = server.serve(stdin.lock(), io::stdout()).await {
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
