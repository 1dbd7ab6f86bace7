//! Tool call dispatch: catalog lookup, command discovery, arbitrary fallback.
//!
//! Every handler resolves to a serialized envelope -- validation errors and
//! launch failures included -- so the caller always receives the same result
//! shape regardless of where in the pipeline a call stopped.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use super::McpToolResult;
use crate::config::Settings;
use crate::west::runner::CommandEnvelope;
use crate::west::{args, catalog, help, runner};

/// Handle one `tools/call` request.
pub async fn handle_tool(
    settings: &Settings,
    name: &str,
    arguments: &Map<String, Value>,
) -> McpToolResult {
    // Discovery gets its own path: the envelope is augmented with the
    // parsed command list.
    if name == "list_west_commands" {
        return handle_list_commands(settings).await;
    }

    let Some(spec) = catalog::find(name) else {
        return McpToolResult::error(format!("Unknown tool: {}", name));
    };

    let tokens = match args::build_tokens(spec, arguments) {
        Ok(tokens) => tokens,
        Err(message) => {
            warn!("Rejected call to '{}': {}", name, message);
            return json_result(&CommandEnvelope::failure(message));
        }
    };

    let envelope = runner::run_west(settings, &tokens).await;
    json_result(&envelope)
}

/// Envelope carrying the parsed command list for `list_west_commands`.
#[derive(Debug, Serialize)]
struct CommandListing {
    success: bool,
    message: String,
    commands: Vec<String>,
    stdout: String,
    stderr: String,
}

/// Run `west --help` and parse the flat, deduplicated subcommand list,
/// built-in and extension commands merged.
async fn handle_list_commands(settings: &Settings) -> McpToolResult {
    let envelope = runner::run_west(settings, &["--help".to_string()]).await;

    let listing = if envelope.success {
        let commands = help::parse_command_list(&envelope.stdout);
        CommandListing {
            success: true,
            message: format!("Found {} west commands.", commands.len()),
            commands,
            stdout: envelope.stdout,
            stderr: envelope.stderr,
        }
    } else {
        CommandListing {
            success: false,
            message: "Failed to retrieve west help output.".to_string(),
            commands: Vec::new(),
            stdout: envelope.stdout,
            stderr: envelope.stderr,
        }
    };

    json_result(&listing)
}

fn json_result<T: Serialize>(value: &T) -> McpToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(json) => McpToolResult::text(json),
        Err(e) => McpToolResult::error(format!("Failed to serialize result: {}", e)),
    }
}
