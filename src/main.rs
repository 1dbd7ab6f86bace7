//! MCP server binary exposing the Zephyr `west` build tool as structured tools.
//!
//! Spawned by an MCP client (e.g. Claude Code) and driven over stdio with
//! JSON-RPC 2.0. stdout is reserved for protocol frames; all diagnostics go
//! to stderr and the rolling log file.
//!
//! Environment variables:
//! - `WEST_MCP_BIN`     — executable to invoke instead of `west`
//! - `WEST_MCP_WORKDIR` — working directory for spawned commands
//! - `WEST_MCP_LOG_DIR` — log file location override
//! - `RUST_LOG`         — log filter (defaults to `info`)

use tracing::{info, warn};

use west_mcp::config::Settings;
use west_mcp::mcp::server::run_server;
use west_mcp::services;

#[tokio::main]
async fn main() {
    services::logger::init();

    let settings = Settings::from_env();

    // Probe for the executable up front so a missing installation shows up
    // in the logs at startup, not only on the first tool call.
    match which::which(&settings.west_bin) {
        Ok(path) => info!("Using west executable at {}", path.display()),
        Err(_) => warn!(
            "'{}' not found in PATH; tool calls will fail until it is installed",
            settings.west_bin
        ),
    }

    if let Err(e) = run_server(settings).await {
        eprintln!("[west-mcp] Server error: {}", e);
        std::process::exit(1);
    }
}
