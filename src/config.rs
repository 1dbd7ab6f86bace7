//! Server settings resolved from the process environment.
//!
//! The server owns no configuration file. Everything it needs comes from
//! environment variables set by whoever registers it in an MCP client config:
//! - `WEST_MCP_BIN`     — executable to invoke instead of `west` (mainly for tests)
//! - `WEST_MCP_WORKDIR` — working directory for spawned commands; the server's
//!   own working directory is inherited when unset
//! - `WEST_MCP_LOG_DIR` — log file location override (see `services::logger`)

use std::path::PathBuf;

/// Default executable name, located via `PATH`.
pub const DEFAULT_WEST_BIN: &str = "west";

/// Runtime settings shared by every tool call.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Executable invoked for every command.
    pub west_bin: String,
    /// Working directory for spawned commands, if pinned.
    pub workdir: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        let west_bin = std::env::var("WEST_MCP_BIN")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WEST_BIN.to_string());

        let workdir = std::env::var("WEST_MCP_WORKDIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Self { west_bin, workdir }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            west_bin: DEFAULT_WEST_BIN.to_string(),
            workdir: None,
        }
    }
}
