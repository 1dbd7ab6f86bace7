//! MCP (Model Context Protocol) server implementation.
//!
//! Provides a JSON-RPC over stdio server that exposes west subcommands as
//! tools for Claude Code and other MCP clients.
//!
//! Architecture:
//! - `server.rs`   -- JSON-RPC protocol handler (stdin/stdout)
//! - `tools.rs`    -- tool definitions served by `tools/list`, generated from
//!   the west catalog
//! - `handlers/`   -- tool call dispatch into the build/run/translate pipeline

pub mod handlers;
pub mod server;
pub mod tools;
