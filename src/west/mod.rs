//! Translation layer from named tools to west command lines.
//!
//! - `catalog.rs` -- static table of tool descriptors (name, parameter schema,
//!   flag-rendering rules), one entry per exposed west subcommand
//! - `args.rs`    -- command builder: validated arguments -> ordered token vector
//! - `runner.rs`  -- subprocess executor and result translator
//! - `help.rs`    -- `west --help` parser for subcommand discovery

pub mod args;
pub mod catalog;
pub mod help;
pub mod runner;
