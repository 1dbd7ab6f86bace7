//! Parser for `west --help` output.
//!
//! West lists its subcommands in sections whose headers start with
//! `built-in commands` or `extension commands` (several of each; extension
//! sections appear per providing project). Each listing line is
//! `name:  one-line description`, indented under its header. The parser
//! flattens all sections into one deduplicated list, built-in and extension
//! commands merged.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// First token of a listing line, e.g. `init:` or `build`.
static COMMAND_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\S+)").unwrap());

/// Extract the flat command list from help output.
///
/// Order is first-seen; a name appearing in several sections is kept once.
pub fn parse_command_list(help_output: &str) -> Vec<String> {
    let mut commands = Vec::new();
    let mut seen = HashSet::new();
    let mut in_section = false;

    for raw in help_output.lines() {
        let line = raw.trim();

        if is_section_header(line) {
            in_section = true;
            continue;
        }
        if line.is_empty() {
            in_section = false;
            continue;
        }
        if !in_section {
            continue;
        }

        if let Some(captures) = COMMAND_NAME_RE.captures(line) {
            let name = captures[1].trim_end_matches(':').to_string();
            if !name.is_empty() && seen.insert(name.clone()) {
                commands.push(name);
            }
        }
    }

    commands
}

/// Section headers end with a colon and name the command class, e.g.
/// `built-in commands for managing git repositories:` or
/// `extension commands from project manifest:`.
fn is_section_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.ends_with(':')
        && (lower.starts_with("built-in commands") || lower.starts_with("extension commands"))
}
