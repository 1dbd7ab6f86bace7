//! Process executor and result translator.
//!
//! Runs one west command per call: tokens are passed as an argument vector
//! (never concatenated into a shell string), stdout and stderr are captured
//! in full, and the exit status is folded into a `CommandEnvelope`. A missing
//! executable, a launch fault, and a nonzero exit produce distinguishable
//! envelopes; none of them escape as errors.

use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{error, info};

use crate::config::Settings;

/// The uniform result shape returned for every operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub success: bool,
    pub message: String,
    pub stdout: String,
    pub stderr: String,
}

impl CommandEnvelope {
    /// Failure envelope with no captured streams. Used for validation errors
    /// and launch failures, where no subprocess ever produced output.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// Spawn `west <tokens>`, wait for it to exit, and translate the outcome.
pub async fn run_west(settings: &Settings, tokens: &[String]) -> CommandEnvelope {
    info!("Executing command: {} {}", settings.west_bin, tokens.join(" "));

    let mut command = Command::new(&settings.west_bin);
    command.args(tokens).stdin(Stdio::null());
    if let Some(dir) = &settings.workdir {
        command.current_dir(dir);
    }

    let output = match command.output().await {
        Ok(output) => output,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!(
                "'{}' command not found. Ensure west is installed and in your system's PATH.",
                settings.west_bin
            );
            return CommandEnvelope::failure(format!(
                "'{}' command not found. Please ensure west is installed and in your system's PATH.",
                settings.west_bin
            ));
        }
        Err(e) => {
            error!("Failed to launch '{}': {}", settings.west_bin, e);
            return CommandEnvelope::failure(format!(
                "Failed to launch '{}': {}",
                settings.west_bin, e
            ));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let envelope = translate(
        tokens.first().map(String::as_str),
        output.status.code(),
        stdout,
        stderr,
    );

    if envelope.success {
        info!("Command successful: {} {}", settings.west_bin, tokens.join(" "));
    } else {
        error!("{} {} {}", envelope.message, settings.west_bin, tokens.join(" "));
    }

    envelope
}

/// Fold (exit code, stdout, stderr) into the uniform envelope.
///
/// Pure and total: exit code zero is the only success, and the captured
/// streams pass through verbatim in every case so callers always get the raw
/// diagnostic text. A `None` exit code means the child was terminated by a
/// signal.
pub fn translate(
    subcommand: Option<&str>,
    code: Option<i32>,
    stdout: String,
    stderr: String,
) -> CommandEnvelope {
    if code == Some(0) {
        return CommandEnvelope {
            success: true,
            message: "Command executed successfully.".to_string(),
            stdout,
            stderr,
        };
    }

    let lower = stderr.to_lowercase();
    let message = if lower.contains("unknown command") || lower.contains("invalid choice") {
        format!(
            "West subcommand '{}' not found or invalid.",
            subcommand.unwrap_or("<none>")
        )
    } else {
        match code {
            Some(code) => format!("Command failed with exit code {}.", code),
            None => "Command terminated by a signal.".to_string(),
        }
    };

    CommandEnvelope {
        success: false,
        message,
        stdout,
        stderr,
    }
}
