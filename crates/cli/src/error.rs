//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: animation error (unknown animation, bad dimensions, bad scene)
//! - 11: I/O error (scene read, snapshot write)
//! - 12: input error (bad theme, pointer or JSON params)
//! - 13: serialization error

use backdrop_core::BackdropError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// An animation-level error (unknown animation, bad dimensions).
    Animation(BackdropError),
    /// An I/O error (scene file read, snapshot write).
    Io(String),
    /// A user input error (bad theme, pointer or params).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Animation(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Animation(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<BackdropError> for CliError {
    fn from(e: BackdropError) -> Self {
        match e {
            BackdropError::Io(msg) => CliError::Io(msg),
            BackdropError::InvalidTheme(_) => CliError::Input(e.to_string()),
            other => CliError::Animation(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}
