//! Unified error types for the scriptlet toolkit.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Why a template failed to transpile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformation {
    /// Input ended inside a `<% ... %>` block (or right after a bare `<%`).
    UnterminatedCode,
    /// Input ended inside a `<%= ... %>` block.
    UnterminatedExpression,
    /// The scanner reached its invalid state.
    NoTransition,
}

impl fmt::Display for Malformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedCode => f.write_str("unterminated code directive"),
            Self::UnterminatedExpression => f.write_str("unterminated expression directive"),
            Self::NoTransition => f.write_str("no transition for input character"),
        }
    }
}

/// All errors that can occur during scriptlet operations.
#[derive(Error, Debug)]
pub enum ScriptletError {
    // --- Scanning ---

    /// The template could not be transpiled. For unterminated directives the
    /// position is that of the `<` that opened the directive.
    #[error("malformed template: {reason} at line {line}, column {column}")]
    MalformedTemplate {
        reason: Malformation,
        line: usize,
        column: usize,
    },

    /// Pulling the next character from the input failed (I/O error or invalid UTF-8).
    #[error("failed to read template input")]
    InputRead(#[source] std::io::Error),

    /// The scan did not finish within the caller's time limit.
    #[error("transpilation timed out after {0:?}")]
    ScanTimeout(Duration),

    /// The template file to transpile was not found.
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    // --- Configuration ---

    /// The configuration file (`scriptlet.config.json`) was not found.
    #[error("config file not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file exists but contains invalid JSON.
    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Refused to overwrite an existing configuration file.
    #[error("config file already exists: {0}")]
    ConfigExists(PathBuf),

    /// The named delimiter preset does not exist.
    #[error("unknown preset: {0} (supported: embedded-javascript, print, markers)")]
    UnknownPreset(String),

    // --- Execution ---

    /// The downstream script executor rejected or failed to run the script.
    #[error("script execution failed: {0}")]
    Execution(String),

    // --- General ---

    /// A filesystem I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A catch-all for errors from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Alias for `Result<T, ScriptletError>`.
pub type Result<T> = std::result::Result<T, ScriptletError>;
