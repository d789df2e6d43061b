//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`VcsError`] which covers every failure mode of the browser core:
//! launching the version control executable, bounded waits, rejected commands, and
//! malformed tool output. It uses `thiserror` for ergonomic error definitions and
//! includes constructors for the common failure scenarios.
//!
//! # Public API
//! - [`VcsError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, VcsError>`
//!
//! # Error Categories
//! - **Process errors**: launch failure, timeout, non-zero exit, cancellation
//! - **Parse errors**: malformed porcelain status or ref listing output
//! - **Session errors**: busy session, empty selection, unsupported backend
//! - **Index parsing**: invalid format, out of bounds, validation errors
//! - **Configuration**: unreadable or malformed config files

use crate::core::vcs::VcsKind;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Domain-specific error types for the repository browser
#[derive(Error, Debug)]
pub enum VcsError {
    // Repository errors
    #[error("Not in a repository")]
    NotInRepository,

    // Process errors
    #[error("Failed to launch '{program}': {source}")]
    ProcessLaunch {
        program: String,
        source: std::io::Error,
    },

    #[error("Command '{command}' did not finish within {} ms", .timeout.as_millis())]
    Timeout { command: String, timeout: Duration },

    #[error("Command '{command}' failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Process was cancelled before completion")]
    Cancelled,

    // Parse errors
    #[error("Malformed status record '{field}': {reason}")]
    StatusParse { field: String, reason: &'static str },

    #[error("Malformed ref listing line '{line}': {reason}")]
    BranchParse { line: String, reason: &'static str },

    // Session errors
    #[error("{operation} is not supported for {vcs}")]
    Unsupported {
        vcs: VcsKind,
        operation: &'static str,
    },

    #[error("Another command is still running")]
    Busy,

    #[error("No files selected")]
    NothingSelected,

    #[error("Commit message is empty")]
    EmptyCommitMessage,

    #[error("No remote configured")]
    NoRemote,

    #[error("HEAD is detached; name a branch explicitly")]
    NoCurrentBranch,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Index parsing errors
    #[error("No file indices provided. Usage: <command> <indices>\nExample: add 1 3-5,8")]
    NoIndicesProvided,

    #[error("Invalid index format: {input}. Use format like: 1, 1-3, or 1,3,5")]
    InvalidIndexFormat { input: String },

    #[error("No valid indices provided. Use format like: 1, 1-3, or 1,3,5")]
    NoValidIndices,

    #[error("Invalid range format: '{range}'. Use format like '3-6'")]
    InvalidRangeFormat { range: String },

    #[error("Invalid number in range: '{number}'")]
    InvalidRangeNumber { number: String },

    #[error("Invalid range: start ({start}) must be <= end ({end})")]
    InvalidRangeOrder { start: usize, end: usize },

    #[error("Invalid number: '{number}'")]
    InvalidNumber { number: String },

    #[error("Index must be positive (got 0)")]
    ZeroIndex,

    #[error("Index {index} is out of range (1-{max} available)")]
    IndexOutOfRange { index: usize, max: usize },

    #[error("No files available to operate on")]
    NoFilesAvailable,

    // Configuration errors
    #[error("Failed to read config file '{path}': {source}")]
    ConfigReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using VcsError
pub type Result<T> = std::result::Result<T, VcsError>;

impl VcsError {
    /// Create a process launch error
    pub fn process_launch(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::ProcessLaunch {
            program: program.into(),
            source,
        }
    }

    /// Create a timeout error for a bounded wait
    pub fn timeout(command: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            command: command.into(),
            timeout,
        }
    }

    /// Create a command failed error from a non-zero exit
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Create a status parse error
    pub fn status_parse(field: impl Into<String>, reason: &'static str) -> Self {
        Self::StatusParse {
            field: field.into(),
            reason,
        }
    }

    /// Create a branch parse error
    pub fn branch_parse(line: impl Into<String>, reason: &'static str) -> Self {
        Self::BranchParse {
            line: line.into(),
            reason,
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(vcs: VcsKind, operation: &'static str) -> Self {
        Self::Unsupported { vcs, operation }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(index: usize, max: usize) -> Self {
        Self::IndexOutOfRange { index, max }
    }

    /// Create an invalid index format error
    pub fn invalid_index_format(input: impl Into<String>) -> Self {
        Self::InvalidIndexFormat {
            input: input.into(),
        }
    }

    /// Create an invalid range format error
    pub fn invalid_range_format(range: impl Into<String>) -> Self {
        Self::InvalidRangeFormat {
            range: range.into(),
        }
    }

    /// Create an invalid range number error
    pub fn invalid_range_number(number: impl Into<String>) -> Self {
        Self::InvalidRangeNumber {
            number: number.into(),
        }
    }

    /// Create an invalid range order error
    pub fn invalid_range_order(start: usize, end: usize) -> Self {
        Self::InvalidRangeOrder { start, end }
    }

    /// Create an invalid number error
    pub fn invalid_number(number: impl Into<String>) -> Self {
        Self::InvalidNumber {
            number: number.into(),
        }
    }

    /// Create a config read failed error
    pub fn config_read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigReadFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a config parse failed error
    pub fn config_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParseFailed {
            path: path.into(),
            source,
        }
    }

    /// True for failures caused by the tool's output or our wait bound rather
    /// than the tool rejecting the command.
    pub fn is_parse_or_timeout(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::StatusParse { .. } | Self::BranchParse { .. }
        )
    }
}
