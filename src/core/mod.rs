//! Core functionality for the repository browser.
//!
//! This module holds everything that does not print: the change and branch models,
//! the output parsers, the process runner, the command façade, the reconciler, the
//! selection engine and the tick-driven session tying them together. The CLI
//! helpers (index parsing, colors, output) live here too.

pub mod args_parser;
pub mod branch_parser;
pub mod colors;
pub mod command_init;
pub mod config;
pub mod dirs;
pub mod error;
pub mod file_change;
pub mod file_state;
pub mod index_parser;
pub mod output;
pub mod process;
pub mod repository;
pub mod selection;
pub mod session;
pub mod status_parser;
pub mod vcs;

// === Error handling ===
// Core error type and result alias used throughout the crate
pub use error::{Result, VcsError};

// === Change model ===
// File states, state filters and the change records shown in both collections
pub use file_change::FileChange;
pub use file_state::{FileState, FileStateSet};

// === Parsers ===
// Porcelain status and ref listing parsers
pub use branch_parser::{parse_branches, Branch};
pub use status_parser::parse_status;

// === Processes and commands ===
// Asynchronous process runner and the version control command façade
pub use process::{ExitCallback, ProcessHandle, ProcessOutput, ProcessRunner, CANCELLED_EXIT_CODE};
pub use vcs::{
    Collection, CommandFacade, CommandLine, FetchTarget, Git, Hg, PullOptions, PushRefSpec, VcsKind,
    VersionControl,
};

// === Repository state ===
// Reconciled collections, selection engine and the browsing session
pub use repository::{reconcile, FileStats, ReconcileSummary, RepositoryState};
pub use selection::{SelectRequest, SelectionMode};
pub use session::{
    AlwaysConfirm, BrowserSession, CommandOutcome, CommandStart, Confirm, DestructiveAction, Operation,
    TickReport,
};

// === Configuration ===
pub use config::SessionConfig;

// === Index parsing ===
// Parser for handling user input like "1 3-5,8" -> [1, 3, 4, 5, 8]
pub use args_parser::ArgsParser;
pub use index_parser::{IndexParser, IndexRange};

// === Command initialization ===
// Session opening and index-to-selection setup shared by the CLI commands
pub use command_init::{IndexCommandContext, IndexCommandInit, SessionOptions};

// === Color system ===
pub use colors::{format_file_line, get_aligned_code, get_colored_path, get_state_color_style};

// === Output formatting ===
// Unified output formatting for consistent CLI presentation
pub use output::{
    print_command_output, print_error, print_error_with_structured_usage, print_info, print_section_header,
    print_success,
};
