//! VCS Browser - a polling repository browser core with a terminal host.
//!
//! The library keeps an in-memory model of a repository's staged and working-tree
//! changes, refreshed by parsing the version control tool's porcelain output on a
//! fixed tick, and issues commands (add, remove, commit, checkout, fetch, pull, push,
//! branch management) against the current selection without blocking the host.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - The change model and its porcelain status / ref listing parsers
//! - The asynchronous process runner and the command façade
//! - Reconciliation, the selection engine and the [`BrowserSession`]
//! - Error handling and result types

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    // Session
    AlwaysConfirm,
    BrowserSession,
    // Change model
    Branch,
    Collection,
    CommandOutcome,
    CommandStart,
    Confirm,
    DestructiveAction,
    FileChange,
    FileState,
    FileStateSet,
    FileStats,
    Operation,
    ReconcileSummary,
    RepositoryState,
    Result,
    SelectRequest,
    SelectionMode,
    SessionConfig,
    TickReport,
    // Error handling
    VcsError,
    VcsKind,
};
