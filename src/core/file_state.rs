//! Type-safe file state enumeration and state filters.
//!
//! This module defines [`FileState`], the closed set of states a path can have
//! relative to the index or the working tree, and [`FileStateSet`], a bitset used
//! for filtering the displayed collections.
//!
//! # Public API
//! - [`FileState`]: One of the nine porcelain states
//! - [`FileStateSet`]: Membership set of states (display filters)
//!
//! # Porcelain codes
//! | code  | state      |
//! |-------|------------|
//! | space | Unmodified |
//! | `M`   | Modified   |
//! | `A`   | Added      |
//! | `D`   | Deleted    |
//! | `R`   | Renamed    |
//! | `C`   | Copied     |
//! | `U`   | Unmerged   |
//! | `?`   | Untracked  |
//! | `!`   | Ignored    |

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a path relative to the index or to the working tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileState {
    Unmodified,
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
    Unmerged,
    Untracked,
    Ignored,
}

impl FileState {
    /// Every state, in declaration order
    pub const ALL: [FileState; 9] = [
        FileState::Unmodified,
        FileState::Modified,
        FileState::Added,
        FileState::Deleted,
        FileState::Renamed,
        FileState::Copied,
        FileState::Unmerged,
        FileState::Untracked,
        FileState::Ignored,
    ];

    /// Map a porcelain status code to a state.
    ///
    /// `T` (type change) is reported by newer git versions and is read as a modification.
    pub fn from_code(code: char) -> Option<FileState> {
        match code {
            ' ' => Some(FileState::Unmodified),
            'M' | 'T' => Some(FileState::Modified),
            'A' => Some(FileState::Added),
            'D' => Some(FileState::Deleted),
            'R' => Some(FileState::Renamed),
            'C' => Some(FileState::Copied),
            'U' => Some(FileState::Unmerged),
            '?' => Some(FileState::Untracked),
            '!' => Some(FileState::Ignored),
            _ => None,
        }
    }

    /// The porcelain code for this state
    pub fn code(&self) -> char {
        match self {
            FileState::Unmodified => ' ',
            FileState::Modified => 'M',
            FileState::Added => 'A',
            FileState::Deleted => 'D',
            FileState::Renamed => 'R',
            FileState::Copied => 'C',
            FileState::Unmerged => 'U',
            FileState::Untracked => '?',
            FileState::Ignored => '!',
        }
    }

    /// Human-readable label used in listings
    pub fn label(&self) -> &'static str {
        match self {
            FileState::Unmodified => "unmodified",
            FileState::Modified => "modified",
            FileState::Added => "added",
            FileState::Deleted => "deleted",
            FileState::Renamed => "renamed",
            FileState::Copied => "copied",
            FileState::Unmerged => "unmerged",
            FileState::Untracked => "untracked",
            FileState::Ignored => "ignored",
        }
    }

    /// True when a record with this index state belongs in the staged collection
    pub fn is_staged_worthy(&self) -> bool {
        !matches!(
            self,
            FileState::Unmodified | FileState::Untracked | FileState::Ignored
        )
    }

    /// True for states whose paths only exist on disk
    pub fn is_untracked_or_ignored(&self) -> bool {
        matches!(self, FileState::Untracked | FileState::Ignored)
    }

    fn flag(&self) -> FileStateSet {
        match self {
            FileState::Unmodified => FileStateSet::UNMODIFIED,
            FileState::Modified => FileStateSet::MODIFIED,
            FileState::Added => FileStateSet::ADDED,
            FileState::Deleted => FileStateSet::DELETED,
            FileState::Renamed => FileStateSet::RENAMED,
            FileState::Copied => FileStateSet::COPIED,
            FileState::Unmerged => FileStateSet::UNMERGED,
            FileState::Untracked => FileStateSet::UNTRACKED,
            FileState::Ignored => FileStateSet::IGNORED,
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

bitflags! {
    /// Set of file states, used to filter which entries of a collection are shown
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FileStateSet: u16 {
        const UNMODIFIED = 1 << 0;
        const MODIFIED = 1 << 1;
        const ADDED = 1 << 2;
        const DELETED = 1 << 3;
        const RENAMED = 1 << 4;
        const COPIED = 1 << 5;
        const UNMERGED = 1 << 6;
        const UNTRACKED = 1 << 7;
        const IGNORED = 1 << 8;
    }
}

impl FileStateSet {
    pub fn from_states(states: &[FileState]) -> Self {
        states
            .iter()
            .fold(FileStateSet::empty(), |set, state| set | state.flag())
    }

    pub fn has(&self, state: FileState) -> bool {
        self.contains(state.flag())
    }

    pub fn add(&mut self, state: FileState) {
        self.insert(state.flag());
    }

    pub fn discard(&mut self, state: FileState) {
        self.remove(state.flag());
    }

    /// Default filter for the staged collection: every state
    pub fn staged_default() -> Self {
        FileStateSet::all()
    }

    /// Default filter for the working tree: ignored and unmodified entries hidden
    pub fn working_tree_default() -> Self {
        FileStateSet::all() - FileStateSet::UNMODIFIED - FileStateSet::IGNORED
    }

    pub fn states(&self) -> Vec<FileState> {
        FileState::ALL
            .iter()
            .copied()
            .filter(|state| self.has(*state))
            .collect()
    }
}
