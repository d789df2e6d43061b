//! File change records produced by the status parser.
//!
//! A [`FileChange`] describes one path's state on two axes: relative to the index
//! (`index_state`) and relative to the working tree (`worktree_state`). Renamed and
//! copied records additionally carry the old path in `secondary_path`.
//!
//! # Public API
//! - [`FileChange`]: One parsed status record with its selection flag
//! - [`name_from_path`]: Basename rule shared by primary and secondary names
//!
//! # Identity
//! Records are matched across polls by [`FileChange::key`], the concatenation of
//! `primary_path` and `secondary_path`. Two distinct changes can in principle produce
//! the same concatenation; this is a known limitation and is not disambiguated.

use crate::core::file_state::FileState;
use crate::core::vcs::Collection;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub index_state: FileState,
    pub worktree_state: FileState,
    pub primary_path: String,
    /// Old path for renamed and copied records, empty otherwise
    pub secondary_path: String,
    pub primary_name: String,
    pub secondary_name: String,
    selected: bool,
}

impl FileChange {
    pub fn new(
        index_state: FileState,
        worktree_state: FileState,
        primary_path: impl Into<String>,
        secondary_path: impl Into<String>,
    ) -> Self {
        let primary_path = primary_path.into();
        let secondary_path = secondary_path.into();
        Self {
            index_state,
            worktree_state,
            primary_name: name_from_path(&primary_path),
            secondary_name: name_from_path(&secondary_path),
            primary_path,
            secondary_path,
            selected: false,
        }
    }

    /// Identity key used to match the same logical change across polls
    pub fn key(&self) -> String {
        format!("{}{}", self.primary_path, self.secondary_path)
    }

    /// Paths to hand to the version control tool, new path first
    pub fn paths(&self) -> Vec<&str> {
        let mut paths = vec![self.primary_path.as_str()];
        if !self.secondary_path.is_empty() {
            paths.push(self.secondary_path.as_str());
        }
        paths
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// The state shown in a listing: the index state, or the worktree state when
    /// the index side is unchanged.
    pub fn display_state(&self) -> FileState {
        if self.index_state == FileState::Unmodified {
            self.worktree_state
        } else {
            self.index_state
        }
    }

    /// The state relevant to `collection`: index side for staged, worktree side otherwise
    pub fn state_in(&self, collection: Collection) -> FileState {
        match collection {
            Collection::Staged => self.index_state,
            Collection::WorkingTree => self.worktree_state,
        }
    }

    pub fn belongs_in_staged(&self) -> bool {
        self.index_state.is_staged_worthy()
    }

    pub fn belongs_in_working_tree(&self) -> bool {
        let both = |state| self.index_state == state && self.worktree_state == state;
        self.worktree_state.is_staged_worthy()
            || both(FileState::Untracked)
            || both(FileState::Ignored)
    }

    /// Copy the tool-reported fields of `fresh` into this record, keeping the
    /// selection flag.
    pub(crate) fn update_from(&mut self, fresh: &FileChange) {
        self.index_state = fresh.index_state;
        self.worktree_state = fresh.worktree_state;
        self.primary_path.clone_from(&fresh.primary_path);
        self.secondary_path.clone_from(&fresh.secondary_path);
        self.primary_name.clone_from(&fresh.primary_name);
        self.secondary_name.clone_from(&fresh.secondary_name);
    }
}

/// Substring after the last `/`, or the whole path when it has no separator or
/// ends in one (directory entries).
pub fn name_from_path(path: &str) -> String {
    if path.ends_with('/') {
        return path.to_string();
    }
    match path.rfind('/') {
        Some(pos) => path[pos + 1..].to_string(),
        None => path.to_string(),
    }
}
