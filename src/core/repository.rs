//! Repository state owned by a browsing session.
//!
//! [`RepositoryState`] holds the two displayed collections (staged and working tree),
//! the selection cache, per-state counts, the last diff text and the branch list.
//! Collections are mutated in place by [`reconcile`] on every poll so unchanged
//! entries keep their selection flag; they are only cleared wholesale after a commit
//! or checkout succeeds.
//!
//! # Public API
//! - [`RepositoryState`]: The session-owned aggregate
//! - [`reconcile`]: Two-phase merge of freshly parsed records into both collections
//! - [`ReconcileSummary`]: What a merge changed
//! - [`FileStats`]: Per-state counts of the working tree
//!
//! Selection rules live in [`crate::core::selection`].

use crate::core::branch_parser::{self, Branch};
use crate::core::file_change::FileChange;
use crate::core::file_state::{FileState, FileStateSet};
use crate::core::vcs::Collection;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identity key to record, sorted by key
pub type FileCollection = BTreeMap<String, FileChange>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub updated: usize,
    pub removed: usize,
}

impl ReconcileSummary {
    pub fn changed(&self) -> bool {
        self.inserted + self.updated + self.removed > 0
    }
}

/// Merge `fresh` into both collections.
///
/// Removal runs first: an entry survives only if some fresh record that belongs in
/// the same collection has the same identity key. Addition then inserts records
/// whose key is not present yet, and refreshes the states of entries that are,
/// leaving their selection flag alone. A record that lands in both collections is
/// cloned, so the two copies select independently.
pub fn reconcile(
    staged: &mut FileCollection,
    working_tree: &mut FileCollection,
    fresh: &[FileChange],
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    let staged_keys: HashSet<String> = fresh
        .iter()
        .filter(|file| file.belongs_in_staged())
        .map(FileChange::key)
        .collect();
    let working_tree_keys: HashSet<String> = fresh
        .iter()
        .filter(|file| file.belongs_in_working_tree())
        .map(FileChange::key)
        .collect();

    let before = staged.len() + working_tree.len();
    staged.retain(|key, _| staged_keys.contains(key));
    working_tree.retain(|key, _| working_tree_keys.contains(key));
    summary.removed = before - staged.len() - working_tree.len();

    for file in fresh {
        if file.belongs_in_staged() {
            merge_into(staged, file, &mut summary);
        }
        if file.belongs_in_working_tree() {
            merge_into(working_tree, file, &mut summary);
        }
    }

    summary
}

fn merge_into(collection: &mut FileCollection, fresh: &FileChange, summary: &mut ReconcileSummary) {
    match collection.get_mut(&fresh.key()) {
        Some(existing) => {
            if existing.index_state != fresh.index_state || existing.worktree_state != fresh.worktree_state {
                existing.update_from(fresh);
                summary.updated += 1;
            }
        }
        None => {
            let mut copy = fresh.clone();
            copy.set_selected(false);
            collection.insert(fresh.key(), copy);
            summary.inserted += 1;
        }
    }
}

/// Working-tree counts per worktree state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    pub added: usize,
    pub copied: usize,
    pub deleted: usize,
    pub modified: usize,
    pub renamed: usize,
    pub unmerged: usize,
    pub untracked: usize,
}

impl FileStats {
    pub fn from_working_tree(working_tree: &FileCollection) -> Self {
        let mut stats = Self::default();
        for file in working_tree.values() {
            match file.worktree_state {
                FileState::Added => stats.added += 1,
                FileState::Copied => stats.copied += 1,
                FileState::Deleted => stats.deleted += 1,
                FileState::Modified => stats.modified += 1,
                FileState::Renamed => stats.renamed += 1,
                FileState::Unmerged => stats.unmerged += 1,
                FileState::Untracked => stats.untracked += 1,
                FileState::Unmodified | FileState::Ignored => {}
            }
        }
        stats
    }

    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for FileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            (self.added, "added"),
            (self.copied, "copied"),
            (self.deleted, "deleted"),
            (self.modified, "modified"),
            (self.renamed, "renamed"),
            (self.unmerged, "unmerged"),
            (self.untracked, "untracked"),
        ]
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{} {}", count, label))
        .collect();

        if parts.is_empty() {
            f.write_str("Clean")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

#[derive(Debug, Clone)]
pub struct RepositoryState {
    pub(crate) staged: FileCollection,
    pub(crate) working_tree: FileCollection,
    /// Selected entries, working tree first, each in key order
    pub(crate) selection: Vec<(Collection, String)>,
    pub(crate) any_staged_selected: bool,
    pub(crate) any_working_tree_selected: bool,
    pub(crate) staged_filter: FileStateSet,
    pub(crate) working_tree_filter: FileStateSet,
    stats: FileStats,
    diff_text: String,
    repository_root: Option<PathBuf>,
    branches: Vec<Branch>,
    current_branch_index: Option<usize>,
}

impl Default for RepositoryState {
    fn default() -> Self {
        Self {
            staged: FileCollection::new(),
            working_tree: FileCollection::new(),
            selection: Vec::new(),
            any_staged_selected: false,
            any_working_tree_selected: false,
            staged_filter: FileStateSet::staged_default(),
            working_tree_filter: FileStateSet::working_tree_default(),
            stats: FileStats::default(),
            diff_text: String::new(),
            repository_root: None,
            branches: Vec::new(),
            current_branch_index: None,
        }
    }
}

impl RepositoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn staged(&self) -> &FileCollection {
        &self.staged
    }

    pub fn working_tree(&self) -> &FileCollection {
        &self.working_tree
    }

    pub fn collection(&self, collection: Collection) -> &FileCollection {
        match collection {
            Collection::Staged => &self.staged,
            Collection::WorkingTree => &self.working_tree,
        }
    }

    pub(crate) fn collection_mut(&mut self, collection: Collection) -> &mut FileCollection {
        match collection {
            Collection::Staged => &mut self.staged,
            Collection::WorkingTree => &mut self.working_tree,
        }
    }

    pub fn filter(&self, collection: Collection) -> FileStateSet {
        match collection {
            Collection::Staged => self.staged_filter,
            Collection::WorkingTree => self.working_tree_filter,
        }
    }

    pub fn set_filter(&mut self, collection: Collection, filter: FileStateSet) {
        match collection {
            Collection::Staged => self.staged_filter = filter,
            Collection::WorkingTree => self.working_tree_filter = filter,
        }
    }

    /// Entries that pass the collection's filter, in display order.
    ///
    /// Staged entries are filtered on their index state, working-tree entries on
    /// their worktree state.
    pub fn visible(&self, collection: Collection) -> Vec<&FileChange> {
        let filter = self.filter(collection);
        self.collection(collection)
            .values()
            .filter(|file| match collection {
                Collection::Staged => filter.has(file.index_state),
                Collection::WorkingTree => filter.has(file.worktree_state),
            })
            .collect()
    }

    pub fn visible_keys(&self, collection: Collection) -> Vec<String> {
        self.visible(collection).iter().map(|file| file.key()).collect()
    }

    /// Merge a fresh status parse, then refresh counts and the selection cache
    pub fn apply_status(&mut self, fresh: &[FileChange]) -> ReconcileSummary {
        let summary = reconcile(&mut self.staged, &mut self.working_tree, fresh);
        self.stats = FileStats::from_working_tree(&self.working_tree);
        self.revalidate_selection();
        log::debug!(
            "Reconciled status: {} inserted, {} updated, {} removed",
            summary.inserted,
            summary.updated,
            summary.removed
        );
        summary
    }

    /// Drop both collections so the next poll rebuilds them from scratch
    pub fn clear_collections(&mut self) {
        self.staged.clear();
        self.working_tree.clear();
        self.stats = FileStats::default();
        self.diff_text.clear();
        self.revalidate_selection();
    }

    pub fn stats(&self) -> FileStats {
        self.stats
    }

    pub fn diff_text(&self) -> &str {
        &self.diff_text
    }

    pub fn set_diff_text(&mut self, diff: impl Into<String>) {
        self.diff_text = diff.into();
    }

    pub fn clear_diff_text(&mut self) {
        self.diff_text.clear();
    }

    pub fn repository_root(&self) -> Option<&Path> {
        self.repository_root.as_deref()
    }

    pub fn set_repository_root(&mut self, root: Option<PathBuf>) {
        self.repository_root = root;
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn set_branches(&mut self, branches: Vec<Branch>) {
        self.current_branch_index = branch_parser::current_local_index(&branches);
        self.branches = branches;
    }

    /// Index of the current branch among the local branches
    pub fn current_branch_index(&self) -> Option<usize> {
        self.current_branch_index
    }

    pub fn current_branch(&self) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.is_current)
    }
}
