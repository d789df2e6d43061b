//! Parser for ref listings and the symbolic HEAD ref.
//!
//! Converts `for-each-ref --format=%(refname) refs/heads refs/remotes` output into
//! typed [`Branch`] records and marks the current local branch using the output of
//! `symbolic-ref HEAD`.
//!
//! # Public API
//! - [`Branch`]: One local or remote branch
//! - [`parse_branches`]: Build the branch list from the two command outputs
//! - [`local_branch_names`], [`remote_names`], [`remote_branches`], [`current_local_index`]:
//!   Derived views used by branch pickers

use crate::core::error::{Result, VcsError};
use serde::Serialize;

const LOCAL_PREFIX: &str = "refs/heads";
const REMOTE_PREFIX: &str = "refs/remotes";
/// Byte offset of the remote name in `refs/remotes/<remote>/<branch>`
const REMOTE_NAME_OFFSET: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    pub name: String,
    pub remote_name: Option<String>,
    pub is_remote: bool,
    pub is_current: bool,
}

impl Branch {
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remote_name: None,
            is_remote: false,
            is_current: false,
        }
    }

    pub fn remote(remote_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remote_name: Some(remote_name.into()),
            is_remote: true,
            is_current: false,
        }
    }

    /// `name` for local branches, `remote/name` for remote ones
    pub fn display_name(&self) -> String {
        match &self.remote_name {
            Some(remote) => format!("{}/{}", remote, self.name),
            None => self.name.clone(),
        }
    }
}

/// Parse the ref listing and resolve the current branch.
///
/// `head_exit_code` is the exit code of the `symbolic-ref HEAD` query. Any non-zero
/// code (detached HEAD) leaves every branch non-current. A remote name that equals
/// the current branch name is never marked current.
pub fn parse_branches(ref_list: &str, head_ref: &str, head_exit_code: i32) -> Result<Vec<Branch>> {
    let mut branches = Vec::new();

    for line in ref_list.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(LOCAL_PREFIX) {
            let name = name_after_last_slash(line);
            if name.is_empty() {
                return Err(VcsError::branch_parse(line, "empty branch name"));
            }
            branches.push(Branch::local(name));
        } else if line.starts_with(REMOTE_PREFIX) {
            let last_slash = line
                .rfind('/')
                .filter(|pos| *pos > REMOTE_NAME_OFFSET)
                .ok_or_else(|| VcsError::branch_parse(line, "missing remote name"))?;
            let remote = &line[REMOTE_NAME_OFFSET..last_slash];
            let name = &line[last_slash + 1..];
            if name == "HEAD" {
                continue;
            }
            if name.is_empty() {
                return Err(VcsError::branch_parse(line, "empty branch name"));
            }
            branches.push(Branch::remote(remote, name));
        } else {
            return Err(VcsError::branch_parse(line, "not a branch ref"));
        }
    }

    if head_exit_code == 0 {
        let current = name_after_last_slash(head_ref.trim_end());
        if let Some(branch) = branches
            .iter_mut()
            .find(|branch| !branch.is_remote && branch.name == current)
        {
            branch.is_current = true;
        }
    }

    log::debug!("Parsed {} branches", branches.len());
    Ok(branches)
}

fn name_after_last_slash(line: &str) -> &str {
    match line.rfind('/') {
        Some(pos) => &line[pos + 1..],
        None => line,
    }
}

pub fn local_branch_names(branches: &[Branch]) -> Vec<&str> {
    branches
        .iter()
        .filter(|branch| !branch.is_remote)
        .map(|branch| branch.name.as_str())
        .collect()
}

/// Distinct remote names in first-seen order
pub fn remote_names(branches: &[Branch]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for remote in branches.iter().filter_map(|branch| branch.remote_name.as_deref()) {
        if !names.contains(&remote) {
            names.push(remote);
        }
    }
    names
}

pub fn remote_branches<'a>(branches: &'a [Branch], remote: &str) -> Vec<&'a Branch> {
    branches
        .iter()
        .filter(|branch| branch.remote_name.as_deref() == Some(remote))
        .collect()
}

/// Position of the current branch within [`local_branch_names`]
pub fn current_local_index(branches: &[Branch]) -> Option<usize> {
    branches
        .iter()
        .filter(|branch| !branch.is_remote)
        .position(|branch| branch.is_current)
}
