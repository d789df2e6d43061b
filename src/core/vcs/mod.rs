//! Version control abstraction and command façade.
//!
//! [`VersionControl`] implementations are pure: they build [`CommandLine`]s and parse
//! tool output, nothing more. [`CommandFacade`] pairs one of them with a
//! [`ProcessRunner`] and owns the behaviors that need more than one command: the
//! bounded synchronous queries, staging untracked files before a commit, turning
//! "remove" on a staged file into an unstage, and deleting untracked files with
//! `clean` since `rm` does not know them. Launched commands always capture their
//! output so a failure carries its stderr.
//!
//! # Public API
//! - [`VersionControl`]: Command builders and output parsers for one tool
//! - [`Git`], [`Hg`]: The two backends (Mercurial is unimplemented)
//! - [`CommandFacade`]: Runs the built commands
//! - [`VcsKind`], [`Collection`], [`FetchTarget`], [`PullOptions`], [`PushRefSpec`]: Request types

mod command;
mod git;
mod hg;

pub use command::CommandLine;
pub use git::Git;
pub use hg::Hg;

use crate::core::branch_parser::Branch;
use crate::core::config::SessionConfig;
use crate::core::error::{Result, VcsError};
use crate::core::file_change::FileChange;
use crate::core::file_state::FileState;
use crate::core::process::{ExitCallback, ProcessHandle, ProcessRunner};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    #[default]
    Git,
    Hg,
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsKind::Git => f.write_str("git"),
            VcsKind::Hg => f.write_str("hg"),
        }
    }
}

impl FromStr for VcsKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "git" => Ok(VcsKind::Git),
            "hg" | "mercurial" => Ok(VcsKind::Hg),
            other => Err(format!("unknown version control system '{}'", other)),
        }
    }
}

/// The two displayed collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Staged,
    WorkingTree,
}

impl Collection {
    pub fn other(&self) -> Collection {
        match self {
            Collection::Staged => Collection::WorkingTree,
            Collection::WorkingTree => Collection::Staged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    All,
    Remote(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullOptions {
    /// Commit the merge result; `false` adds `--no-commit`
    pub commit: bool,
    /// Include one-line descriptions of merged commits in the merge message
    pub log: bool,
    /// Create a merge commit even when a fast-forward is possible
    pub no_ff: bool,
    pub rebase: bool,
}

impl Default for PullOptions {
    fn default() -> Self {
        Self {
            commit: true,
            log: false,
            no_ff: false,
            rebase: false,
        }
    }
}

/// A `local:remote` push pairing. An empty local side deletes the remote branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRefSpec {
    pub local: String,
    pub remote: String,
}

impl PushRefSpec {
    pub fn new(local: impl Into<String>, remote: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            remote: remote.into(),
        }
    }

    /// Push a local branch to the same name on the remote
    pub fn same(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name)
    }
}

impl fmt::Display for PushRefSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.local, self.remote)
    }
}

/// Command builders and output parsers for one version control tool
pub trait VersionControl {
    fn kind(&self) -> VcsKind;
    fn executable(&self) -> &str;

    fn is_inside_work_tree_command(&self) -> Result<CommandLine>;
    fn show_toplevel_command(&self) -> Result<CommandLine>;
    fn init_command(&self) -> Result<CommandLine>;
    fn status_command(&self) -> Result<CommandLine>;
    fn parse_status(&self, raw: &str) -> Result<Vec<FileChange>>;
    fn diff_command(&self, files: &[FileChange]) -> Result<CommandLine>;
    fn add_command(&self, files: &[FileChange]) -> Result<CommandLine>;
    fn remove_command(&self, files: &[FileChange], from: Collection) -> Result<CommandLine>;
    /// Delete untracked `files` from disk
    fn clean_command(&self, files: &[FileChange]) -> Result<CommandLine>;
    fn reset_command(&self, reference: &str, files: &[FileChange]) -> Result<CommandLine>;
    fn commit_command(&self, message: &str, amend: bool, files: &[FileChange]) -> Result<CommandLine>;
    fn checkout_command(&self, reference: &str, force: bool) -> Result<CommandLine>;
    fn fetch_command(&self, target: &FetchTarget, prune: bool) -> Result<CommandLine>;
    fn pull_command(&self, remote: &str, branch: &str, options: &PullOptions) -> Result<CommandLine>;
    fn push_command(&self, remote: &str, refspecs: &[PushRefSpec], tags: bool) -> Result<CommandLine>;
    fn create_branch_command(&self, name: &str, checkout: bool) -> Result<CommandLine>;
    fn delete_local_branches_command(&self, names: &[String], force: bool) -> Result<CommandLine>;
    fn delete_remote_branches_command(&self, remote: &str, names: &[String]) -> Result<CommandLine>;
    fn branch_list_command(&self) -> Result<CommandLine>;
    fn head_ref_command(&self) -> Result<CommandLine>;
    fn parse_branches(&self, ref_list: &str, head_ref: &str, head_exit_code: i32) -> Result<Vec<Branch>>;
}

/// Wait bounds for the synchronous queries and for a pending status poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub repository_check: Duration,
    pub head_ref: Duration,
    pub sync_command: Duration,
    pub status: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for Timeouts {
    fn from(config: &SessionConfig) -> Self {
        Self {
            repository_check: Duration::from_millis(config.repository_check_timeout_ms),
            head_ref: Duration::from_millis(config.head_ref_timeout_ms),
            sync_command: Duration::from_millis(config.sync_command_timeout_ms),
            status: Duration::from_millis(config.status_timeout_ms),
        }
    }
}

pub struct CommandFacade {
    vcs: Box<dyn VersionControl>,
    runner: ProcessRunner,
    timeouts: Timeouts,
}

impl CommandFacade {
    pub fn new(vcs: Box<dyn VersionControl>, runner: ProcessRunner, timeouts: Timeouts) -> Self {
        Self {
            vcs,
            runner,
            timeouts,
        }
    }

    /// Build the backend selected by `config`, running in `working_dir`
    pub fn from_config(config: &SessionConfig, working_dir: impl Into<PathBuf>) -> Self {
        let vcs: Box<dyn VersionControl> = match config.vcs {
            VcsKind::Git => Box::new(Git::new(&config.git_executable)),
            VcsKind::Hg => Box::new(Hg::new(&config.hg_executable)),
        };
        Self::new(vcs, ProcessRunner::new(working_dir), Timeouts::from(config))
    }

    pub fn kind(&self) -> VcsKind {
        self.vcs.kind()
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    pub fn runner(&self) -> &ProcessRunner {
        &self.runner
    }

    /// True when the working directory is inside a work tree
    pub fn has_repository(&self) -> Result<bool> {
        let cmd = self.vcs.is_inside_work_tree_command()?;
        let output = self.runner.run_sync(&cmd, self.timeouts.repository_check)?;
        Ok(output.success() && output.stdout.contains("true"))
    }

    /// Root of the enclosing work tree, or `None` outside a repository
    pub fn repository_location(&self) -> Result<Option<PathBuf>> {
        if !self.has_repository()? {
            return Ok(None);
        }

        let cmd = self.vcs.show_toplevel_command()?;
        let output = self.runner.run_sync(&cmd, self.timeouts.repository_check)?;
        if !output.success() {
            return Err(VcsError::command_failed(cmd.to_string(), output.exit_code, output.stderr));
        }
        Ok(Some(PathBuf::from(output.stdout.trim())))
    }

    /// List branches and mark the current one.
    ///
    /// Fails as a whole when the HEAD query does not finish in time.
    pub fn find_branches(&self) -> Result<Vec<Branch>> {
        let list_cmd = self.vcs.branch_list_command()?;
        let list = self.runner.run_sync(&list_cmd, self.timeouts.sync_command)?;
        if !list.success() {
            return Err(VcsError::command_failed(list_cmd.to_string(), list.exit_code, list.stderr));
        }

        let head_cmd = self.vcs.head_ref_command()?;
        let head = self.runner.run_sync(&head_cmd, self.timeouts.head_ref)?;
        self.vcs.parse_branches(&list.stdout, &head.stdout, head.exit_code)
    }

    /// Start a status poll with captured output
    pub fn status(&self) -> Result<ProcessHandle> {
        let cmd = self.vcs.status_command()?;
        self.runner.run_captured(&cmd, None)
    }

    pub fn parse_status(&self, raw: &str) -> Result<Vec<FileChange>> {
        self.vcs.parse_status(raw)
    }

    /// Start a diff of `files` with captured output
    pub fn diff(&self, files: &[FileChange]) -> Result<ProcessHandle> {
        require_files(files)?;
        let cmd = self.vcs.diff_command(files)?;
        self.runner.run_captured(&cmd, None)
    }

    pub fn init(&self, on_exit: Option<ExitCallback>) -> Result<ProcessHandle> {
        let cmd = self.vcs.init_command()?;
        self.runner.run_captured(&cmd, on_exit)
    }

    pub fn add(&self, files: &[FileChange], on_exit: Option<ExitCallback>) -> Result<ProcessHandle> {
        require_files(files)?;
        let cmd = self.vcs.add_command(files)?;
        self.runner.run_captured(&cmd, on_exit)
    }

    /// Remove `files` from `from`: unstage when staged, delete otherwise.
    ///
    /// Untracked working-tree files are not known to `rm`; they are deleted with a
    /// bounded `clean` first, or as the launched command when nothing tracked is left.
    pub fn remove(
        &self,
        files: &[FileChange],
        from: Collection,
        on_exit: Option<ExitCallback>,
    ) -> Result<ProcessHandle> {
        require_files(files)?;
        if from == Collection::Staged {
            let cmd = self.vcs.remove_command(files, from)?;
            return self.runner.run_captured(&cmd, on_exit);
        }

        let (untracked, tracked): (Vec<FileChange>, Vec<FileChange>) = files
            .iter()
            .cloned()
            .partition(|file| file.worktree_state == FileState::Untracked);
        if tracked.is_empty() {
            let cmd = self.vcs.clean_command(&untracked)?;
            return self.runner.run_captured(&cmd, on_exit);
        }

        if !untracked.is_empty() {
            let clean_cmd = self.vcs.clean_command(&untracked)?;
            log::debug!("Deleting {} untracked files before rm", untracked.len());
            let output = self.runner.run_sync(&clean_cmd, self.timeouts.sync_command)?;
            if !output.success() {
                return Err(VcsError::command_failed(clean_cmd.to_string(), output.exit_code, output.stderr));
            }
        }

        let cmd = self.vcs.remove_command(&tracked, from)?;
        self.runner.run_captured(&cmd, on_exit)
    }

    pub fn reset(
        &self,
        reference: &str,
        files: &[FileChange],
        on_exit: Option<ExitCallback>,
    ) -> Result<ProcessHandle> {
        let cmd = self.vcs.reset_command(reference, files)?;
        self.runner.run_captured(&cmd, on_exit)
    }

    /// Commit `files`, staging any untracked ones first with a bounded `add`
    pub fn commit(
        &self,
        message: &str,
        amend: bool,
        files: &[FileChange],
        on_exit: Option<ExitCallback>,
    ) -> Result<ProcessHandle> {
        let untracked: Vec<FileChange> = files
            .iter()
            .filter(|file| file.index_state == FileState::Untracked)
            .cloned()
            .collect();

        if !untracked.is_empty() {
            let add_cmd = self.vcs.add_command(&untracked)?;
            log::debug!("Staging {} untracked files before commit", untracked.len());
            let output = self.runner.run_sync(&add_cmd, self.timeouts.sync_command)?;
            if !output.success() {
                return Err(VcsError::command_failed(add_cmd.to_string(), output.exit_code, output.stderr));
            }
        }

        let cmd = self.vcs.commit_command(message, amend, files)?;
        self.runner.run_captured(&cmd, on_exit)
    }

    pub fn checkout(&self, reference: &str, force: bool, on_exit: Option<ExitCallback>) -> Result<ProcessHandle> {
        let cmd = self.vcs.checkout_command(reference, force)?;
        self.runner.run_captured(&cmd, on_exit)
    }

    pub fn fetch(&self, target: &FetchTarget, prune: bool, on_exit: Option<ExitCallback>) -> Result<ProcessHandle> {
        let cmd = self.vcs.fetch_command(target, prune)?;
        self.runner.run_captured(&cmd, on_exit)
    }

    pub fn pull(
        &self,
        remote: &str,
        branch: &str,
        options: &PullOptions,
        on_exit: Option<ExitCallback>,
    ) -> Result<ProcessHandle> {
        let cmd = self.vcs.pull_command(remote, branch, options)?;
        self.runner.run_captured(&cmd, on_exit)
    }

    pub fn push(
        &self,
        remote: &str,
        refspecs: &[PushRefSpec],
        tags: bool,
        on_exit: Option<ExitCallback>,
    ) -> Result<ProcessHandle> {
        let cmd = self.vcs.push_command(remote, refspecs, tags)?;
        self.runner.run_captured(&cmd, on_exit)
    }

    pub fn create_branch(&self, name: &str, checkout: bool, on_exit: Option<ExitCallback>) -> Result<ProcessHandle> {
        let cmd = self.vcs.create_branch_command(name, checkout)?;
        self.runner.run_captured(&cmd, on_exit)
    }

    pub fn delete_local_branches(
        &self,
        names: &[String],
        force: bool,
        on_exit: Option<ExitCallback>,
    ) -> Result<ProcessHandle> {
        let cmd = self.vcs.delete_local_branches_command(names, force)?;
        self.runner.run_captured(&cmd, on_exit)
    }

    pub fn delete_remote_branches(
        &self,
        remote: &str,
        names: &[String],
        on_exit: Option<ExitCallback>,
    ) -> Result<ProcessHandle> {
        let cmd = self.vcs.delete_remote_branches_command(remote, names)?;
        self.runner.run_captured(&cmd, on_exit)
    }
}

fn require_files(files: &[FileChange]) -> Result<()> {
    if files.is_empty() {
        return Err(VcsError::NothingSelected);
    }
    Ok(())
}

/// Flatten the pathspecs of `files`, new paths before old ones
pub(crate) fn pathspecs(files: &[FileChange]) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| file.paths())
        .map(str::to_string)
        .collect()
}
