//! A browsing session: repository state driven by a host tick.
//!
//! [`BrowserSession`] owns the configuration, the command façade and the
//! [`RepositoryState`]. The host calls [`BrowserSession::tick`] at a fixed rate; every
//! `poll_interval_ticks` ticks a status poll is started, and later ticks collect its
//! output, the pending diff and the in-flight command without ever blocking on them.
//!
//! # Public API
//! - [`BrowserSession`]: The session
//! - [`Operation`]: A user-triggered command
//! - [`Confirm`], [`AlwaysConfirm`], [`DestructiveAction`]: Confirmation of destructive commands
//! - [`CommandStart`], [`CommandOutcome`], [`TickReport`]: What a call did
//!
//! # Rules
//! - At most one command runs at a time; starting another fails with [`VcsError::Busy`]
//! - Status polls are not started while a command runs
//! - A failed, timed-out or unparsable poll leaves the collections untouched
//! - A successful commit or checkout clears both collections and forces a poll

use crate::core::config::SessionConfig;
use crate::core::error::{Result, VcsError};
use crate::core::file_change::FileChange;
use crate::core::file_state::{FileState, FileStateSet};
use crate::core::process::{ExitCallback, ProcessHandle, ProcessOutput};
use crate::core::repository::{ReconcileSummary, RepositoryState};
use crate::core::selection::SelectRequest;
use crate::core::vcs::{Collection, CommandFacade, FetchTarget, PullOptions, PushRefSpec};
use std::path::PathBuf;
use std::time::Instant;

/// A user-triggered command. File operations act on the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Init,
    /// Stage the selected working-tree files
    Add,
    /// Unstage the selected staged files, or delete the selected working-tree files
    Remove,
    /// Reset the selected files (or the whole index when nothing is selected) to `reference`
    Reset { reference: String },
    /// Commit the selected files, or the index when nothing is selected
    Commit { message: String, amend: bool },
    Checkout { reference: String, force: bool },
    Fetch { target: FetchTarget, prune: bool },
    Pull { remote: String, branch: String, options: PullOptions },
    Push { remote: String, refspecs: Vec<PushRefSpec>, tags: bool },
    CreateBranch { name: String, checkout: bool },
    DeleteLocalBranches { names: Vec<String>, force: bool },
    DeleteRemoteBranches { remote: String, names: Vec<String> },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Init => "init",
            Operation::Add => "add",
            Operation::Remove => "remove",
            Operation::Reset { .. } => "reset",
            Operation::Commit { .. } => "commit",
            Operation::Checkout { .. } => "checkout",
            Operation::Fetch { .. } => "fetch",
            Operation::Pull { .. } => "pull",
            Operation::Push { .. } => "push",
            Operation::CreateBranch { .. } => "branch",
            Operation::DeleteLocalBranches { .. } => "branch delete",
            Operation::DeleteRemoteBranches { .. } => "remote branch delete",
        }
    }

    fn clears_collections(&self) -> bool {
        matches!(self, Operation::Commit { .. } | Operation::Checkout { .. })
    }

    fn changes_branches(&self) -> bool {
        !matches!(self, Operation::Add | Operation::Remove | Operation::Reset { .. })
    }
}

/// A command that needs the user's explicit consent before it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestructiveAction {
    /// Deleting modified or untracked files from disk
    RemoveFiles { paths: Vec<String> },
    /// Rewriting the last commit
    Amend,
    /// Switching branches, which may discard uncommitted changes
    Checkout { reference: String },
}

pub trait Confirm {
    fn confirm(&mut self, action: &DestructiveAction) -> bool;
}

/// Confirms everything; for non-interactive hosts and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _action: &DestructiveAction) -> bool {
        true
    }
}

impl<F: FnMut(&DestructiveAction) -> bool> Confirm for F {
    fn confirm(&mut self, action: &DestructiveAction) -> bool {
        self(action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStart {
    Started,
    /// The user declined a confirmation; nothing was launched
    Declined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub operation: &'static str,
    pub output: ProcessOutput,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.output.success()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Set when a status poll completed and was merged
    pub reconciled: Option<ReconcileSummary>,
    pub diff_updated: bool,
    /// Set when the in-flight command completed on this tick
    pub finished: Option<CommandOutcome>,
}

struct PendingStatus {
    handle: ProcessHandle,
    started: Instant,
}

struct InFlight {
    operation: Operation,
    handle: ProcessHandle,
}

pub struct BrowserSession {
    config: SessionConfig,
    facade: CommandFacade,
    state: RepositoryState,
    tick_count: u64,
    force_update: bool,
    branches_stale: bool,
    diff_requested: bool,
    pending_status: Option<PendingStatus>,
    pending_diff: Option<ProcessHandle>,
    in_flight: Option<InFlight>,
}

impl BrowserSession {
    pub fn new(config: SessionConfig, working_dir: impl Into<PathBuf>) -> Self {
        let facade = CommandFacade::from_config(&config, working_dir);
        Self::with_facade(config, facade)
    }

    pub fn with_facade(config: SessionConfig, facade: CommandFacade) -> Self {
        Self {
            config,
            facade,
            state: RepositoryState::new(),
            tick_count: 0,
            force_update: false,
            branches_stale: false,
            diff_requested: false,
            pending_status: None,
            pending_diff: None,
            in_flight: None,
        }
    }

    /// Resolve the repository root and load branches. The next tick polls.
    pub fn enable(&mut self) -> Result<()> {
        self.tick_count = 0;
        self.force_update = true;

        let root = self.facade.repository_location()?;
        let Some(root) = root else {
            self.state.set_repository_root(None);
            return Err(VcsError::NotInRepository);
        };
        log::debug!("Repository root: {}", root.display());
        self.state.set_repository_root(Some(root));
        self.refresh_branches()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn facade(&self) -> &CommandFacade {
        &self.facade
    }

    pub fn state(&self) -> &RepositoryState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut RepositoryState {
        &mut self.state
    }

    /// True while a command is in flight
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Make the next tick start a status poll
    pub fn force_update(&mut self) {
        self.force_update = true;
    }

    /// Advance the session by one host tick.
    pub fn tick(&mut self) -> Result<TickReport> {
        let poll_interval = u64::from(self.config.poll_interval_ticks.max(1));
        let due = self.tick_count % poll_interval == 0;
        self.tick_count += 1;

        let mut report = TickReport {
            finished: self.collect_in_flight()?,
            ..TickReport::default()
        };
        report.diff_updated = self.collect_diff()?;
        report.reconciled = self.collect_status()?;

        if self.diff_requested && self.pending_diff.is_none() {
            report.diff_updated |= self.start_diff()?;
        }

        // A command that just finished is reported before the follow-up poll starts
        let idle = !self.is_busy() && report.finished.is_none();
        if (due || self.force_update) && idle && self.pending_status.is_none() {
            self.force_update = false;
            self.start_status()?;
        }

        Ok(report)
    }

    /// Poll status synchronously, bounded by the status timeout
    pub fn refresh(&mut self) -> Result<ReconcileSummary> {
        if self.branches_stale {
            self.refresh_branches()?;
        }
        let timeout = self.facade.timeouts().status;
        let mut handle = self.facade.status()?;
        let output = handle.wait_timeout(timeout)?;
        self.merge_status(&handle, output)
    }

    pub fn refresh_branches(&mut self) -> Result<()> {
        let branches = self.facade.find_branches()?;
        self.state.set_branches(branches);
        self.branches_stale = false;
        Ok(())
    }

    /// Run the diff for the selected working-tree files synchronously
    pub fn refresh_diff(&mut self) -> Result<&str> {
        self.diff_requested = false;
        self.pending_diff = None;
        let files = self.selected_working_tree_files();
        if files.is_empty() {
            self.state.clear_diff_text();
        } else {
            let timeout = self.facade.timeouts().status;
            let output = self.facade.diff(&files)?.wait_timeout(timeout)?;
            self.store_diff(output);
        }
        Ok(self.state.diff_text())
    }

    pub fn select(&mut self, request: &SelectRequest) -> bool {
        let visible = self.state.visible_keys(request.collection);
        let changed = self.state.select(request, &visible);
        self.diff_requested |= changed;
        changed
    }

    pub fn select_all(&mut self, collection: Collection) -> bool {
        let visible = self.state.visible_keys(collection);
        let changed = self.state.select_all(collection, &visible);
        self.diff_requested |= changed;
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.state.clear_selection();
        self.diff_requested |= changed;
        changed
    }

    pub fn set_filter(&mut self, collection: Collection, filter: FileStateSet) {
        self.state.set_filter(collection, filter);
    }

    /// Launch `operation` after any confirmation it needs.
    ///
    /// `on_exit` receives `(exit_code, stdout, stderr)` once the command finishes, or
    /// the cancelled exit code with no output if it is cancelled.
    pub fn start(
        &mut self,
        operation: Operation,
        confirm: &mut dyn Confirm,
        on_exit: Option<ExitCallback>,
    ) -> Result<CommandStart> {
        if self.is_busy() {
            return Err(VcsError::Busy);
        }
        if let Operation::Commit { message, .. } = &operation {
            if message.trim().is_empty() {
                return Err(VcsError::EmptyCommitMessage);
            }
        }

        if let Some(action) = self.destructive_action(&operation) {
            if !confirm.confirm(&action) {
                log::info!("{} declined by user", operation.name());
                return Ok(CommandStart::Declined);
            }
        }

        let handle = self.launch(&operation, on_exit)?;
        log::debug!("Started {}: {}", operation.name(), handle.command_line());
        self.in_flight = Some(InFlight { operation, handle });
        Ok(CommandStart::Started)
    }

    /// Output of the in-flight command so far, for live display
    pub fn in_flight_output(&self) -> Option<(String, String)> {
        self.in_flight
            .as_ref()
            .map(|in_flight| (in_flight.handle.stdout_so_far(), in_flight.handle.stderr_so_far()))
    }

    /// Kill the in-flight command. Returns false when nothing was running.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(mut in_flight) => {
                in_flight.handle.cancel();
                self.force_update = true;
                true
            }
            None => false,
        }
    }

    fn destructive_action(&self, operation: &Operation) -> Option<DestructiveAction> {
        match operation {
            Operation::Remove if !self.state.any_staged_selected() => {
                let paths: Vec<String> = self
                    .state
                    .selected_working_tree_files()
                    .into_iter()
                    .filter(|file| {
                        matches!(file.worktree_state, FileState::Modified | FileState::Untracked)
                    })
                    .map(|file| file.primary_path.clone())
                    .collect();
                (!paths.is_empty()).then_some(DestructiveAction::RemoveFiles { paths })
            }
            Operation::Commit { amend: true, .. } => Some(DestructiveAction::Amend),
            Operation::Checkout { reference, .. } => Some(DestructiveAction::Checkout {
                reference: reference.clone(),
            }),
            _ => None,
        }
    }

    fn launch(&self, operation: &Operation, on_exit: Option<ExitCallback>) -> Result<ProcessHandle> {
        let facade = &self.facade;
        match operation {
            Operation::Init => facade.init(on_exit),
            Operation::Add => facade.add(&self.selected_working_tree_files(), on_exit),
            Operation::Remove => {
                let from = if self.state.any_staged_selected() {
                    Collection::Staged
                } else {
                    Collection::WorkingTree
                };
                facade.remove(&self.selected_in(from), from, on_exit)
            }
            Operation::Reset { reference } => facade.reset(reference, &self.selected_files(), on_exit),
            Operation::Commit { message, amend } => {
                facade.commit(message, *amend, &self.selected_files(), on_exit)
            }
            Operation::Checkout { reference, force } => facade.checkout(reference, *force, on_exit),
            Operation::Fetch { target, prune } => facade.fetch(target, *prune, on_exit),
            Operation::Pull {
                remote,
                branch,
                options,
            } => facade.pull(remote, branch, options, on_exit),
            Operation::Push {
                remote,
                refspecs,
                tags,
            } => facade.push(remote, refspecs, *tags, on_exit),
            Operation::CreateBranch { name, checkout } => facade.create_branch(name, *checkout, on_exit),
            Operation::DeleteLocalBranches { names, force } => {
                facade.delete_local_branches(names, *force, on_exit)
            }
            Operation::DeleteRemoteBranches { remote, names } => {
                facade.delete_remote_branches(remote, names, on_exit)
            }
        }
    }

    fn selected_files(&self) -> Vec<FileChange> {
        self.state.selected_files().into_iter().cloned().collect()
    }

    fn selected_in(&self, collection: Collection) -> Vec<FileChange> {
        self.state.selected_in(collection).into_iter().cloned().collect()
    }

    fn selected_working_tree_files(&self) -> Vec<FileChange> {
        self.selected_in(Collection::WorkingTree)
    }

    fn collect_in_flight(&mut self) -> Result<Option<CommandOutcome>> {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return Ok(None);
        };
        let Some(output) = in_flight.handle.poll()? else {
            return Ok(None);
        };

        let operation = in_flight.operation.clone();
        self.in_flight = None;

        if output.success() {
            log::info!("{} finished", operation.name());
            if operation.clears_collections() {
                self.state.clear_collections();
            }
            if operation.changes_branches() {
                self.branches_stale = true;
            }
        } else {
            log::warn!(
                "{} failed with exit code {}: {}",
                operation.name(),
                output.exit_code,
                output.stderr.trim()
            );
        }
        self.force_update = true;

        Ok(Some(CommandOutcome {
            operation: operation.name(),
            output,
        }))
    }

    fn collect_diff(&mut self) -> Result<bool> {
        let Some(handle) = self.pending_diff.as_mut() else {
            return Ok(false);
        };
        let Some(output) = handle.poll()? else {
            return Ok(false);
        };
        self.pending_diff = None;
        self.store_diff(output);
        Ok(true)
    }

    fn store_diff(&mut self, output: ProcessOutput) {
        if output.success() {
            self.state.set_diff_text(output.stdout);
        } else {
            log::warn!("Diff failed with exit code {}: {}", output.exit_code, output.stderr.trim());
            self.state.clear_diff_text();
        }
    }

    /// Start a diff for the selected working-tree files; returns true if the diff
    /// text was cleared instead.
    fn start_diff(&mut self) -> Result<bool> {
        self.diff_requested = false;
        let files = self.selected_working_tree_files();
        if files.is_empty() {
            self.state.clear_diff_text();
            return Ok(true);
        }
        self.pending_diff = Some(self.facade.diff(&files)?);
        Ok(false)
    }

    fn start_status(&mut self) -> Result<()> {
        if self.branches_stale {
            self.refresh_branches()?;
        }
        let handle = self.facade.status()?;
        log::debug!("Polling status: {}", handle.command_line());
        self.pending_status = Some(PendingStatus {
            handle,
            started: Instant::now(),
        });
        Ok(())
    }

    fn collect_status(&mut self) -> Result<Option<ReconcileSummary>> {
        let Some(pending) = self.pending_status.as_mut() else {
            return Ok(None);
        };

        match pending.handle.poll()? {
            Some(output) => {
                let pending = self.pending_status.take();
                match pending {
                    Some(pending) => self.merge_status(&pending.handle, output).map(Some),
                    None => Ok(None),
                }
            }
            None => {
                let timeout = self.facade.timeouts().status;
                if pending.started.elapsed() < timeout {
                    return Ok(None);
                }
                pending.handle.cancel();
                let command = pending.handle.command_line().to_string();
                self.pending_status = None;
                Err(VcsError::timeout(command, timeout))
            }
        }
    }

    fn merge_status(&mut self, handle: &ProcessHandle, output: ProcessOutput) -> Result<ReconcileSummary> {
        if !output.success() {
            log::warn!("Status poll failed with exit code {}", output.exit_code);
            return Err(VcsError::command_failed(handle.command_line(), output.exit_code, output.stderr));
        }

        let fresh = self.facade.parse_status(&output.stdout).map_err(|e| {
            log::warn!("Discarding status poll: {}", e);
            e
        })?;

        let selection_before = self.state.selected_working_tree_files().len();
        let summary = self.state.apply_status(&fresh);
        if self.state.selected_working_tree_files().len() != selection_before {
            self.diff_requested = true;
        }
        Ok(summary)
    }
}
