use crate::commands::{print_updated_status, report_outcome, run_operation};
use crate::core::{
    branch_parser::remote_names,
    command_init::{IndexCommandInit, SessionOptions},
    error::{Result, VcsError},
    session::{BrowserSession, Operation},
    vcs::PullOptions,
};

/// Pull `branch` from `remote`. The remote defaults to the first known remote and
/// the branch to the current one.
pub fn execute_pull(
    options: &SessionOptions,
    remote: Option<String>,
    branch: Option<String>,
    pull_options: PullOptions,
) -> Result<()> {
    let mut session = IndexCommandInit::open_session(options)?;
    let remote = resolve_remote(&session, remote)?;
    let branch = resolve_branch(&session, branch)?;

    let message = format!("Pulled {branch} from {remote}.");
    let operation = Operation::Pull {
        remote,
        branch,
        options: pull_options,
    };
    let outcome = run_operation(&mut session, operation, true)?;
    if report_outcome(outcome, &message)? {
        print_updated_status(&mut session)?;
    }
    Ok(())
}

/// The named remote, or the first remote the branch list knows about
pub(crate) fn resolve_remote(session: &BrowserSession, remote: Option<String>) -> Result<String> {
    match remote {
        Some(remote) => Ok(remote),
        None => remote_names(session.state().branches())
            .first()
            .map(|name| name.to_string())
            .ok_or(VcsError::NoRemote),
    }
}

/// The named branch, or the current one
pub(crate) fn resolve_branch(session: &BrowserSession, branch: Option<String>) -> Result<String> {
    match branch {
        Some(branch) => Ok(branch),
        None => session
            .state()
            .current_branch()
            .map(|branch| branch.name.clone())
            .ok_or(VcsError::NoCurrentBranch),
    }
}
