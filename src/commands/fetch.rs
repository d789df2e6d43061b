use crate::commands::{report_outcome, run_operation};
use crate::core::{
    command_init::{IndexCommandInit, SessionOptions},
    error::Result,
    session::Operation,
    vcs::FetchTarget,
};

/// Fetch from `remote`, or from every remote when none is given
pub fn execute_fetch(options: &SessionOptions, remote: Option<String>, prune: bool) -> Result<()> {
    let mut session = IndexCommandInit::open_session(options)?;

    let (target, message) = match remote {
        Some(remote) => {
            let message = format!("Fetched from {remote}.");
            (FetchTarget::Remote(remote), message)
        }
        None => (FetchTarget::All, "Fetched from all remotes.".to_string()),
    };

    let outcome = run_operation(&mut session, Operation::Fetch { target, prune }, true)?;
    report_outcome(outcome, &message)?;
    Ok(())
}
