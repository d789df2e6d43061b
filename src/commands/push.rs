use crate::commands::{pull::{resolve_branch, resolve_remote}, report_outcome, run_operation};
use crate::core::{
    command_init::{IndexCommandInit, SessionOptions},
    error::Result,
    session::Operation,
    vcs::PushRefSpec,
};

/// Push `refspecs` (`name` or `local:remote`) to `remote`. Without refspecs the
/// current branch is pushed to the same name.
pub fn execute_push(options: &SessionOptions, remote: Option<String>, refspecs: &[String], tags: bool) -> Result<()> {
    let mut session = IndexCommandInit::open_session(options)?;

    let remote = resolve_remote(&session, remote)?;
    let refspecs = if refspecs.is_empty() {
        vec![PushRefSpec::same(resolve_branch(&session, None)?)]
    } else {
        refspecs.iter().map(|spec| parse_refspec(spec)).collect()
    };

    let message = format!(
        "Pushed {} to {remote}.",
        refspecs.iter().map(PushRefSpec::to_string).collect::<Vec<_>>().join(", ")
    );
    let operation = Operation::Push {
        remote,
        refspecs,
        tags,
    };
    let outcome = run_operation(&mut session, operation, true)?;
    report_outcome(outcome, &message)?;
    Ok(())
}

fn parse_refspec(spec: &str) -> PushRefSpec {
    match spec.split_once(':') {
        Some((local, remote)) => PushRefSpec::new(local, remote),
        None => PushRefSpec::same(spec),
    }
}
