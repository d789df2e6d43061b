//! CLI commands.
//!
//! Each command opens a [`BrowserSession`], drives it to completion and prints the
//! result. Mutating commands are started through the session and then ticked at
//! the configured rate until the session reports them finished.

pub mod add;
pub mod branch;
pub mod branches;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod fetch;
pub mod init;
pub mod pull;
pub mod push;
pub mod remove;
pub mod reset;
pub mod status;
pub mod watch;

pub use add::*;
pub use branch::*;
pub use branches::*;
pub use checkout::*;
pub use commit::*;
pub use diff::*;
pub use fetch::*;
pub use init::*;
pub use pull::*;
pub use push::*;
pub use remove::*;
pub use reset::*;
pub use status::*;
pub use watch::*;

use crate::core::{
    error::{Result, VcsError},
    output::{print_command_output, print_error_with_structured_usage, print_info, print_success},
    process::{ExitCallback, CANCELLED_EXIT_CODE},
    session::{BrowserSession, CommandOutcome, CommandStart, Confirm, DestructiveAction, Operation},
};
use colored::*;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

/// Asks on the terminal before destructive commands, unless `--yes` was given
#[derive(Debug, Clone, Copy)]
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl StdinConfirm {
    fn question(action: &DestructiveAction) -> String {
        match action {
            DestructiveAction::RemoveFiles { paths } => format!(
                "Delete {} file(s) with uncommitted changes from disk ({})?",
                paths.len(),
                paths.join(", ")
            ),
            DestructiveAction::Amend => "Rewrite the last commit?".to_string(),
            DestructiveAction::Checkout { reference } => {
                format!("Check out '{reference}'? Uncommitted changes may be lost.")
            }
        }
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&mut self, action: &DestructiveAction) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("\n{} {} ", Self::question(action).yellow(), "[y/N]".bright_black());
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                log::warn!("Could not read confirmation: {e}");
                false
            }
        }
    }
}

/// Start `operation` and tick the session until it finishes.
///
/// Returns `None` when the user declined the confirmation. The command's output is
/// printed as soon as it completes.
pub fn run_operation(
    session: &mut BrowserSession,
    operation: Operation,
    assume_yes: bool,
) -> Result<Option<CommandOutcome>> {
    let mut confirm = StdinConfirm { assume_yes };
    let on_exit: ExitCallback = Box::new(|_exit_code, stdout: Option<String>, stderr: Option<String>| {
        print_command_output(stdout.as_deref(), stderr.as_deref());
    });

    if session.start(operation, &mut confirm, Some(on_exit))? == CommandStart::Declined {
        return Ok(None);
    }

    let interval = Duration::from_millis(session.config().tick_interval_ms.max(1));
    loop {
        if let Some(outcome) = session.tick()?.finished {
            return Ok(Some(outcome));
        }
        thread::sleep(interval);
    }
}

/// Turn a finished outcome into the command's result, printing `success` on exit code 0.
/// Returns false when the user declined; a killed command is [`VcsError::Cancelled`].
pub(crate) fn report_outcome(outcome: Option<CommandOutcome>, success: &str) -> Result<bool> {
    match outcome {
        None => {
            print_info("Cancelled.");
            Ok(false)
        }
        Some(outcome) if outcome.success() => {
            print_success(success);
            Ok(true)
        }
        Some(outcome) if outcome.output.exit_code == CANCELLED_EXIT_CODE => Err(VcsError::Cancelled),
        Some(outcome) => Err(VcsError::command_failed(
            outcome.operation,
            outcome.output.exit_code,
            outcome.output.stderr.trim(),
        )),
    }
}

/// Re-poll and print both collections after a command changed them
pub(crate) fn print_updated_status(session: &mut BrowserSession) -> Result<()> {
    session.refresh()?;
    print_info("Updated status:");
    status::print_collections(session.state());
    Ok(())
}

/// Print the usage block for an index command invoked without indices
pub(crate) fn print_missing_indices(usage: &str) {
    print_error_with_structured_usage(
        "No file indices provided",
        &[usage],
        &[("-h, --help", "Show this help message")],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::process::ProcessOutput;

    fn outcome(exit_code: i32, stderr: &str) -> CommandOutcome {
        CommandOutcome {
            operation: "fetch",
            output: ProcessOutput {
                exit_code,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        }
    }

    #[test]
    fn test_report_outcome() {
        assert!(!report_outcome(None, "done").unwrap());
        assert!(report_outcome(Some(outcome(0, "")), "done").unwrap());

        let err = report_outcome(Some(outcome(128, "fatal: no remote\n")), "done").unwrap_err();
        assert!(matches!(err, VcsError::CommandFailed { exit_code: 128, ref stderr, .. } if stderr == "fatal: no remote"));

        let err = report_outcome(Some(outcome(CANCELLED_EXIT_CODE, "")), "done").unwrap_err();
        assert!(matches!(err, VcsError::Cancelled));
    }
}
