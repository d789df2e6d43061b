use crate::commands::{print_updated_status, report_outcome, run_operation};
use crate::core::{
    command_init::{IndexCommandInit, SessionOptions},
    error::{Result, VcsError},
    print_error, print_error_with_structured_usage,
    session::Operation,
    vcs::Collection,
};

pub struct CommitArgs<'a> {
    pub message: &'a str,
    pub amend: bool,
    /// Index into the working tree instead of the staged list
    pub working_tree: bool,
    pub indices: &'a [String],
}

/// Commit the given entries, or everything staged when no index is given
pub fn execute_commit(options: &SessionOptions, args: &CommitArgs<'_>, assume_yes: bool) -> Result<()> {
    if args.message.trim().is_empty() {
        print_error_with_structured_usage(
            "Empty commit message",
            &["vcs-browser commit -m <message> [--amend] [--working-tree] [<index>...]"],
            &[("-m, --message", "Commit message")],
        );
        return Err(VcsError::EmptyCommitMessage);
    }

    let collection = if args.working_tree {
        Collection::WorkingTree
    } else {
        Collection::Staged
    };

    let mut session = if args.indices.is_empty() {
        let session = IndexCommandInit::open_session(options)?;
        if session.state().staged().is_empty() && !args.amend {
            print_error("Nothing is staged for commit");
            return Ok(());
        }
        session
    } else {
        match IndexCommandInit::initialize(options, collection, args.indices) {
            Ok(context) => context.session,
            Err(VcsError::NoFilesAvailable) => {
                print_error("There are no changes to commit");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    };

    let operation = Operation::Commit {
        message: args.message.to_string(),
        amend: args.amend,
    };
    let outcome = run_operation(&mut session, operation, assume_yes)?;
    let verb = if args.amend { "Amended" } else { "Created" };
    if report_outcome(outcome, &format!("{verb} commit."))? {
        print_updated_status(&mut session)?;
    }
    Ok(())
}
