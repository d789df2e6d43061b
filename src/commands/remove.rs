use crate::commands::{print_missing_indices, print_updated_status, report_outcome, run_operation};
use crate::core::{
    command_init::{IndexCommandInit, SessionOptions},
    error::{Result, VcsError},
    print_error,
    session::Operation,
    vcs::Collection,
};

/// Unstage staged entries (`--staged`) or delete working-tree entries from disk
pub fn execute_remove(options: &SessionOptions, indices_args: &[String], staged: bool, assume_yes: bool) -> Result<()> {
    let collection = if staged {
        Collection::Staged
    } else {
        Collection::WorkingTree
    };

    let mut context = match IndexCommandInit::initialize(options, collection, indices_args) {
        Ok(context) => context,
        Err(VcsError::NoIndicesProvided) => {
            print_missing_indices("vcs-browser remove [--staged] <index>...");
            return Err(VcsError::NoIndicesProvided);
        }
        Err(VcsError::NoFilesAvailable) => {
            print_error("There are no files to remove");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let count = context.selected_count();
    let message = if staged {
        format!("Unstaged {count} file(s).")
    } else {
        format!("Removed {count} file(s).")
    };

    let outcome = run_operation(&mut context.session, Operation::Remove, assume_yes)?;
    if report_outcome(outcome, &message)? {
        print_updated_status(&mut context.session)?;
    }
    Ok(())
}
