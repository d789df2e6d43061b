use crate::commands::{print_missing_indices, print_updated_status, report_outcome, run_operation};
use crate::core::{
    command_init::{IndexCommandInit, SessionOptions},
    error::{Result, VcsError},
    print_error,
    session::Operation,
    vcs::Collection,
};

pub fn execute_add(options: &SessionOptions, indices_args: &[String]) -> Result<()> {
    let mut context = match IndexCommandInit::initialize(options, Collection::WorkingTree, indices_args) {
        Ok(context) => context,
        Err(VcsError::NoIndicesProvided) => {
            print_missing_indices("vcs-browser add <index>...");
            return Err(VcsError::NoIndicesProvided);
        }
        Err(VcsError::NoFilesAvailable) => {
            print_error("There are no changes to be added");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let count = context.selected_count();
    let outcome = run_operation(&mut context.session, Operation::Add, true)?;
    if report_outcome(outcome, &format!("Successfully added {count} file(s) to the index."))? {
        print_updated_status(&mut context.session)?;
    }
    Ok(())
}
