use crate::commands::{print_updated_status, report_outcome, run_operation};
use crate::core::{
    command_init::{IndexCommandInit, SessionOptions},
    error::{Result, VcsError},
    print_info,
    session::Operation,
    vcs::Collection,
};

/// Reset the index entries of the given staged files to `reference`. Without
/// indices the whole index is reset.
pub fn execute_reset(options: &SessionOptions, reference: &str, indices_args: &[String]) -> Result<()> {
    let mut session = if indices_args.is_empty() {
        IndexCommandInit::open_session(options)?
    } else {
        match IndexCommandInit::initialize(options, Collection::Staged, indices_args) {
            Ok(context) => context.session,
            Err(VcsError::NoFilesAvailable) => {
                print_info("Nothing is staged.");
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    };

    let count = session.state().selected_files().len();
    let message = if count == 0 {
        format!("Reset the index to {reference}.")
    } else {
        format!("Reset {count} file(s) to {reference}.")
    };

    let operation = Operation::Reset {
        reference: reference.to_string(),
    };
    let outcome = run_operation(&mut session, operation, true)?;
    if report_outcome(outcome, &message)? {
        print_updated_status(&mut session)?;
    }
    Ok(())
}
