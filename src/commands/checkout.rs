use crate::commands::{print_updated_status, report_outcome, run_operation};
use crate::core::{
    command_init::{IndexCommandInit, SessionOptions},
    error::Result,
    session::Operation,
};

/// Check out `reference`, or create it first with `create_branch`
pub fn execute_checkout(
    options: &SessionOptions,
    reference: &str,
    create_branch: bool,
    force: bool,
    assume_yes: bool,
) -> Result<()> {
    let mut session = IndexCommandInit::open_session(options)?;

    let (operation, message) = if create_branch {
        (
            Operation::CreateBranch {
                name: reference.to_string(),
                checkout: true,
            },
            format!("Switched to a new branch '{reference}'"),
        )
    } else {
        (
            Operation::Checkout {
                reference: reference.to_string(),
                force,
            },
            format!("Switched to '{reference}'"),
        )
    };

    let outcome = run_operation(&mut session, operation, assume_yes)?;
    if report_outcome(outcome, &message)? {
        print_updated_status(&mut session)?;
    }
    Ok(())
}
