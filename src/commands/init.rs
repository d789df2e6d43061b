use crate::commands::{report_outcome, run_operation};
use crate::core::{
    command_init::SessionOptions, error::Result, print_info, session::BrowserSession, session::Operation,
};
use std::env;

/// Create a repository in the current directory
pub fn execute_init(options: &SessionOptions) -> Result<()> {
    let config = options.load_config()?;
    let mut session = BrowserSession::new(config, env::current_dir()?);

    if session.facade().has_repository()? {
        print_info("Already inside a repository.");
        return Ok(());
    }

    let outcome = run_operation(&mut session, Operation::Init, true)?;
    report_outcome(outcome, "Initialized an empty repository.")?;
    Ok(())
}
