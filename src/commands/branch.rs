use crate::commands::{report_outcome, run_operation};
use crate::core::{
    command_init::{IndexCommandInit, SessionOptions},
    error::{Result, VcsError},
    session::Operation,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchAction {
    Create { name: String, checkout: bool },
    Delete { names: Vec<String>, force: bool },
    DeleteRemote { remote: String, names: Vec<String> },
}

impl BranchAction {
    fn into_operation(self) -> Result<(Operation, String)> {
        match self {
            BranchAction::Create { name, checkout } => {
                let message = format!("Created branch '{name}'");
                Ok((Operation::CreateBranch { name, checkout }, message))
            }
            BranchAction::Delete { names, force } => {
                if names.is_empty() {
                    return Err(VcsError::NothingSelected);
                }
                let message = format!("Deleted {}", names.join(", "));
                Ok((Operation::DeleteLocalBranches { names, force }, message))
            }
            BranchAction::DeleteRemote { remote, names } => {
                if names.is_empty() {
                    return Err(VcsError::NothingSelected);
                }
                let message = format!(
                    "Deleted {}",
                    names
                        .iter()
                        .map(|name| format!("{remote}/{name}"))
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                Ok((Operation::DeleteRemoteBranches { remote, names }, message))
            }
        }
    }
}

pub fn execute_branch(options: &SessionOptions, action: BranchAction, assume_yes: bool) -> Result<()> {
    let (operation, message) = action.into_operation()?;
    let mut session = IndexCommandInit::open_session(options)?;
    let outcome = run_operation(&mut session, operation, assume_yes)?;
    report_outcome(outcome, &message)?;
    Ok(())
}
