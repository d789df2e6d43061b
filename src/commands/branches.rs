use crate::commands::{report_outcome, run_operation};
use crate::core::{
    branch_parser::{local_branch_names, remote_branches, remote_names, Branch},
    command_init::{IndexCommandInit, SessionOptions},
    error::{Result, VcsError},
    print_info, print_section_header,
    session::Operation,
};
use colored::*;

pub fn execute_branches(options: &SessionOptions, branch_index: Option<usize>, assume_yes: bool) -> Result<()> {
    let mut session = IndexCommandInit::open_session(options)?;

    let Some(index) = branch_index else {
        list_branches(session.state().branches());
        return Ok(());
    };

    let names: Vec<String> = local_branch_names(session.state().branches())
        .into_iter()
        .map(str::to_string)
        .collect();
    if index == 0 || index > names.len() {
        return Err(VcsError::index_out_of_range(index, names.len()));
    }
    let reference = names[index - 1].clone();

    let operation = Operation::Checkout {
        reference: reference.clone(),
        force: false,
    };
    let outcome = run_operation(&mut session, operation, assume_yes)?;
    report_outcome(outcome, &format!("Switched to branch '{reference}'"))?;
    Ok(())
}

fn list_branches(branches: &[Branch]) {
    let locals: Vec<&Branch> = branches.iter().filter(|branch| !branch.is_remote).collect();
    if locals.is_empty() {
        print_info("No branches found. Make your first commit to create one.");
    } else {
        print_section_header("Local Branches");
        for (position, branch) in locals.iter().enumerate() {
            println!("{}", format_branch_line(position + 1, branch));
        }
    }

    for remote in remote_names(branches) {
        print_section_header(&format!("Remote '{remote}'"));
        for branch in remote_branches(branches, remote) {
            println!("    {}", branch.display_name().bright_black());
        }
    }

    println!();
}

/// `[*] name` for the current branch, `[index] name` otherwise
fn format_branch_line(index: usize, branch: &Branch) -> String {
    let marker = if branch.is_current {
        "*".white().bold().to_string()
    } else {
        index.to_string().white().to_string()
    };
    format!("{}{}{} {}", "[".bright_black(), marker, "]".bright_black(), branch.name.blue())
}
