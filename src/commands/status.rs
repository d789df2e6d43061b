use crate::core::{
    colors::format_file_line,
    command_init::{IndexCommandInit, SessionOptions},
    error::Result,
    file_state::FileStateSet,
    repository::RepositoryState,
    vcs::Collection,
};
use colored::*;
use serde_json::json;

pub fn execute_status(options: &SessionOptions, show_all: bool, as_json: bool) -> Result<()> {
    let mut session = IndexCommandInit::open_session(options)?;
    if show_all {
        session.set_filter(Collection::WorkingTree, FileStateSet::all());
    }

    if as_json {
        print_status_json(session.state())?;
    } else {
        print_header(session.state());
        print_collections(session.state());
    }
    Ok(())
}

fn print_header(state: &RepositoryState) {
    println!();
    match state.current_branch() {
        Some(branch) => println!("{} {}", "On branch".bright_black(), branch.name.blue()),
        None => println!("{}", "HEAD detached".yellow()),
    }
    if let Some(root) = state.repository_root() {
        println!("{} {}", "Repository".bright_black(), root.display().to_string().white());
    }
}

/// Numbered listing of both collections, as the file commands index them
pub fn print_collections(state: &RepositoryState) {
    for (title, collection) in [("Staged", Collection::Staged), ("Working tree", Collection::WorkingTree)] {
        let files = state.visible(collection);
        if files.is_empty() {
            continue;
        }

        println!("\n{}", format!("{title}:").white());
        for (position, file) in files.iter().enumerate() {
            println!("{}", format_file_line(position + 1, file.state_in(collection), file));
        }
    }

    let stats = state.stats();
    let summary = stats.to_string();
    if stats.is_clean() {
        println!("\n{}\n", summary.green());
    } else {
        println!("\n{}\n", summary.bright_black());
    }
}

fn print_status_json(state: &RepositoryState) -> Result<()> {
    let value = json!({
        "branch": state.current_branch().map(|branch| branch.name.clone()),
        "staged": state.visible(Collection::Staged),
        "working_tree": state.visible(Collection::WorkingTree),
        "summary": state.stats().to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
