use crate::core::{
    command_init::{IndexCommandInit, SessionOptions},
    error::{Result, VcsError},
    print_error_with_structured_usage, print_info,
    vcs::Collection,
};
use colored::*;

/// Show the diff of the given working-tree entries, or of every entry when no
/// index is given.
pub fn execute_diff(options: &SessionOptions, indices_args: &[String]) -> Result<()> {
    let mut session = if indices_args.is_empty() {
        let mut session = IndexCommandInit::open_session(options)?;
        session.select_all(Collection::WorkingTree);
        session
    } else {
        match IndexCommandInit::initialize(options, Collection::WorkingTree, indices_args) {
            Ok(context) => context.session,
            Err(VcsError::NoFilesAvailable) => {
                print_info("Working tree is clean.");
                return Ok(());
            }
            Err(e @ VcsError::IndexOutOfRange { .. }) => {
                print_error_with_structured_usage(
                    &e.to_string(),
                    &["vcs-browser diff [<index>...]"],
                    &[("-h, --help", "Show this help message")],
                );
                return Err(e);
            }
            Err(e) => return Err(e),
        }
    };

    let count = session.state().selected_working_tree_files().len();
    if count == 0 {
        print_info("Working tree is clean.");
        return Ok(());
    }

    let diff = session.refresh_diff()?;
    if diff.trim().is_empty() {
        print_info(&format!("No textual changes in {count} file(s)."));
    } else {
        println!();
        for line in diff.lines() {
            println!("{}", color_diff_line(line));
        }
    }
    Ok(())
}

fn color_diff_line(line: &str) -> ColoredString {
    if line.starts_with("+++") || line.starts_with("---") || line.starts_with("diff ") {
        line.white().bold()
    } else if line.starts_with("@@") {
        line.cyan()
    } else if line.starts_with('+') {
        line.green()
    } else if line.starts_with('-') {
        line.red()
    } else {
        line.normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_diff_line_keeps_text() {
        for line in ["diff --git a/x b/x", "@@ -1 +1 @@", "+added", "-removed", " context"] {
            assert!(color_diff_line(line).to_string().contains(line));
        }
    }
}
