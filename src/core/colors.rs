//! Color mapping for file states.
//!
//! Every listing colors a state the same way, so the mapping lives here.
//!
//! # Public API
//! - [`get_state_color_style`]: Color function for a file state
//! - [`get_aligned_code`]: Two-column colored state code (`M `, `??`)
//! - [`get_colored_path`]: Path in its state's color
//! - [`format_file_line`]: One numbered listing line
//!
//! # Color Scheme
//! - **Modified**: Yellow
//! - **Added**: Green
//! - **Deleted**: Red
//! - **Renamed/Copied**: Blue
//! - **Untracked**: Cyan
//! - **Unmerged**: Red bold
//! - **Ignored/Unmodified**: Dimmed

use crate::core::file_change::FileChange;
use crate::core::file_state::FileState;
use colored::*;

/// Returns a closure that colors any text the way `state` is shown
pub fn get_state_color_style(state: FileState) -> Box<dyn Fn(&str) -> ColoredString> {
    match state {
        FileState::Modified => Box::new(|text: &str| text.yellow()),
        FileState::Untracked => Box::new(|text: &str| text.cyan()),
        FileState::Deleted => Box::new(|text: &str| text.red()),
        FileState::Added => Box::new(|text: &str| text.green()),
        FileState::Renamed | FileState::Copied => Box::new(|text: &str| text.blue()),
        FileState::Unmerged => Box::new(|text: &str| text.red().bold()),
        FileState::Ignored | FileState::Unmodified => Box::new(|text: &str| text.bright_black()),
    }
}

/// Colored state code padded to two columns
pub fn get_aligned_code(state: FileState) -> ColoredString {
    let color_fn = get_state_color_style(state);
    match state {
        FileState::Untracked => color_fn("??"),
        FileState::Ignored => color_fn("!!"),
        FileState::Unmerged => color_fn("UU"),
        other => color_fn(&format!("{} ", other.code())),
    }
}

pub fn get_colored_path(state: FileState, path: &str) -> ColoredString {
    get_state_color_style(state)(path)
}

/// `[index] code path` showing `state`, with `(from old)` appended for renames and copies
pub fn format_file_line(index: usize, state: FileState, file: &FileChange) -> String {
    let index_colored = format!("[{index}]").cyan().bold();
    let code = get_aligned_code(state);
    let path = get_colored_path(state, &file.primary_path);

    if file.secondary_path.is_empty() {
        format!("{index_colored} {code} {path}")
    } else {
        let from = format!("(from {})", file.secondary_path).bright_black();
        format!("{index_colored} {code} {path} {from}")
    }
}
