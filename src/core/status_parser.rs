//! Parser for NUL-delimited porcelain v1 status output.
//!
//! The input is what `status --porcelain --ignored --untracked-files -z` prints: one
//! record per NUL-terminated field, each made of a two-character state prefix, a
//! space and the path. Renamed and copied records are followed by an extra field
//! carrying the old path.
//!
//! ```text
//! "?? newfile.txt\0R  new.txt\0old.txt\0"
//! ```
//!
//! Malformed input is rejected as a whole: the reconciler expects well-formed records
//! and a partial list would drop entries from the collections.

use crate::core::error::{Result, VcsError};
use crate::core::file_change::FileChange;
use crate::core::file_state::FileState;

/// Parse raw porcelain output into one [`FileChange`] per logical record.
pub fn parse_status(raw: &str) -> Result<Vec<FileChange>> {
    let mut changes = Vec::new();
    let mut fields = raw.split('\0').filter(|field| !field.is_empty());

    while let Some(field) = fields.next() {
        let (index_state, worktree_state, path) = split_record(field)?;

        let secondary = if matches!(index_state, FileState::Renamed | FileState::Copied) {
            match fields.next() {
                Some(old_path) => old_path,
                None => {
                    return Err(VcsError::status_parse(
                        field,
                        "rename or copy record without its old path",
                    ))
                }
            }
        } else {
            ""
        };

        changes.push(FileChange::new(index_state, worktree_state, path, secondary));
    }

    log::debug!("Parsed {} status records", changes.len());
    Ok(changes)
}

fn split_record(field: &str) -> Result<(FileState, FileState, &str)> {
    let bytes = field.as_bytes();
    if bytes.len() < 4 {
        return Err(VcsError::status_parse(field, "record too short"));
    }
    if bytes[2] != b' ' {
        return Err(VcsError::status_parse(field, "missing separator after state codes"));
    }

    let index_state = FileState::from_code(bytes[0] as char)
        .ok_or_else(|| VcsError::status_parse(field, "unknown index state code"))?;
    let worktree_state = FileState::from_code(bytes[1] as char)
        .ok_or_else(|| VcsError::status_parse(field, "unknown worktree state code"))?;

    // The first three bytes are ASCII, so slicing at 3 stays on a char boundary.
    Ok((index_state, worktree_state, &field[3..]))
}
