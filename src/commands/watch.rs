use crate::commands::status::print_collections;
use crate::core::{
    command_init::{IndexCommandInit, SessionOptions},
    error::{Result, VcsError},
    print_info,
};
use std::thread;
use std::time::Duration;

/// Drive the session at its tick rate and reprint the collections whenever a poll
/// changes them. Runs until interrupted, or for `max_ticks` ticks.
pub fn execute_watch(options: &SessionOptions, max_ticks: Option<u64>) -> Result<()> {
    let mut session = IndexCommandInit::open_session(options)?;
    let interval = Duration::from_millis(session.config().tick_interval_ms.max(1));
    print_info(&format!(
        "Watching for changes (poll every {} ticks of {} ms)",
        session.config().poll_interval_ticks,
        interval.as_millis()
    ));
    print_collections(session.state());

    let mut ticks = 0u64;
    while max_ticks.map_or(true, |max| ticks < max) {
        ticks += 1;
        match session.tick() {
            Ok(report) => {
                if report.reconciled.is_some_and(|summary| summary.changed()) {
                    print_collections(session.state());
                }
            }
            Err(e) if is_transient(&e) => log::warn!("Poll skipped: {e}"),
            Err(e) => return Err(e),
        }
        thread::sleep(interval);
    }
    Ok(())
}

/// Errors after which the next poll may well succeed
fn is_transient(error: &VcsError) -> bool {
    error.is_parse_or_timeout() || matches!(error, VcsError::CommandFailed { .. })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(is_transient(&VcsError::timeout("git status", Duration::from_millis(10))));
        assert!(is_transient(&VcsError::command_failed("git status", 128, "fatal")));
        assert!(!is_transient(&VcsError::NotInRepository));
    }
}
