use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};
use vcs_browser::core::{
    AlwaysConfirm, BrowserSession, Collection, CommandOutcome, CommandStart, DestructiveAction, FetchTarget,
    FileState, Operation, SelectRequest, SessionConfig, TickReport, VcsError, CANCELLED_EXIT_CODE,
};

mod common;
use common::{fixtures::*, repository::*};

fn fast_config() -> SessionConfig {
    SessionConfig {
        poll_interval_ticks: 5,
        tick_interval_ms: 2,
        ..SessionConfig::default()
    }
}

fn open(repo: &TestRepo) -> vcs_browser::Result<BrowserSession> {
    let mut session = BrowserSession::new(fast_config(), repo.path());
    session.enable()?;
    Ok(session)
}

/// Tick until `done` accepts a report, or fail after a few seconds
fn tick_until(session: &mut BrowserSession, mut done: impl FnMut(&TickReport) -> bool) -> anyhow::Result<TickReport> {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        let report = session.tick()?;
        if done(&report) {
            return Ok(report);
        }
        thread::sleep(Duration::from_millis(2));
    }
    anyhow::bail!("session did not reach the expected state in time")
}

fn finish(session: &mut BrowserSession) -> anyhow::Result<CommandOutcome> {
    let report = tick_until(session, |report| report.finished.is_some())?;
    report
        .finished
        .ok_or_else(|| anyhow::anyhow!("no command finished"))
}

/// Write an executable git wrapper whose `body` runs before delegating to git.
/// `$3` is the git subcommand, after `-c core.quotepath=false`.
#[cfg(unix)]
fn git_wrapper(dir: &std::path::Path, body: &str) -> anyhow::Result<String> {
    use std::os::unix::fs::PermissionsExt;

    let wrapper = dir.join("git-wrapper");
    std::fs::write(&wrapper, format!("#!/bin/sh\n{body}\nexec git \"$@\"\n"))?;
    std::fs::set_permissions(&wrapper, std::fs::Permissions::from_mode(0o755))?;
    Ok(wrapper.to_string_lossy().into_owned())
}

fn working_tree_paths(session: &BrowserSession) -> Vec<String> {
    session
        .state()
        .working_tree()
        .values()
        .map(|file| file.primary_path.clone())
        .collect()
}

#[cfg(test)]
mod session_tests {
    use super::*;

    #[test]
    fn test_enable_outside_repository() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let mut session = BrowserSession::new(fast_config(), dir.path());
        assert!(matches!(session.enable(), Err(VcsError::NotInRepository)));
        assert!(session.state().repository_root().is_none());
        Ok(())
    }

    #[test]
    fn test_enable_resolves_root_and_branches() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        git_branch(&repo.path, "dev")?;
        let session = open(&repo)?;

        assert!(session.state().repository_root().is_some());
        assert_eq!(session.state().current_branch().map(|b| b.name.as_str()), Some("main"));
        assert_eq!(session.state().branches().len(), 2);
        assert_eq!(session.state().current_branch_index(), Some(1));
        Ok(())
    }

    #[test]
    fn test_first_tick_polls_and_picks_up_new_files() -> anyhow::Result<()> {
        let repo = create_multi_file_repo()?;
        let mut session = open(&repo)?;

        let report = tick_until(&mut session, |report| report.reconciled.is_some())?;
        assert_eq!(report.reconciled.map(|s| s.inserted), Some(5));
        assert_eq!(session.state().stats().to_string(), "3 modified 2 untracked");

        create_file(&repo.path, "file6.txt", "late\n")?;
        tick_until(&mut session, |report| report.reconciled.is_some_and(|s| s.inserted == 1))?;
        assert!(working_tree_paths(&session).contains(&"file6.txt".to_string()));
        Ok(())
    }

    #[test]
    fn test_selection_survives_polls() -> anyhow::Result<()> {
        let repo = create_multi_file_repo()?;
        let mut session = open(&repo)?;
        session.refresh()?;

        session.select(&SelectRequest::click(Collection::WorkingTree, "file2.txt", 1));
        remove_file(&repo.path, "file5.txt")?;
        let summary = session.refresh()?;

        assert_eq!(summary.removed, 1);
        let selected: Vec<&str> = session
            .state()
            .selected_working_tree_files()
            .into_iter()
            .map(|file| file.primary_path.as_str())
            .collect();
        assert_eq!(selected, vec!["file2.txt"]);
        Ok(())
    }

    #[test]
    fn test_selection_requests_diff_on_next_tick() -> anyhow::Result<()> {
        let repo = create_multi_file_repo()?;
        let mut session = open(&repo)?;
        session.refresh()?;

        session.select(&SelectRequest::click(Collection::WorkingTree, "file1.txt", 0));
        tick_until(&mut session, |report| report.diff_updated)?;
        assert!(session.state().diff_text().contains("+modified1"));

        session.clear_selection();
        tick_until(&mut session, |report| report.diff_updated)?;
        assert!(session.state().diff_text().is_empty());
        Ok(())
    }

    #[test]
    fn test_add_runs_without_blocking_and_reports_output() -> anyhow::Result<()> {
        let repo = create_multi_file_repo()?;
        let mut session = open(&repo)?;
        session.refresh()?;
        session.select(&SelectRequest::click(Collection::WorkingTree, "file4.txt", 3));

        let seen: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);
        let start = session.start(
            Operation::Add,
            &mut AlwaysConfirm,
            Some(Box::new(move |code, _stdout, _stderr| {
                *sink.borrow_mut() = Some(code);
            })),
        )?;
        assert_eq!(start, CommandStart::Started);
        assert!(session.is_busy());

        let second = session.start(Operation::Add, &mut AlwaysConfirm, None);
        assert!(matches!(second, Err(VcsError::Busy)));

        let outcome = finish(&mut session)?;
        assert!(outcome.success());
        assert_eq!(outcome.operation, "add");
        assert_eq!(*seen.borrow(), Some(0));
        assert!(!session.is_busy());

        tick_until(&mut session, |report| report.reconciled.is_some())?;
        let staged = session.state().staged();
        assert_eq!(staged.get("file4.txt").map(|f| f.index_state), Some(FileState::Added));
        Ok(())
    }

    #[test]
    fn test_commit_stages_untracked_files_and_clears_collections() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(&repo.path, "notes.txt", "notes\n")?;
        let mut session = open(&repo)?;
        session.refresh()?;
        session.select(&SelectRequest::click(Collection::WorkingTree, "notes.txt", 0));

        let operation = Operation::Commit {
            message: "Add notes".into(),
            amend: false,
        };
        session.start(operation, &mut AlwaysConfirm, None)?;
        let outcome = finish(&mut session)?;
        assert!(outcome.success());
        assert!(session.state().working_tree().is_empty());
        assert!(session.state().staged().is_empty());

        assert!(git_status_lines(&repo.path)?.is_empty());
        assert!(git(&repo.path, &["log", "--oneline"])?.contains("Add notes"));
        Ok(())
    }

    #[test]
    fn test_remove_on_staged_entry_unstages() -> anyhow::Result<()> {
        let repo = create_mixed_repo()?;
        let mut session = open(&repo)?;
        session.refresh()?;
        session.select(&SelectRequest::click(Collection::Staged, "staged.txt", 1));

        let mut asked = false;
        let mut confirm = |_: &DestructiveAction| {
            asked = true;
            true
        };
        session.start(Operation::Remove, &mut confirm, None)?;
        assert!(finish(&mut session)?.success());
        assert!(!asked);

        assert!(git_status_lines(&repo.path)?.contains(&"?? staged.txt".to_string()));
        assert!(repo.path.join("staged.txt").exists());
        Ok(())
    }

    #[test]
    fn test_remove_deletes_untracked_file() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        create_file(&repo.path, "junk.txt", "junk\n")?;
        let mut session = open(&repo)?;
        session.refresh()?;
        session.select(&SelectRequest::click(Collection::WorkingTree, "junk.txt", 0));

        let mut asked = Vec::new();
        let mut confirm = |action: &DestructiveAction| {
            asked.push(action.clone());
            true
        };
        session.start(Operation::Remove, &mut confirm, None)?;
        let outcome = finish(&mut session)?;
        assert!(outcome.success(), "remove failed: {}", outcome.output.stderr);
        assert_eq!(
            asked,
            vec![DestructiveAction::RemoveFiles {
                paths: vec!["junk.txt".into()]
            }]
        );
        assert!(!repo.path.join("junk.txt").exists());
        Ok(())
    }

    #[test]
    fn test_remove_deletes_tracked_and_untracked_together() -> anyhow::Result<()> {
        let repo = create_multi_file_repo()?;
        let mut session = open(&repo)?;
        session.refresh()?;
        session.select_all(Collection::WorkingTree);

        session.start(Operation::Remove, &mut AlwaysConfirm, None)?;
        let outcome = finish(&mut session)?;
        assert!(outcome.success(), "remove failed: {}", outcome.output.stderr);

        for name in ["file1.txt", "file2.txt", "file3.txt", "file4.txt", "file5.txt"] {
            assert!(!repo.path.join(name).exists(), "{name} still exists");
        }
        Ok(())
    }

    #[test]
    fn test_failed_command_reports_exit_code() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let mut session = open(&repo)?;

        let operation = Operation::DeleteLocalBranches {
            names: vec!["missing".into()],
            force: false,
        };
        session.start(operation, &mut AlwaysConfirm, None)?;
        let outcome = finish(&mut session)?;
        assert!(!outcome.success());
        assert_ne!(outcome.output.exit_code, 0);
        assert!(outcome.output.stderr.contains("missing"));
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_cancel_fires_callback_with_cancelled_code() -> anyhow::Result<()> {
        let repo = setup_test_repo_with_initial_commit()?;
        let bin = tempfile::TempDir::new()?;
        let wrapper = git_wrapper(bin.path(), "if [ \"$3\" = fetch ]; then exec sleep 30; fi")?;

        let config = SessionConfig {
            git_executable: wrapper,
            ..fast_config()
        };
        let mut session = BrowserSession::new(config, repo.path());
        session.enable()?;

        let seen: Rc<RefCell<Vec<(i32, Option<String>)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.start(
            Operation::Fetch {
                target: FetchTarget::All,
                prune: false,
            },
            &mut AlwaysConfirm,
            Some(Box::new(move |code, stdout, _| sink.borrow_mut().push((code, stdout)))),
        )?;
        assert!(session.in_flight_output().is_some());

        assert!(session.cancel());
        assert!(!session.is_busy());
        assert!(!session.cancel());
        assert_eq!(*seen.borrow(), vec![(CANCELLED_EXIT_CODE, None)]);
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_status_timeout_keeps_collections() -> anyhow::Result<()> {
        let repo = create_mixed_repo()?;
        let bin = tempfile::TempDir::new()?;
        let marker = bin.path().join("slow");
        let wrapper = git_wrapper(
            bin.path(),
            &format!(
                "if [ \"$3\" = status ] && [ -e '{}' ]; then exec sleep 30; fi",
                marker.display()
            ),
        )?;

        let config = SessionConfig {
            git_executable: wrapper,
            status_timeout_ms: 300,
            ..fast_config()
        };
        let mut session = BrowserSession::new(config, repo.path());
        session.enable()?;
        session.refresh()?;
        let staged_before = session.state().staged().clone();
        let working_tree_before = session.state().working_tree().clone();
        assert!(!staged_before.is_empty());
        assert!(!working_tree_before.is_empty());

        std::fs::write(&marker, "")?;
        create_file(&repo.path, "late.txt", "late\n")?;
        session.force_update();

        let started = Instant::now();
        let err = loop {
            match session.tick() {
                Ok(_) if started.elapsed() < Duration::from_secs(10) => thread::sleep(Duration::from_millis(2)),
                Ok(_) => anyhow::bail!("status poll never timed out"),
                Err(e) => break e,
            }
        };
        assert!(matches!(err, VcsError::Timeout { .. }), "unexpected error: {err}");
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(session.state().staged(), &staged_before);
        assert_eq!(session.state().working_tree(), &working_tree_before);
        Ok(())
    }
}
