//! Predefined repository scenarios

#![allow(dead_code)]

use super::repository::*;
use vcs_browser::core::error::Result;

/// Three committed files, all modified, plus two untracked ones.
///
/// Working tree order: file1..file3 (modified), file4..file5 (untracked).
pub fn create_multi_file_repo() -> Result<TestRepo> {
    let repo = setup_test_repo()?;

    create_test_files(&repo.path, &["file1.txt", "file2.txt", "file3.txt"])?;
    git_add(&repo.path, ".")?;
    git_commit(&repo.path, "Initial commit")?;

    modify_test_files(&repo.path, &["file1.txt", "file2.txt", "file3.txt"])?;
    create_test_files(&repo.path, &["file4.txt", "file5.txt"])?;

    Ok(repo)
}

/// One staged addition, one staged modification and one untracked file
pub fn create_mixed_repo() -> Result<TestRepo> {
    let repo = setup_test_repo_with_initial_commit()?;

    create_file(&repo.path, "initial.txt", "changed\n")?;
    create_file(&repo.path, "staged.txt", "staged\n")?;
    git_add(&repo.path, ".")?;
    create_file(&repo.path, "untracked.txt", "untracked\n")?;

    Ok(repo)
}

/// A repository with a bare `origin` that has `main` pushed to it.
/// Returns the working repository and the bare remote.
pub fn create_repo_with_remote() -> Result<(TestRepo, tempfile::TempDir)> {
    let repo = setup_test_repo_with_initial_commit()?;
    let remote = tempfile::TempDir::new()?;
    git(remote.path(), &["init", "--quiet", "--bare"])?;

    let remote_path = remote.path().to_string_lossy().into_owned();
    git(&repo.path, &["remote", "add", "origin", &remote_path])?;
    git(&repo.path, &["push", "--quiet", "origin", "main"])?;
    git(&repo.path, &["fetch", "--quiet", "origin"])?;

    Ok((repo, remote))
}
