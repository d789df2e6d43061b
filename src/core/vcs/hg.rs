use super::{Collection, CommandLine, FetchTarget, PullOptions, PushRefSpec, VcsKind, VersionControl};
use crate::core::branch_parser::Branch;
use crate::core::error::{Result, VcsError};
use crate::core::file_change::FileChange;

/// Mercurial backend. Only the executable is configurable; every operation
/// reports [`VcsError::Unsupported`].
#[derive(Debug, Clone)]
pub struct Hg {
    executable: String,
}

impl Hg {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn unsupported<T>(&self, operation: &'static str) -> Result<T> {
        Err(VcsError::unsupported(VcsKind::Hg, operation))
    }
}

impl Default for Hg {
    fn default() -> Self {
        Self::new("hg")
    }
}

impl VersionControl for Hg {
    fn kind(&self) -> VcsKind {
        VcsKind::Hg
    }

    fn executable(&self) -> &str {
        &self.executable
    }

    fn is_inside_work_tree_command(&self) -> Result<CommandLine> {
        self.unsupported("repository detection")
    }

    fn show_toplevel_command(&self) -> Result<CommandLine> {
        self.unsupported("repository location")
    }

    fn init_command(&self) -> Result<CommandLine> {
        self.unsupported("init")
    }

    fn status_command(&self) -> Result<CommandLine> {
        self.unsupported("status")
    }

    fn parse_status(&self, _raw: &str) -> Result<Vec<FileChange>> {
        self.unsupported("status parsing")
    }

    fn diff_command(&self, _files: &[FileChange]) -> Result<CommandLine> {
        self.unsupported("diff")
    }

    fn add_command(&self, _files: &[FileChange]) -> Result<CommandLine> {
        self.unsupported("add")
    }

    fn remove_command(&self, _files: &[FileChange], _from: Collection) -> Result<CommandLine> {
        self.unsupported("remove")
    }

    fn clean_command(&self, _files: &[FileChange]) -> Result<CommandLine> {
        self.unsupported("clean")
    }

    fn reset_command(&self, _reference: &str, _files: &[FileChange]) -> Result<CommandLine> {
        self.unsupported("reset")
    }

    fn commit_command(&self, _message: &str, _amend: bool, _files: &[FileChange]) -> Result<CommandLine> {
        self.unsupported("commit")
    }

    fn checkout_command(&self, _reference: &str, _force: bool) -> Result<CommandLine> {
        self.unsupported("checkout")
    }

    fn fetch_command(&self, _target: &FetchTarget, _prune: bool) -> Result<CommandLine> {
        self.unsupported("fetch")
    }

    fn pull_command(&self, _remote: &str, _branch: &str, _options: &PullOptions) -> Result<CommandLine> {
        self.unsupported("pull")
    }

    fn push_command(&self, _remote: &str, _refspecs: &[PushRefSpec], _tags: bool) -> Result<CommandLine> {
        self.unsupported("push")
    }

    fn create_branch_command(&self, _name: &str, _checkout: bool) -> Result<CommandLine> {
        self.unsupported("branch creation")
    }

    fn delete_local_branches_command(&self, _names: &[String], _force: bool) -> Result<CommandLine> {
        self.unsupported("branch deletion")
    }

    fn delete_remote_branches_command(&self, _remote: &str, _names: &[String]) -> Result<CommandLine> {
        self.unsupported("remote branch deletion")
    }

    fn branch_list_command(&self) -> Result<CommandLine> {
        self.unsupported("branch listing")
    }

    fn head_ref_command(&self) -> Result<CommandLine> {
        self.unsupported("current branch lookup")
    }

    fn parse_branches(&self, _ref_list: &str, _head_ref: &str, _head_exit_code: i32) -> Result<Vec<Branch>> {
        self.unsupported("branch parsing")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builder_is_unsupported() {
        let hg = Hg::default();
        assert_eq!(hg.kind(), VcsKind::Hg);
        assert_eq!(hg.executable(), "hg");

        let err = hg.status_command().unwrap_err();
        assert_eq!(err.to_string(), "status is not supported for hg");
        assert!(hg.commit_command("m", false, &[]).is_err());
        assert!(hg.clean_command(&[]).is_err());
        assert!(hg.parse_status("?? a\0").is_err());
        assert!(hg.parse_branches("", "", 0).is_err());
    }
}
