use super::{pathspecs, Collection, CommandLine, FetchTarget, PullOptions, PushRefSpec, VcsKind, VersionControl};
use crate::core::branch_parser::{self, Branch};
use crate::core::error::Result;
use crate::core::file_change::FileChange;
use crate::core::status_parser;

/// Git backend. Every command disables path quoting so non-ASCII paths come back verbatim.
#[derive(Debug, Clone)]
pub struct Git {
    executable: String,
}

impl Git {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn base(&self) -> CommandLine {
        CommandLine::new(&self.executable).args(["-c", "core.quotepath=false"])
    }

    fn with_paths(cmd: CommandLine, files: &[FileChange]) -> CommandLine {
        if files.is_empty() {
            cmd
        } else {
            cmd.arg("--").args(pathspecs(files))
        }
    }
}

impl Default for Git {
    fn default() -> Self {
        Self::new("git")
    }
}

impl VersionControl for Git {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    fn executable(&self) -> &str {
        &self.executable
    }

    fn is_inside_work_tree_command(&self) -> Result<CommandLine> {
        Ok(self.base().args(["rev-parse", "--is-inside-work-tree"]))
    }

    fn show_toplevel_command(&self) -> Result<CommandLine> {
        Ok(self.base().args(["rev-parse", "--show-toplevel"]))
    }

    fn init_command(&self) -> Result<CommandLine> {
        Ok(self.base().arg("init"))
    }

    fn status_command(&self) -> Result<CommandLine> {
        Ok(self
            .base()
            .args(["status", "--porcelain", "--ignored", "--untracked-files", "-z"]))
    }

    fn parse_status(&self, raw: &str) -> Result<Vec<FileChange>> {
        status_parser::parse_status(raw)
    }

    fn diff_command(&self, files: &[FileChange]) -> Result<CommandLine> {
        Ok(Self::with_paths(self.base().args(["diff", "--no-ext-diff"]), files))
    }

    fn add_command(&self, files: &[FileChange]) -> Result<CommandLine> {
        Ok(Self::with_paths(self.base().args(["add", "-A"]), files))
    }

    fn remove_command(&self, files: &[FileChange], from: Collection) -> Result<CommandLine> {
        let cmd = match from {
            Collection::Staged => self.base().args(["reset", "HEAD"]),
            Collection::WorkingTree => self.base().args(["rm", "-f"]),
        };
        Ok(Self::with_paths(cmd, files))
    }

    fn clean_command(&self, files: &[FileChange]) -> Result<CommandLine> {
        Ok(Self::with_paths(self.base().args(["clean", "-f"]), files))
    }

    fn reset_command(&self, reference: &str, files: &[FileChange]) -> Result<CommandLine> {
        Ok(Self::with_paths(self.base().args(["reset", reference]), files))
    }

    fn commit_command(&self, message: &str, amend: bool, files: &[FileChange]) -> Result<CommandLine> {
        let mut cmd = self.base().arg("commit");
        if amend {
            cmd = cmd.arg("--amend");
        }
        Ok(Self::with_paths(cmd.args(["-m", message]), files))
    }

    fn checkout_command(&self, reference: &str, force: bool) -> Result<CommandLine> {
        let mut cmd = self.base().arg("checkout");
        if force {
            cmd = cmd.arg("-f");
        }
        Ok(cmd.arg(reference))
    }

    fn fetch_command(&self, target: &FetchTarget, prune: bool) -> Result<CommandLine> {
        let cmd = match target {
            FetchTarget::All => self.base().args(["fetch", "--all"]),
            FetchTarget::Remote(remote) => self.base().args(["fetch", remote.as_str()]),
        };
        Ok(if prune { cmd.arg("--prune") } else { cmd })
    }

    fn pull_command(&self, remote: &str, branch: &str, options: &PullOptions) -> Result<CommandLine> {
        let mut cmd = self.base().args(["pull", remote, branch]);
        if !options.commit {
            cmd = cmd.arg("--no-commit");
        }
        if options.log {
            cmd = cmd.arg("--log");
        }
        if options.no_ff {
            cmd = cmd.arg("--no-ff");
        }
        if options.rebase {
            cmd = cmd.arg("--rebase");
        }
        Ok(cmd)
    }

    fn push_command(&self, remote: &str, refspecs: &[PushRefSpec], tags: bool) -> Result<CommandLine> {
        let cmd = self
            .base()
            .args(["push", remote])
            .args(refspecs.iter().map(PushRefSpec::to_string));
        Ok(if tags { cmd.arg("--tags") } else { cmd })
    }

    fn create_branch_command(&self, name: &str, checkout: bool) -> Result<CommandLine> {
        Ok(if checkout {
            self.base().args(["checkout", "-b", name])
        } else {
            self.base().args(["branch", name])
        })
    }

    fn delete_local_branches_command(&self, names: &[String], force: bool) -> Result<CommandLine> {
        let flag = if force { "-D" } else { "-d" };
        Ok(self.base().args(["branch", flag]).args(names.iter().cloned()))
    }

    fn delete_remote_branches_command(&self, remote: &str, names: &[String]) -> Result<CommandLine> {
        let refspecs = names.iter().map(|name| PushRefSpec::new("", name.as_str()));
        Ok(self.base().args(["push", remote]).args(refspecs.map(|spec| spec.to_string())))
    }

    fn branch_list_command(&self) -> Result<CommandLine> {
        Ok(self
            .base()
            .args(["for-each-ref", "--format=%(refname)", "refs/heads", "refs/remotes"]))
    }

    fn head_ref_command(&self) -> Result<CommandLine> {
        Ok(self.base().args(["symbolic-ref", "HEAD"]))
    }

    fn parse_branches(&self, ref_list: &str, head_ref: &str, head_exit_code: i32) -> Result<Vec<Branch>> {
        branch_parser::parse_branches(ref_list, head_ref, head_exit_code)
    }
}
