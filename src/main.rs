use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use vcs_browser::commands::*;
use vcs_browser::core::{
    error::{Result, VcsError},
    print_error,
    vcs::{PullOptions, VcsKind},
    SessionOptions,
};

#[derive(Parser)]
#[command(name = "vcs-browser")]
#[command(about = "Browse and drive a repository's staged and working-tree changes")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Version control backend (git or hg)
    #[arg(long, global = true)]
    vcs: Option<VcsKind>,

    /// Path of the git executable
    #[arg(long = "git", global = true, value_name = "PATH")]
    git_executable: Option<String>,

    /// Read settings from this file instead of the user config
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show numbered staged and working-tree changes
    Status {
        /// Include unmodified and ignored entries
        #[arg(short, long)]
        all: bool,
        /// Print JSON instead of the numbered listing
        #[arg(long)]
        json: bool,
    },
    /// List branches, or check out a local branch by index
    Branches {
        /// Local branch index to check out
        index: Option<usize>,
    },
    /// Poll at the configured tick rate and reprint on changes
    Watch {
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Show the diff of working-tree entries by index (all when omitted)
    Diff {
        /// Entry indices (e.g., "1 3-5,8")
        indices: Vec<String>,
    },
    /// Stage working-tree entries by index
    Add {
        /// Entry indices (e.g., "1 3-5,8")
        indices: Vec<String>,
    },
    /// Delete working-tree entries, or unstage staged ones with --staged
    Remove {
        /// Index into the staged list and unstage
        #[arg(long)]
        staged: bool,
        /// Entry indices (e.g., "1 3-5,8")
        indices: Vec<String>,
    },
    /// Reset staged entries by index (the whole index when omitted)
    Reset {
        /// Reference to reset to
        #[arg(long = "to", default_value = "HEAD")]
        reference: String,
        /// Staged entry indices (e.g., "1 3-5,8")
        indices: Vec<String>,
    },
    /// Commit staged entries by index (everything staged when omitted)
    Commit {
        #[arg(short, long)]
        message: String,
        /// Amend the last commit
        #[arg(long)]
        amend: bool,
        /// Index into the working tree; untracked entries are staged first
        #[arg(short, long)]
        working_tree: bool,
        indices: Vec<String>,
    },
    /// Check out a branch or reference
    Checkout {
        /// Create the branch first
        #[arg(short = 'b', long = "create")]
        create_branch: bool,
        /// Discard local changes
        #[arg(short, long)]
        force: bool,
        reference: String,
    },
    /// Fetch from one remote, or all when omitted
    Fetch {
        remote: Option<String>,
        /// Remove remote-tracking refs that no longer exist
        #[arg(short, long)]
        prune: bool,
    },
    /// Pull a branch (defaults: first remote, current branch)
    Pull {
        remote: Option<String>,
        branch: Option<String>,
        /// Do not commit the merge result
        #[arg(long)]
        no_commit: bool,
        /// Add one-line descriptions of merged commits to the message
        #[arg(long)]
        log: bool,
        /// Always create a merge commit
        #[arg(long)]
        no_ff: bool,
        #[arg(long)]
        rebase: bool,
    },
    /// Push branches as name or local:remote (default: current branch)
    Push {
        remote: Option<String>,
        refspecs: Vec<String>,
        /// Push tags as well
        #[arg(long)]
        tags: bool,
    },
    /// Create or delete branches
    Branch {
        #[command(subcommand)]
        action: BranchCommand,
    },
    /// Create a repository in the current directory
    Init,
}

#[derive(Subcommand)]
enum BranchCommand {
    Create {
        name: String,
        /// Switch to the new branch
        #[arg(short, long)]
        checkout: bool,
    },
    Delete {
        #[arg(required = true)]
        names: Vec<String>,
        /// Delete even when not merged
        #[arg(short = 'D', long)]
        force: bool,
    },
    DeleteRemote {
        remote: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
}

fn run(cli: Cli) -> Result<()> {
    let options = SessionOptions {
        vcs: cli.vcs,
        git_executable: cli.git_executable,
        config_path: cli.config,
    };
    let yes = cli.yes;

    match cli.command {
        Commands::Status { all, json } => execute_status(&options, all, json),
        Commands::Branches { index } => execute_branches(&options, index, yes),
        Commands::Watch { ticks } => execute_watch(&options, ticks),
        Commands::Diff { indices } => execute_diff(&options, &indices),
        Commands::Add { indices } => execute_add(&options, &indices),
        Commands::Remove { staged, indices } => execute_remove(&options, &indices, staged, yes),
        Commands::Reset { reference, indices } => execute_reset(&options, &reference, &indices),
        Commands::Commit {
            message,
            amend,
            working_tree,
            indices,
        } => {
            let args = CommitArgs {
                message: &message,
                amend,
                working_tree,
                indices: &indices,
            };
            execute_commit(&options, &args, yes)
        }
        Commands::Checkout {
            create_branch,
            force,
            reference,
        } => execute_checkout(&options, &reference, create_branch, force, yes),
        Commands::Fetch { remote, prune } => execute_fetch(&options, remote, prune),
        Commands::Pull {
            remote,
            branch,
            no_commit,
            log,
            no_ff,
            rebase,
        } => {
            let pull_options = PullOptions {
                commit: !no_commit,
                log,
                no_ff,
                rebase,
            };
            execute_pull(&options, remote, branch, pull_options)
        }
        Commands::Push { remote, refspecs, tags } => execute_push(&options, remote, &refspecs, tags),
        Commands::Branch { action } => {
            let action = match action {
                BranchCommand::Create { name, checkout } => BranchAction::Create { name, checkout },
                BranchCommand::Delete { names, force } => BranchAction::Delete { names, force },
                BranchCommand::DeleteRemote { remote, names } => BranchAction::DeleteRemote { remote, names },
            };
            execute_branch(&options, action, yes)
        }
        Commands::Init => execute_init(&options),
    }
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(cli) {
        match e {
            VcsError::NotInRepository => print_error("Not in a repository"),
            // usage was already printed
            VcsError::NoIndicesProvided => {}
            other => print_error(&other.to_string()),
        }
        std::process::exit(1);
    }
}
