//! Centralized initialization for CLI commands.
//!
//! Every command opens a [`BrowserSession`] the same way: load the configuration,
//! apply command-line overrides, resolve the repository and poll status once.
//! Commands that act on files additionally turn the user's index arguments into
//! selection clicks on the displayed collection.
//!
//! # Public API
//! - [`SessionOptions`]: Global command-line overrides
//! - [`IndexCommandInit`]: Session opening and index-to-selection setup
//! - [`IndexCommandContext`]: An opened session with the requested entries selected

use crate::core::{
    args_parser::ArgsParser,
    config::SessionConfig,
    error::{Result, VcsError},
    file_change::FileChange,
    index_parser::IndexRange,
    selection::SelectRequest,
    session::BrowserSession,
    vcs::{Collection, VcsKind},
};
use std::env;
use std::path::PathBuf;

/// Overrides given on the command line; unset fields keep the configured value
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub vcs: Option<VcsKind>,
    pub git_executable: Option<String>,
    pub config_path: Option<PathBuf>,
}

impl SessionOptions {
    pub fn load_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config_path {
            Some(path) => SessionConfig::load_from(path)?,
            None => SessionConfig::load()?,
        };
        if let Some(vcs) = self.vcs {
            config.vcs = vcs;
        }
        if let Some(executable) = &self.git_executable {
            config.git_executable = executable.clone();
        }
        Ok(config)
    }
}

/// A session whose selection holds the entries named on the command line
pub struct IndexCommandContext {
    pub session: BrowserSession,
    pub collection: Collection,
}

impl IndexCommandContext {
    pub fn selected_files(&self) -> Vec<&FileChange> {
        self.session.state().selected_in(self.collection)
    }

    pub fn selected_count(&self) -> usize {
        self.selected_files().len()
    }
}

pub struct IndexCommandInit;

impl IndexCommandInit {
    /// Open a session in the current directory and poll status once
    pub fn open_session(options: &SessionOptions) -> Result<BrowserSession> {
        let config = options.load_config()?;
        let current_dir = env::current_dir()?;
        log::debug!("Opening {} session in {}", config.vcs, current_dir.display());

        let mut session = BrowserSession::new(config, current_dir);
        session.enable()?;
        let summary = session.refresh()?;
        log::debug!(
            "Initial poll: {} inserted, {} updated, {} removed",
            summary.inserted,
            summary.updated,
            summary.removed
        );
        Ok(session)
    }

    /// Open a session and select the entries of `collection` named by `indices_args`
    pub fn initialize(
        options: &SessionOptions,
        collection: Collection,
        indices_args: &[String],
    ) -> Result<IndexCommandContext> {
        if indices_args.is_empty() {
            return Err(VcsError::NoIndicesProvided);
        }

        let mut session = Self::open_session(options)?;
        let visible = session.state().visible_keys(collection);
        if visible.is_empty() {
            return Err(VcsError::NoFilesAvailable);
        }

        let ranges = ArgsParser::parse_ranges(indices_args, visible.len())?;
        Self::apply_ranges(&mut session, collection, &visible, &ranges);

        log::debug!(
            "Selected {} of {} entries",
            session.state().selected_in(collection).len(),
            visible.len()
        );
        Ok(IndexCommandContext {
            session,
            collection,
        })
    }

    /// Apply validated 1-based ranges as clicks: a single index is a multi-select
    /// toggle, a range is an anchor click followed by a shift-click on its end.
    pub fn apply_ranges(
        session: &mut BrowserSession,
        collection: Collection,
        visible: &[String],
        ranges: &[IndexRange],
    ) {
        for range in ranges {
            let start = range.start - 1;
            let anchor = SelectRequest::click(collection, visible[start].clone(), start).toggle(true);
            session.select(&anchor);

            if !range.is_single() {
                let end = range.end - 1;
                let shift = SelectRequest::click(collection, visible[end].clone(), end)
                    .toggle(true)
                    .extend_from(start);
                session.select(&shift);
            }
        }
    }
}
