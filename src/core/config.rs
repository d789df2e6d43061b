//! Session configuration.
//!
//! Settings are read from `<config dir>/vcs-browser/config.json` when the file exists and
//! fall back to defaults otherwise. Every field is optional in the file. The browser
//! never writes settings back.
//!
//! ```json
//! { "vcs": "git", "git_executable": "/usr/bin/git", "poll_interval_ticks": 300 }
//! ```

use crate::core::dirs::get_config_file;
use crate::core::error::{Result, VcsError};
use crate::core::vcs::VcsKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    pub vcs: VcsKind,
    pub git_executable: String,
    pub hg_executable: String,
    /// Ticks between two status polls
    pub poll_interval_ticks: u32,
    /// Tick period used by hosts that drive the session from a loop
    pub tick_interval_ms: u64,
    pub repository_check_timeout_ms: u64,
    pub head_ref_timeout_ms: u64,
    pub sync_command_timeout_ms: u64,
    /// Bound on a pending status poll before it is killed
    pub status_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            vcs: VcsKind::Git,
            git_executable: "git".to_string(),
            hg_executable: "hg".to_string(),
            poll_interval_ticks: 600,
            tick_interval_ms: 10,
            repository_check_timeout_ms: 5000,
            head_ref_timeout_ms: 6000,
            sync_command_timeout_ms: 5000,
            status_timeout_ms: 6000,
        }
    }
}

impl SessionConfig {
    /// Load the user config file, or defaults when there is none
    pub fn load() -> Result<Self> {
        let path = get_config_file();
        if path.exists() {
            Self::load_from(&path)
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VcsError::config_read_failed(path, e))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| VcsError::config_parse_failed(path, e))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
