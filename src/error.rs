//! Error kinds raised while resolving and launching an entry.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Alert text shown when there is no target to open.
pub const NO_OPEN: &str = "Nothing to open!";

pub type Result<T> = std::result::Result<T, LaunchError>;

#[derive(Debug, Error)]
pub enum LaunchError {
    /// Neither an explicit path nor an existing active file was available.
    #[error("no target path to open")]
    NoTarget,
    #[error("unknown launch entry '{0}'")]
    UnknownKey(String),
    #[error("launch entry '{key}' has an unusable command: {reason}")]
    Template { key: String, reason: String },
    #[error("failed to spawn command for '{}': {source}", target.display())]
    Spawn {
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    /// Short text for the blocking user alert, naming the target when known.
    pub fn alert_message(&self, target: Option<&Path>) -> String {
        let target = match self {
            LaunchError::NoTarget => return NO_OPEN.to_string(),
            LaunchError::Spawn { target, .. } => Some(target.as_path()),
            _ => target,
        };
        match target {
            Some(target) => format!("AnyOpen failed to open '{}'", target.display()),
            None => "AnyOpen failed to open the selection".to_string(),
        }
    }
}
