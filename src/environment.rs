//! Environment derivation for launched processes.
//!
//! Each launch gets a fresh copy of the ambient environment. On Unix-like
//! hosts `PATH` is replaced with the one a login shell reports, since an
//! editor started from a desktop session misses profile customizations.
//! The host process environment is never modified.

use crate::config::Platform;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::process::{Command, Stdio};

/// Wraps the probed `PATH` so it can be picked out of noisy profile output.
const PATH_DELIMITER: &str = "#@#@#";

/// Variables forced on every child for predictable text handling.
const FORCED_VARS: [(&str, &str); 3] = [
    ("PYTHONIOENCODING", "utf8"),
    ("LANG", "en_US.UTF-8"),
    ("LC_CTYPE", "en_US.UTF-8"),
];

/// Environment handed to a spawned process.
pub type ProcessEnvironment = BTreeMap<OsString, OsString>;

/// Derives the environment from the current process environment.
pub fn derive_environment(
    adjustments: &BTreeMap<String, Option<String>>,
    platform: Platform,
) -> ProcessEnvironment {
    derive_from(std::env::vars_os(), adjustments, platform)
}

/// Derives the environment from an explicit ambient snapshot.
pub fn derive_from<I>(
    ambient: I,
    adjustments: &BTreeMap<String, Option<String>>,
    platform: Platform,
) -> ProcessEnvironment
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut env: ProcessEnvironment = ambient.into_iter().collect();

    if platform != Platform::Windows {
        match env.get(OsStr::new("SHELL")).cloned() {
            Some(shell) => {
                if let Some(path) = login_shell_path(&shell, &env) {
                    log::debug!("Using login shell PATH: {}", path);
                    env.insert("PATH".into(), path.into());
                }
            }
            None => log::debug!("SHELL is not set, keeping inherited PATH"),
        }
    }

    for (name, value) in adjustments {
        match value {
            Some(value) => {
                env.insert(name.into(), value.into());
            }
            None => {
                env.remove(OsStr::new(name));
            }
        }
    }

    for (name, value) in FORCED_VARS {
        env.insert(name.into(), value.into());
    }

    env
}

/// Asks `shell` in login mode for its `PATH`.
///
/// Returns `None` when the shell cannot be started or its output does not
/// contain a complete delimited value.
pub fn login_shell_path(shell: &OsStr, env: &ProcessEnvironment) -> Option<String> {
    let probe = format!("echo \"{0}${{PATH}}{0}\"", PATH_DELIMITER);
    let output = match Command::new(shell)
        .args(["-l", "-c", probe.as_str()])
        .env_clear()
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            log::warn!("Failed to probe login shell {:?}: {}", shell, err);
            return None;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = extract_delimited(&stdout);
    if path.is_none() {
        log::warn!("Login shell {:?} did not report a usable PATH", shell);
    }
    path.map(str::to_string)
}

/// Picks the first value enclosed by a pair of delimiters.
/// A missing closing delimiter or an empty value yields `None`.
fn extract_delimited(output: &str) -> Option<&str> {
    let start = output.find(PATH_DELIMITER)? + PATH_DELIMITER.len();
    let len = output[start..].find(PATH_DELIMITER)?;
    let value = &output[start..start + len];
    (!value.is_empty()).then_some(value)
}
