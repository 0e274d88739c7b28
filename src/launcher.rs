//! Application launcher module.
//!
//! This module substitutes the target into an entry's command, derives the
//! child environment and spawns the process without waiting for it. Any
//! failure is reported to the user and to the log, never propagated as a
//! fault to the host.

use crate::config::{Config, LaunchEntry, Platform};
use crate::environment::{self, ProcessEnvironment};
pub use crate::error::NO_OPEN;
use crate::error::{LaunchError, Result};
use crate::resolver::{self, Target, TargetSource};
use crate::template::CommandTemplate;
use std::path::Path;
use std::process::Command;

/// Windows process creation flag that suppresses the console window.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Blocking, user-facing alert channel provided by the host.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// A successfully started process. Its handle is not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Launched {
    pub pid: u32,
}

/// Outcome of a launch. Failures have already been reported when returned.
pub type LaunchResult = Result<Launched>;

/// Launches the entry `key` from `config` for the target found in `source`.
pub fn open_with(
    config: &Config,
    key: &str,
    source: &TargetSource,
    platform: Platform,
    notifier: &dyn Notifier,
) -> LaunchResult {
    let target = match resolver::resolve_target(source) {
        Ok(target) => target,
        Err(err) => {
            notifier.alert(&err.alert_message(None));
            log::debug!("No target for '{}': {}", key, err);
            return Err(err);
        }
    };

    match config.entry(key) {
        Some(entry) => launch(key, entry, &target, platform, notifier),
        None => {
            let err = LaunchError::UnknownKey(key.to_string());
            report(&err, &target, notifier);
            Err(err)
        }
    }
}

/// Launches `entry` for `target`, reporting any failure through `notifier`
/// and the log.
pub fn launch(
    key: &str,
    entry: &LaunchEntry,
    target: &Target,
    platform: Platform,
    notifier: &dyn Notifier,
) -> LaunchResult {
    log::info!("Launching '{}' for {:?}...", key, target.path);

    let result = prepare(key, entry, &target.path).and_then(|command| {
        let mode = if command.is_shell() { "shell" } else { "direct" };
        log::debug!("Running {} command: {}", mode, command);
        let env = environment::derive_environment(&entry.env_adjustments, platform);
        spawn(&command, &env, entry.hide_window && platform == Platform::Windows).map_err(
            |source| LaunchError::Spawn {
                target: target.path.clone(),
                source,
            },
        )
    });

    match result {
        Ok(launched) => {
            log::info!("Started '{}' with PID {}", key, launched.pid);
            Ok(launched)
        }
        Err(err) => {
            report(&err, target, notifier);
            Err(err)
        }
    }
}

/// Substitutes `target` into the entry's command template.
pub fn prepare(key: &str, entry: &LaunchEntry, target: &Path) -> Result<CommandTemplate> {
    let template = entry.command.as_ref().ok_or_else(|| LaunchError::Template {
        key: key.to_string(),
        reason: "no command configured".to_string(),
    })?;

    let reason = match template {
        CommandTemplate::Args(args) if args.is_empty() => {
            Some("command argument list is empty")
        }
        CommandTemplate::Invalid(_) => Some("malformed command"),
        _ => None,
    };
    if let Some(reason) = reason {
        return Err(LaunchError::Template {
            key: key.to_string(),
            reason: reason.to_string(),
        });
    }

    Ok(template.substitute(&target.to_string_lossy()))
}

/// Builds the `Command` for a substituted template.
///
/// Shell strings go through `/bin/sh -c` (`cmd /C` on Windows), argument
/// lists are executed directly.
#[cfg_attr(not(windows), allow(unused_variables))]
pub fn build_command(
    command: &CommandTemplate,
    env: &ProcessEnvironment,
    hide_window: bool,
) -> std::io::Result<Command> {
    let mut cmd = match command {
        CommandTemplate::Shell(line) => shell_command(line),
        CommandTemplate::Args(args) => {
            let (program, rest) = args.split_first().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty argument list")
            })?;
            let mut cmd = Command::new(program);
            cmd.args(rest);
            cmd
        }
        CommandTemplate::Invalid(_) => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "malformed command",
            ))
        }
    };

    cmd.env_clear().envs(env);

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        if hide_window {
            cmd.creation_flags(CREATE_NO_WINDOW);
        }
    }
    Ok(cmd)
}

#[cfg(not(windows))]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("/bin/sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    use std::os::windows::process::CommandExt;
    let mut cmd = Command::new("cmd");
    // Passed raw so the template's own quoting reaches cmd.exe untouched
    cmd.arg("/C").raw_arg(line);
    cmd
}

/// Starts the process and drops its handle.
fn spawn(
    command: &CommandTemplate,
    env: &ProcessEnvironment,
    hide_window: bool,
) -> std::io::Result<Launched> {
    let child = build_command(command, env, hide_window)?.spawn()?;
    Ok(Launched { pid: child.id() })
}

/// Sends the short alert to the user and the full detail to the log.
fn report(err: &LaunchError, target: &Target, notifier: &dyn Notifier) {
    notifier.alert(&err.alert_message(Some(&target.path)));
    log::error!("SubProcess Error:\n{}\n{:?}", err, err);
}
