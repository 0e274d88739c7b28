//! Command templates and target path substitution.
//!
//! A template is either a single string run through the shell, or an
//! argument vector executed directly. The two forms escape differently.

use serde::de::IgnoredAny;
use serde::Deserialize;

/// Placeholder replaced with the target path.
pub const PLACEHOLDER: &str = "${PATH}";

/// The `cmd` field of a launch entry.
///
/// A value that is neither a string nor a list of strings is kept as
/// `Invalid` so the rest of the configuration still loads.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CommandTemplate {
    /// Interpreted by the shell after substitution
    Shell(String),
    /// Program followed by its arguments, no shell involved
    Args(Vec<String>),
    /// Anything else, rejected at launch time
    Invalid(IgnoredAny),
}

impl CommandTemplate {
    /// Replaces every placeholder with `target`.
    ///
    /// In the shell form embedded double quotes are escaped with a backslash
    /// so a quoted `"${PATH}"` stays a single word. Argument lists are
    /// passed verbatim.
    pub fn substitute(&self, target: &str) -> CommandTemplate {
        match self {
            CommandTemplate::Shell(template) => {
                let escaped = target.replace('"', "\\\"");
                CommandTemplate::Shell(template.replace(PLACEHOLDER, &escaped))
            }
            CommandTemplate::Args(args) => CommandTemplate::Args(
                args.iter()
                    .map(|arg| {
                        if arg.contains(PLACEHOLDER) {
                            arg.replace(PLACEHOLDER, target)
                        } else {
                            arg.clone()
                        }
                    })
                    .collect(),
            ),
            CommandTemplate::Invalid(_) => self.clone(),
        }
    }

    /// Whether the command runs through the shell.
    pub fn is_shell(&self) -> bool {
        matches!(self, CommandTemplate::Shell(_))
    }
}

impl std::fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandTemplate::Shell(command) => f.write_str(command),
            CommandTemplate::Args(args) => write!(f, "{:?}", args),
            CommandTemplate::Invalid(_) => f.write_str("<malformed command>"),
        }
    }
}
