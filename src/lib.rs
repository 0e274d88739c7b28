//! any-open - sends a file or folder path to a configured external program.
//!
//! Entries are looked up by key, checked against the target and the host
//! platform, and launched fire-and-forget with a login shell derived `PATH`.

pub mod config;
pub mod environment;
pub mod error;
pub mod launcher;
pub mod resolver;
pub mod template;

pub use config::{Config, LaunchEntry, Menu, Platform};
pub use error::LaunchError;
pub use launcher::{launch, open_with, LaunchResult, Launched, Notifier};
pub use resolver::{
    availability, is_applicable, is_enabled, Availability, Target, TargetKind, TargetSource,
};
pub use template::CommandTemplate;
