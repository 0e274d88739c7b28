//! any-open - Opens files and folders with configured external programs.
//!
//! This binary stands in for the editor host: it loads the launch
//! configuration, works out the target and hands off to the library.

use any_open::environment;
use any_open::{
    availability, is_applicable, open_with, Availability, Config, LaunchEntry, Menu, Notifier,
    Platform, Target, TargetSource,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// List entries available on this platform
    List {
        /// Only show entries applicable to this path
        path: Option<PathBuf>,
        /// Only show entries offered in this menu
        #[arg(long, value_enum)]
        menu: Option<MenuArg>,
    },
    /// Check whether an entry applies to a path
    Check { key: String, path: PathBuf },
    /// Launch an entry for the selected paths or the active file
    Open {
        key: String,
        /// Explicit selection; the first path is used
        paths: Vec<PathBuf>,
        /// File open in the editor, used when no path is given
        #[arg(long)]
        active_file: Option<PathBuf>,
        /// Skip the applicability check
        #[arg(long)]
        force: bool,
    },
    /// Print the environment an entry would be launched with
    Env { key: Option<String> },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MenuArg {
    Sidebar,
    Context,
}

impl From<MenuArg> for Menu {
    fn from(menu: MenuArg) -> Self {
        match menu {
            MenuArg::Sidebar => Menu::Sidebar,
            MenuArg::Context => Menu::Context,
        }
    }
}

/// Alerts go to stderr since there is no dialog to block on.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("[AnyOpen] {}", message);
    }
}

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("any_open=info"),
    )
    .format_timestamp_millis()
    .try_init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    // 1. Load configuration
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let platform = Platform::current();

    // 2. Dispatch
    match args.command {
        Action::List { path, menu } => {
            let target = path.map(Target::from_path);
            let entries: Vec<(&str, &LaunchEntry)> = match menu {
                Some(menu) => config.menu_entries(platform, menu.into()).collect(),
                None => config
                    .open_with
                    .iter()
                    .filter(|(_, entry)| entry.supports(platform))
                    .map(|(key, entry)| (key.as_str(), entry))
                    .collect(),
            };
            for (key, entry) in entries {
                if target.as_ref().is_some_and(|t| !is_applicable(entry, t, platform)) {
                    continue;
                }
                println!("{}\t{}", key, entry.caption.as_deref().unwrap_or(key));
            }
            Ok(ExitCode::SUCCESS)
        }
        Action::Check { key, path } => {
            let code = match availability(&config, &key, &Target::from_path(path), platform) {
                Availability::Available => {
                    println!("available");
                    0
                }
                Availability::NotApplicable => {
                    println!("not applicable");
                    1
                }
                Availability::UnknownKey => {
                    println!("unknown key");
                    2
                }
            };
            Ok(ExitCode::from(code))
        }
        Action::Open {
            key,
            paths,
            active_file,
            force,
        } => {
            let source = if !paths.is_empty() {
                TargetSource::Paths(paths)
            } else if active_file.is_some() {
                TargetSource::ActiveFile(active_file)
            } else {
                TargetSource::Nothing
            };

            if !force {
                if let Ok(target) = any_open::resolver::resolve_target(&source) {
                    let available = availability(&config, &key, &target, platform);
                    if available == Availability::NotApplicable {
                        anyhow::bail!(
                            "'{}' is not available for {:?} on {}",
                            key,
                            target.path,
                            platform
                        );
                    }
                }
            }

            match open_with(&config, &key, &source, platform, &ConsoleNotifier) {
                Ok(_) => Ok(ExitCode::SUCCESS),
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }
        Action::Env { key } => {
            let adjustments = match &key {
                Some(key) => config
                    .entry(key)
                    .map(|entry| entry.env_adjustments.clone())
                    .with_context(|| format!("Unknown entry '{}'", key))?,
                None => Default::default(),
            };
            for (name, value) in environment::derive_environment(&adjustments, platform) {
                println!("{}={}", name.to_string_lossy(), value.to_string_lossy());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
