//! Configuration management module for any-open.
//!
//! This module handles loading the launch configuration from JSON or TOML
//! settings files. Each entry describes an external command, the platforms
//! and file types it applies to, and how its environment is adjusted.

use crate::template::CommandTemplate;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Wildcard platform identifier, matches any host.
pub const ANY_PLATFORM: &str = "*";

/// Name of the settings file inside the config directory.
const SETTINGS_FILE: &str = "any_open.json";

/// Host operating system as named in the `platform` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Osx,
    Linux,
}

impl Platform {
    /// Platform of the running binary.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Osx
        } else {
            Platform::Linux
        }
    }

    /// Identifier used in the `platform` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Osx => "osx",
            Platform::Linux => "linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Menus an entry can be listed in by the host editor.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Menu {
    Sidebar,
    Context,
}

fn default_menus() -> Vec<Menu> {
    vec![Menu::Sidebar, Menu::Context]
}

/// Configuration for a single launch entry.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct LaunchEntry {
    /// Display label, only used by the host UI
    #[serde(default)]
    pub caption: Option<String>,
    /// Command template, a shell string or an argument list
    #[serde(default, rename = "cmd")]
    pub command: Option<CommandTemplate>,
    /// Platforms the entry applies to ("windows", "osx", "linux" or "*")
    #[serde(default, rename = "platform")]
    pub platforms: Vec<String>,
    /// File suffixes the entry is limited to, empty means any file
    #[serde(default, rename = "filter")]
    pub file_filter: Vec<String>,
    /// Suppress the console window on Windows
    #[serde(default)]
    pub hide_window: bool,
    /// Never offer the entry for directories
    #[serde(default)]
    pub exclude_folders: bool,
    /// Environment overrides, `None` unsets the variable
    #[serde(default, rename = "env")]
    pub env_adjustments: BTreeMap<String, Option<String>>,
    /// Host menus showing the entry
    #[serde(default = "default_menus")]
    pub menus: Vec<Menu>,
}

impl LaunchEntry {
    /// Whether `platform` is listed, either by name or through the wildcard.
    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms
            .iter()
            .any(|p| p == ANY_PLATFORM || p == platform.as_str())
    }
}

/// Root configuration structure containing all launch entries.
#[derive(Deserialize, Debug, Default)]
pub struct Config {
    /// Map of entry keys to their configurations
    #[serde(default)]
    pub open_with: BTreeMap<String, LaunchEntry>,
}

impl Config {
    /// Loads configuration from the standard config file location.
    /// Creates a default config file if it doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path();

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            log::info!("Created default config at: {:?}", config_path);
        }

        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit file.
    /// `.toml` files are parsed as TOML, everything else as JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            toml::from_str(&config_str)
                .with_context(|| format!("Failed to parse TOML config file: {:?}", path))
        } else {
            Self::from_json(&config_str)
                .with_context(|| format!("Failed to parse JSON config file: {:?}", path))
        }
    }

    /// Parses a JSON settings document.
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Returns the path to the configuration file.
    /// Uses XDG_CONFIG_HOME if set, otherwise falls back to ~/.config
    pub fn get_config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                    .join(".config")
            });
        config_dir.join("any-open").join(SETTINGS_FILE)
    }

    /// Entry configured under `key`, if any.
    pub fn entry(&self, key: &str) -> Option<&LaunchEntry> {
        self.open_with.get(key)
    }

    /// Entries offered in `menu` on `platform`, in key order.
    pub fn menu_entries(
        &self,
        platform: Platform,
        menu: Menu,
    ) -> impl Iterator<Item = (&str, &LaunchEntry)> {
        self.open_with
            .iter()
            .filter(move |(_, entry)| entry.supports(platform) && entry.menus.contains(&menu))
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Writes a minimal example configuration to `path`.
    fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let minimal_config = r#"{
    "open_with": {
        "file_manager": {
            "caption": "Open in File Manager",
            "cmd": ["xdg-open", "${PATH}"],
            "platform": ["linux"],
            "menus": ["sidebar"]
        },
        "finder": {
            "caption": "Reveal in Finder",
            "cmd": ["open", "-R", "${PATH}"],
            "platform": ["osx"]
        },
        "explorer": {
            "caption": "Open in Explorer",
            "cmd": "explorer \"${PATH}\"",
            "platform": ["windows"],
            "hide_window": true
        }
    }
}
"#;

        fs::write(path, minimal_config)
            .with_context(|| format!("Failed to write default config to: {:?}", path))?;

        log::warn!("Please edit {:?} to add your launch entries.", path);

        Ok(())
    }
}
