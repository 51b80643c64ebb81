use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::ColorChoice;

pub const CONFIG_ENV: &str = "RUN_IN_SUBDIRS_CONFIG";

#[cfg(unix)]
const DEFAULT_SHELL: &str = "sh";
#[cfg(windows)]
const DEFAULT_SHELL: &str = "cmd";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub targets: TargetsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default)]
    pub shell: Option<String>,
    #[serde(default)]
    pub concurrent: bool,
    #[serde(default)]
    pub color: Option<ColorChoice>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetsConfig {
    #[serde(default)]
    pub skip_hidden: bool,
}

impl Config {
    /// Shell program with `~/` expanded, falling back to the platform shell.
    pub fn shell(&self) -> PathBuf {
        match &self.general.shell {
            Some(shell) if !shell.trim().is_empty() => expand_tilde(shell.trim()),
            _ => PathBuf::from(DEFAULT_SHELL),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let proj = directories::ProjectDirs::from("", "", "run-in-subdirs")?;
    Some(proj.config_dir().join("config.toml"))
}

/// A missing config file is not an error; every setting has a default.
pub fn load_default_config() -> Result<Config> {
    match default_config_path() {
        Some(path) if path.exists() => load_config(&path),
        Some(path) => {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Config::default())
        }
        None => {
            log::debug!("could not determine config directory, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    let config = parse_config(&contents)
        .with_context(|| format!("invalid config at {}", path.display()))?;
    log::debug!("loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).context("failed to parse config TOML")
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    } else if path == "~" {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home);
        }
    }
    PathBuf::from(path)
}
