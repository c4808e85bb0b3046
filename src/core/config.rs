//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.librarian/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::library::LoanPolicy;
use crate::library::services::{
    DEFAULT_LOAN_EXTENSION_DAYS, DEFAULT_LOAN_PERIOD_DAYS, DEFAULT_MEMBERSHIP_TERM_DAYS,
    DEFAULT_RENEWAL_WINDOW_DAYS,
};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LibrarianConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub loans: LoansConfig,
    #[serde(default)]
    pub membership: MembershipConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub data_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoansConfig {
    pub loan_period_days: Option<u32>,
    pub loan_extension_days: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MembershipConfig {
    pub membership_term_days: Option<u32>,
    pub renewal_window_days: Option<u32>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LOG_FILE: &str = "librarian.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub policy: LoanPolicy,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.librarian/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".librarian").join("config.toml"))
}

/// Load config from `~/.librarian/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `LibrarianConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<LibrarianConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(LibrarianConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<LibrarianConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(LibrarianConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: LibrarianConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Librarian Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# data_dir = "data"                  # Or set LIBRARIAN_DATA_DIR / --data-dir
# log_file = "librarian.log"         # Or set LIBRARIAN_LOG_FILE / --log-file
# log_level = "info"                 # "off", "error", "warn", "info", "debug", "trace"

# [loans]
# loan_period_days = 14
# loan_extension_days = 14

# [membership]
# membership_term_days = 365
# renewal_window_days = 30           # Renewal refused while more days than this remain
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &LibrarianConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &LibrarianConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Data directory: CLI → env → config → default
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| env("LIBRARIAN_DATA_DIR").map(PathBuf::from))
        .or_else(|| config.general.data_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env("LIBRARIAN_LOG_FILE").map(PathBuf::from))
        .or_else(|| config.general.log_file.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    // Unparseable levels fall through to the next layer
    let log_level = [
        cli.log_level.clone(),
        env("LIBRARIAN_LOG_LEVEL"),
        config.general.log_level.clone(),
    ]
    .into_iter()
    .flatten()
    .find_map(|level| LevelFilter::from_str(&level).ok())
    .unwrap_or(DEFAULT_LOG_LEVEL);

    let policy = LoanPolicy {
        loan_period_days: config.loans.loan_period_days.unwrap_or(DEFAULT_LOAN_PERIOD_DAYS),
        loan_extension_days: config
            .loans
            .loan_extension_days
            .unwrap_or(DEFAULT_LOAN_EXTENSION_DAYS),
        membership_term_days: config
            .membership
            .membership_term_days
            .unwrap_or(DEFAULT_MEMBERSHIP_TERM_DAYS),
        renewal_window_days: config
            .membership
            .renewal_window_days
            .unwrap_or(DEFAULT_RENEWAL_WINDOW_DAYS),
    };

    ResolvedConfig { data_dir, log_file, log_level, policy }
}
