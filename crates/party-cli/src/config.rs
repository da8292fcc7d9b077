//! Configuration file management for partyplan.
//!
//! Provides a TOML-based config file at `~/.config/partyplan/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use party_core::Language;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub ui: UiSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
    /// Simulated generation latency for the mock backend.
    pub mock_delay_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            mock_delay_ms: DEFAULT_MOCK_DELAY_MS,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Language code (`zh` or `en`).
    pub language: String,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            language: Language::default().code().to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    /// Directory holding `storage.json`. Defaults to the XDG data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MOCK_DELAY_MS: u64 = 1500;

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the partyplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/partyplan` or
/// `~/.config/partyplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("partyplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("partyplan")
}

/// Return the path to the partyplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Return the default directory for persisted form state.
///
/// `$XDG_DATA_HOME/partyplan` or `~/.local/share/partyplan`.
pub fn default_data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg).join("partyplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local")
        .join("share")
        .join("partyplan")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse a config file. `Ok(None)` when the file does not exist.
pub fn load_config_from(path: &Path) -> Result<Option<ConfigFile>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read config file at {}", path.display()));
        }
    };
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write a config file, creating parent dirs as needed.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;
    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line; `None` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub language: Option<String>,
    pub data_dir: Option<PathBuf>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone)]
pub struct PartyConfig {
    pub bind: String,
    pub port: u16,
    pub mock_delay: Duration,
    pub data_dir: PathBuf,
    /// Language forced by a CLI flag or env var, if any.
    pub explicit_language: Option<Language>,
    /// Language from the config file, or the built-in default.
    pub default_language: Language,
}

impl PartyConfig {
    /// Resolve configuration from the default config path.
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        Self::resolve_with_file(cli, &config_path())
    }

    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - bind: `--bind` > `PARTYPLAN_BIND` > `server.bind` > `127.0.0.1`
    /// - port: `--port` > `PARTYPLAN_PORT` > `server.port` > `3000`
    /// - mock delay: `PARTYPLAN_MOCK_DELAY_MS` > `server.mock_delay_ms` > `1500`
    /// - data dir: `--data-dir` > `PARTYPLAN_DATA_DIR` > `storage.data_dir` > XDG data dir
    /// - language: `--lang` > `PARTYPLAN_LANG` (explicit), else `ui.language` > `zh`
    pub fn resolve_with_file(cli: &CliOverrides, path: &Path) -> Result<Self> {
        let file = load_config_from(path)?.unwrap_or_default();

        let bind = cli
            .bind
            .clone()
            .or_else(|| std::env::var("PARTYPLAN_BIND").ok())
            .unwrap_or(file.server.bind);

        let port = match cli.port {
            Some(port) => port,
            None => match std::env::var("PARTYPLAN_PORT") {
                Ok(raw) => raw
                    .parse()
                    .with_context(|| format!("PARTYPLAN_PORT is not a valid port: {raw:?}"))?,
                Err(_) => file.server.port,
            },
        };

        let mock_delay_ms = match std::env::var("PARTYPLAN_MOCK_DELAY_MS") {
            Ok(raw) => raw.parse().with_context(|| {
                format!("PARTYPLAN_MOCK_DELAY_MS is not a number of milliseconds: {raw:?}")
            })?,
            Err(_) => file.server.mock_delay_ms,
        };

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| std::env::var_os("PARTYPLAN_DATA_DIR").map(PathBuf::from))
            .or(file.storage.data_dir)
            .unwrap_or_else(default_data_dir);

        let explicit_language = cli
            .language
            .clone()
            .or_else(|| std::env::var("PARTYPLAN_LANG").ok())
            .map(|code| {
                code.parse::<Language>().unwrap_or_else(|err| {
                    tracing::warn!("{err}; falling back to {}", Language::default());
                    Language::default()
                })
            });
        let default_language = Language::from_code_lossy(&file.ui.language);

        Ok(Self {
            bind,
            port,
            mock_delay: Duration::from_millis(mock_delay_ms),
            data_dir,
            explicit_language,
            default_language,
        })
    }

    /// Language for CLI output: explicit flag/env > persisted choice > config.
    pub fn language_with(&self, persisted: Option<Language>) -> Language {
        self.explicit_language
            .or(persisted)
            .unwrap_or(self.default_language)
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
