//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/wordlink/config.toml)
//! 3. Environment variables (WORDLINK_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::RenderMode;
use crate::models::OwnerId;

/// Environment variable prefix
const ENV_PREFIX: &str = "WORDLINK";

/// Owner used until real authentication exists
pub const DEFAULT_OWNER_ID: OwnerId = 1;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage (SQLite db)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// The acting owner for every command
    #[serde(default = "default_owner_id")]
    pub owner_id: OwnerId,

    /// How associated words are turned into links
    #[serde(default)]
    pub render_mode: RenderMode,

    /// Log file path (stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Log level filter (error, warn, info, debug, trace)
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            owner_id: DEFAULT_OWNER_ID,
            render_mode: RenderMode::default(),
            log_file: None,
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (WORDLINK_DATA_DIR, WORDLINK_OWNER_ID, ...)
    /// 2. Config file (~/.config/wordlink/config.toml or WORDLINK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_OWNER_ID", ENV_PREFIX)) {
            self.owner_id = val
                .trim()
                .parse::<OwnerId>()
                .with_context(|| format!("Invalid {}_OWNER_ID: {:?}", ENV_PREFIX, val))?;
        }

        if let Ok(val) = std::env::var(format!("{}_RENDER_MODE", ENV_PREFIX)) {
            self.render_mode = val
                .parse::<RenderMode>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid {}_RENDER_MODE", ENV_PREFIX))?;
        }

        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }

        if let Ok(val) = std::env::var(format!("{}_LOG_LEVEL", ENV_PREFIX)) {
            self.log_level = if val.is_empty() { None } else { Some(val) };
        }

        Ok(())
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with WORDLINK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordlink")
            .join("config.toml")
    }

    /// Get the path to the SQLite database
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("wordlink.db")
    }

    /// Effective log level, `warn` unless configured
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordlink")
}

fn default_owner_id() -> OwnerId {
    DEFAULT_OWNER_ID
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "WORDLINK_DATA_DIR",
        "WORDLINK_OWNER_ID",
        "WORDLINK_RENDER_MODE",
        "WORDLINK_LOG_FILE",
        "WORDLINK_LOG_LEVEL",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.owner_id, DEFAULT_OWNER_ID);
        assert_eq!(config.render_mode, RenderMode::Sequential);
        assert!(config.log_file.is_none());
        assert_eq!(config.log_level(), "warn");
        assert!(config.data_dir.ends_with("wordlink"));
    }

    #[test]
    fn test_sqlite_path() {
        let config = Config::default();
        assert!(config.sqlite_path().ends_with("wordlink.db"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("WORDLINK_DATA_DIR", "/tmp/wordlink-test");
        config.apply_env_overrides().unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/wordlink-test"));
    }

    #[test]
    fn test_env_override_owner_id() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("WORDLINK_OWNER_ID", "42");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.owner_id, 42);

        env::set_var("WORDLINK_OWNER_ID", "not-a-number");
        assert!(config.apply_env_overrides().is_err());
    }

    #[test]
    fn test_env_override_render_mode() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("WORDLINK_RENDER_MODE", "non-overlapping");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.render_mode, RenderMode::NonOverlapping);
    }

    #[test]
    fn test_env_override_log_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("WORDLINK_LOG_FILE", "/tmp/wordlink.log");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/wordlink.log")));

        // Empty string clears it
        env::set_var("WORDLINK_LOG_FILE", "");
        config.apply_env_overrides().unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            owner_id = 7
            render_mode = "non-overlapping"
            log_level = "debug"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.owner_id, 7);
        assert_eq!(config.render_mode, RenderMode::NonOverlapping);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            owner_id: 3,
            render_mode: RenderMode::NonOverlapping,
            log_file: None,
            log_level: Some("info".to_string()),
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.data_dir, config.data_dir);
        assert_eq!(loaded.owner_id, 3);
        assert_eq!(loaded.render_mode, RenderMode::NonOverlapping);
        assert!(loaded.data_dir.exists());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = TempDir::new().unwrap();
        env::set_var("WORDLINK_DATA_DIR", temp_dir.path().join("data"));

        let path = temp_dir.path().join("missing.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Should return defaults when file doesn't exist
        assert_eq!(config.owner_id, DEFAULT_OWNER_ID);
        assert!(config.data_dir.exists());
    }
}
