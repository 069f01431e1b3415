use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Smallest list height a modal will be built with.
const MIN_LIST_ROWS: usize = 1;
/// Narrowest column a modal will lay rows out in.
const MIN_COLUMN_WIDTH: usize = 20;

/// Status of config file loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLoadStatus {
    /// Config loaded successfully from existing file
    Loaded,
    /// Created default config file (first run)
    Created,
    /// Error occurred during loading, using defaults.
    Error(String),
}

/// Layout of modal lists and fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Visible rows in modal lists (repositories, issues).
    pub list_rows: usize,
    /// Column width used to truncate list rows and scroll text fields.
    pub column_width: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            list_rows: 10,
            column_width: 60,
        }
    }
}

/// Defaults offered when creating sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Repositories offered in the new-session list.
    pub repos: Vec<String>,
    /// Pin every new session to this repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_repo: Option<String>,
    pub default_base: String,
    /// Whether sessions may run inside a container.
    pub containers_enabled: bool,
    /// JSON file with the issues offered by the issue picker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues_file: Option<String>,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            locked_repo: None,
            default_base: "main".to_string(),
            containers_enabled: false,
            issues_file: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Clamp values the modals cannot work with.
    pub fn normalize(&mut self) {
        if self.ui.list_rows < MIN_LIST_ROWS {
            warn!(list_rows = self.ui.list_rows, "ui.list_rows too small, using 1");
            self.ui.list_rows = MIN_LIST_ROWS;
        }
        if self.ui.column_width < MIN_COLUMN_WIDTH {
            warn!(
                column_width = self.ui.column_width,
                "ui.column_width too small, using {MIN_COLUMN_WIDTH}"
            );
            self.ui.column_width = MIN_COLUMN_WIDTH;
        }
        if self.sessions.default_base.trim().is_empty() {
            self.sessions.default_base = SessionsConfig::default().default_base;
        }
        if self
            .sessions
            .locked_repo
            .as_deref()
            .is_some_and(|repo| repo.trim().is_empty())
        {
            self.sessions.locked_repo = None;
        }
    }

    /// Expand `~` to home directory in a path string
    pub fn expand_tilde(path: &str) -> PathBuf {
        if let Some(stripped) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(stripped);
        }
        PathBuf::from(path)
    }

    /// Get the expanded issues file path, if one is configured
    pub fn issues_path(&self) -> Option<PathBuf> {
        self.sessions
            .issues_file
            .as_deref()
            .map(Self::expand_tilde)
    }
}

/// Loaded configuration with metadata
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_path: PathBuf,
    pub status: ConfigLoadStatus,
}

/// Get the platform-appropriate config directory
fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("dev", "arbor", "arbor").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the full path to the config file
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load configuration from file, environment, and defaults.
///
/// `explicit_path` replaces the platform config location (`--config`).
pub fn load_config(explicit_path: Option<&Path>) -> LoadedConfig {
    let config_path = match explicit_path.map(Path::to_path_buf).or_else(get_config_path) {
        Some(path) => path,
        None => {
            warn!("Could not determine config directory, using defaults");
            return LoadedConfig {
                config: apply_env_overrides(Config::default()),
                config_path: PathBuf::from("config.toml"),
                status: ConfigLoadStatus::Error("Could not determine config directory".to_string()),
            };
        }
    };

    debug!(path = %config_path.display(), "config_path");

    let (config, status) = load_or_create_config(&config_path);
    let config = apply_env_overrides(config);

    LoadedConfig {
        config,
        config_path,
        status,
    }
}

/// Load config from file, or create default if not exists
fn load_or_create_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    match fs::read_to_string(config_path) {
        Ok(contents) => match toml::from_str::<Config>(&contents) {
            Ok(mut config) => {
                config.normalize();
                info!(path = %config_path.display(), "config_loaded");
                (config, ConfigLoadStatus::Loaded)
            }
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "config_malformed");
                (
                    Config::default(),
                    ConfigLoadStatus::Error(format!("Malformed TOML: {}", e)),
                )
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => create_default_config(config_path),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            warn!(path = %config_path.display(), "config_permission_denied");
            (
                Config::default(),
                ConfigLoadStatus::Error("Permission denied reading config".to_string()),
            )
        }
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "config_read_failed");
            (
                Config::default(),
                ConfigLoadStatus::Error(format!("Read error: {}", e)),
            )
        }
    }
}

/// Create the default config file
fn create_default_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    let config = Config::default();

    if let Some(parent) = config_path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!(path = %parent.display(), error = %e, "config_dir_create_failed");
        return (
            config,
            ConfigLoadStatus::Error(format!("Could not create config directory: {}", e)),
        );
    }

    let toml_content = match toml::to_string_pretty(&config) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "config_serialize_failed");
            return (
                config,
                ConfigLoadStatus::Error(format!("Serialization error: {}", e)),
            );
        }
    };

    match fs::write(config_path, &toml_content) {
        Ok(()) => {
            info!(path = %config_path.display(), "config_created");
            (config, ConfigLoadStatus::Created)
        }
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "config_write_failed");
            (
                config,
                ConfigLoadStatus::Error(format!("Write error: {}", e)),
            )
        }
    }
}

/// Apply environment variable overrides to config
fn apply_env_overrides(config: Config) -> Config {
    apply_overrides_from(config, |key| env::var(key).ok())
}

fn apply_overrides_from(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(repo) = lookup("ARBOR_LOCKED_REPO").filter(|r| !r.trim().is_empty()) {
        debug!("Overriding sessions.locked_repo from ARBOR_LOCKED_REPO");
        config.sessions.locked_repo = Some(repo);
    }

    if let Some(path) = lookup("ARBOR_ISSUES_FILE") {
        debug!("Overriding sessions.issues_file from ARBOR_ISSUES_FILE");
        config.sessions.issues_file = Some(path);
    }

    if let Some(level) = lookup("ARBOR_LOG") {
        debug!("Overriding logging.level from ARBOR_LOG");
        config.logging.level = level;
    }

    config
}
