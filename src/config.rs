//! Configuration for the catalog.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CATALOG_HOME, CATALOG_SNAPSHOT, CATALOG_DATABASE, CATALOG_BACKEND)
//! 2. Config file (.catalog/config.yaml)
//! 3. Defaults (~/.catalog)
//!
//! Config file discovery:
//! - Searches current directory and parents for .catalog/config.yaml
//! - Paths in the `paths` section are relative to the .catalog/ directory

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::KNOWN_FORMATS;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

const DEFAULT_TIMEFRAME_DAYS: u32 = 30;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub store: Option<StoreConfig>,
    #[serde(default)]
    pub metrics: Option<MetricsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Catalog home directory
    pub home: Option<String>,
    /// JSON snapshot file
    pub snapshot: Option<String>,
    /// SQLite database file
    pub database: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub formats: Option<Vec<String>>,
    pub timeframe_days: Option<u32>,
}

/// Which store adapter serves lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// In-memory store loaded from the JSON snapshot
    #[default]
    Json,

    /// SQLite database
    Sqlite,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Json => write!(f, "json"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" | "memory" | "snapshot" => Ok(StoreBackend::Json),
            "sqlite" | "db" => Ok(StoreBackend::Sqlite),
            _ => anyhow::bail!("Unknown store backend: {}", s),
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Catalog home directory
    pub home: PathBuf,
    /// JSON snapshot file
    pub snapshot: PathBuf,
    /// SQLite database file
    pub database: PathBuf,
    /// Store adapter to use
    pub backend: StoreBackend,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Metrics settings
    pub metrics: MetricsSettings,
}

#[derive(Debug, Clone)]
pub struct MetricsSettings {
    /// Formats reported in the histogram
    pub formats: Vec<String>,
    /// Default time graph window in days
    pub timeframe_days: u32,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            formats: KNOWN_FORMATS.iter().map(|f| f.to_string()).collect(),
            timeframe_days: DEFAULT_TIMEFRAME_DAYS,
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".catalog").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge a parsed config file (if any) with environment overrides
fn resolve(
    config: Option<(&Path, ConfigFile)>,
    env: impl Fn(&str) -> Option<String>,
    default_home: PathBuf,
) -> Result<ResolvedConfig> {
    let (config_dir, file) = match config {
        Some((path, file)) => (path.parent().map(Path::to_path_buf), Some(file)),
        None => (None, None),
    };
    let paths = file.as_ref().map(|f| f.paths.clone()).unwrap_or_default();
    let relative = |value: &str| match &config_dir {
        Some(dir) => resolve_path(dir, value),
        None => PathBuf::from(value),
    };

    let home = env("CATALOG_HOME")
        .map(PathBuf::from)
        .or_else(|| paths.home.as_deref().map(&relative))
        .unwrap_or(default_home);

    let snapshot = env("CATALOG_SNAPSHOT")
        .map(PathBuf::from)
        .or_else(|| paths.snapshot.as_deref().map(&relative))
        .unwrap_or_else(|| home.join("catalog.json"));

    let database = env("CATALOG_DATABASE")
        .map(PathBuf::from)
        .or_else(|| paths.database.as_deref().map(&relative))
        .unwrap_or_else(|| home.join("catalog.db"));

    let backend = match env("CATALOG_BACKEND").or_else(|| {
        file.as_ref()
            .and_then(|f| f.store.as_ref())
            .and_then(|s| s.backend.clone())
    }) {
        Some(raw) => raw.parse()?,
        None => StoreBackend::default(),
    };

    let defaults = MetricsSettings::default();
    let metrics = file.as_ref().and_then(|f| f.metrics.as_ref());
    let metrics = MetricsSettings {
        formats: metrics
            .and_then(|m| m.formats.clone())
            .unwrap_or(defaults.formats),
        timeframe_days: metrics
            .and_then(|m| m.timeframe_days)
            .unwrap_or(defaults.timeframe_days),
    };

    Ok(ResolvedConfig {
        home,
        snapshot,
        database,
        backend,
        config_file: None,
        metrics,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".catalog");

    let config_file = find_config_file();
    let parsed = match &config_file {
        Some(path) => Some((path.as_path(), load_config_file(path)?)),
        None => None,
    };

    let mut resolved = resolve(parsed, |key| std::env::var(key).ok(), default_home)?;
    resolved.config_file = config_file;
    Ok(resolved)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, no_env, PathBuf::from("/home/test/.catalog")).unwrap();

        assert_eq!(config.home, PathBuf::from("/home/test/.catalog"));
        assert_eq!(config.snapshot, PathBuf::from("/home/test/.catalog/catalog.json"));
        assert_eq!(config.database, PathBuf::from("/home/test/.catalog/catalog.db"));
        assert_eq!(config.backend, StoreBackend::Json);
        assert_eq!(config.metrics.formats, vec!["Code", "Document", "Powerpoint"]);
        assert_eq!(config.metrics.timeframe_days, 30);
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let catalog_dir = temp.path().join(".catalog");
        std::fs::create_dir_all(&catalog_dir).unwrap();

        let config_path = catalog_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  home: ./
  database: data/catalog.db
store:
  backend: sqlite
metrics:
  formats: [Code, Video]
  timeframe_days: 7
"#
        )
        .unwrap();

        let parsed = load_config_file(&config_path).unwrap();
        assert_eq!(parsed.version, "1.0");
        assert_eq!(parsed.paths.database, Some("data/catalog.db".to_string()));

        let config = resolve(Some((config_path.as_path(), parsed)), no_env, PathBuf::from("/unused"))
            .unwrap();
        assert_eq!(config.backend, StoreBackend::Sqlite);
        assert_eq!(config.database, catalog_dir.join("data/catalog.db"));
        assert_eq!(config.metrics.formats, vec!["Code", "Video"]);
        assert_eq!(config.metrics.timeframe_days, 7);
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("CATALOG_HOME", "/srv/catalog"),
            ("CATALOG_BACKEND", "sqlite"),
        ]
        .into_iter()
        .collect();

        let config = resolve(
            None,
            |key| env.get(key).map(|v| v.to_string()),
            PathBuf::from("/unused"),
        )
        .unwrap();

        assert_eq!(config.home, PathBuf::from("/srv/catalog"));
        assert_eq!(config.database, PathBuf::from("/srv/catalog/catalog.db"));
        assert_eq!(config.backend, StoreBackend::Sqlite);
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let result = resolve(
            None,
            |key| (key == "CATALOG_BACKEND").then(|| "mongo".to_string()),
            PathBuf::from("/unused"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
