use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use modscout_core::{EngineSettings, ResultCache, ScoutError};
use serde::Deserialize;

/// Environment variable naming a TOML configuration file.
pub const CONFIG_ENV: &str = "MODSCOUT_CONFIG";
/// Overrides `project.root`.
pub const PROJECT_ROOT_ENV: &str = "MODSCOUT_PROJECT_ROOT";
/// Overrides `cache.ttlSecs`.
pub const CACHE_TTL_ENV: &str = "MODSCOUT_CACHE_TTL_SECS";
/// Overrides `cache.maxSize`.
pub const CACHE_MAX_SIZE_ENV: &str = "MODSCOUT_CACHE_MAX_SIZE";

/// Root configuration for the modscout server.
///
/// Read from the TOML file named by `MODSCOUT_CONFIG`, then overridden by
/// the `MODSCOUT_*` environment variables. Every field has a default, so an
/// empty file (or no file at all) is a valid configuration.
///
/// # Examples
///
/// ```
/// use modscout::config::ScoutConfig;
///
/// let toml = r#"
/// [cache]
/// maxSize = 200
/// ttlSecs = 60
///
/// [process]
/// timeoutSecs = 3
/// "#;
///
/// let config = ScoutConfig::parse(toml).unwrap();
/// assert_eq!(config.cache.max_size, 200);
/// assert_eq!(config.cache.ttl_secs, 60);
/// assert!(config.cache.enabled);
/// assert_eq!(config.process.timeout_secs, 3);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub process: ProcessConfig,
    #[serde(default)]
    pub project: ProjectConfig,
}

/// Result cache shared by every ecosystem engine.
///
/// # Defaults
///
/// - `maxSize`: `1000`
/// - `ttlSecs`: `300` (5 minutes)
/// - `enabled`: `true`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            ttl_secs: default_ttl_secs(),
            enabled: true,
        }
    }
}

/// External tools (`node`, `python3`, `go`) used by the slower
/// resolution and introspection tiers.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectConfig {
    /// Defaults to the working directory of the server process.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

const fn default_true() -> bool {
    true
}

const fn default_max_size() -> usize {
    1000
}

const fn default_ttl_secs() -> u64 {
    300
}

const fn default_timeout_secs() -> u64 {
    10
}

impl ScoutConfig {
    pub fn parse(content: &str) -> modscout_core::Result<Self> {
        toml::from_str(content).map_err(|e| ScoutError::parse_error("modscout config", e))
    }

    pub fn load(path: &Path) -> modscout_core::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Configuration of the running process: the `MODSCOUT_CONFIG` file if
    /// set, then environment overrides.
    pub fn from_env() -> modscout_core::Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                tracing::info!("loading configuration from {}", path.display());
                Self::load(&path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Applies `MODSCOUT_*` overrides read through `lookup`.
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(root) = lookup(PROJECT_ROOT_ENV).filter(|v| !v.trim().is_empty()) {
            self.project.root = Some(PathBuf::from(root.trim()));
        }
        if let Some(ttl) = parse_override(&lookup, CACHE_TTL_ENV) {
            self.cache.ttl_secs = ttl;
        }
        if let Some(max_size) = parse_override(&lookup, CACHE_MAX_SIZE_ENV) {
            self.cache.max_size = max_size;
        }
    }

    /// The configured root made absolute against the working directory.
    pub fn project_root(&self) -> PathBuf {
        let root = self.project.root.clone().unwrap_or_else(|| PathBuf::from("."));
        std::path::absolute(&root).unwrap_or(root)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            project_root: self.project_root(),
            process_timeout: Duration::from_secs(self.process.timeout_secs.max(1)),
            cache_enabled: self.cache.enabled,
        }
    }

    pub fn build_cache(&self) -> Arc<ResultCache> {
        Arc::new(ResultCache::new(
            self.cache.max_size.max(1),
            Duration::from_secs(self.cache.ttl_secs.max(1)),
        ))
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("ignoring {}={:?}: not a non-negative integer", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ScoutConfig::default();
        assert_eq!(config.cache.max_size, 1000);
        assert_eq!(config.cache.ttl_secs, 300);
        assert!(config.cache.enabled);
        assert_eq!(config.process.timeout_secs, 10);
        assert!(config.project.root.is_none());
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = ScoutConfig::parse("").unwrap();
        assert_eq!(config.cache.max_size, 1000);
        assert_eq!(config.process.timeout_secs, 10);
    }

    #[test]
    fn test_full_config() {
        let config = ScoutConfig::parse(
            r#"
[cache]
maxSize = 50
ttlSecs = 30
enabled = false

[process]
timeoutSecs = 2

[project]
root = "/srv/app"
"#,
        )
        .unwrap();
        assert_eq!(config.cache.max_size, 50);
        assert_eq!(config.cache.ttl_secs, 30);
        assert!(!config.cache.enabled);
        assert_eq!(config.project_root(), PathBuf::from("/srv/app"));

        let settings = config.engine_settings();
        assert_eq!(settings.process_timeout, Duration::from_secs(2));
        assert!(!settings.cache_enabled);
    }

    #[test]
    fn test_malformed_config() {
        assert!(ScoutConfig::parse("[cache\nmaxSize = ").is_err());
        assert!(ScoutConfig::parse("[cache]\nmaxSize = \"many\"").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScoutConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ScoutError::Io(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ScoutConfig::parse("[cache]\nttlSecs = 30\n").unwrap();
        config.apply_overrides(env(&[
            (PROJECT_ROOT_ENV, "/work/project"),
            (CACHE_TTL_ENV, "90"),
            (CACHE_MAX_SIZE_ENV, "64"),
        ]));
        assert_eq!(config.project.root, Some(PathBuf::from("/work/project")));
        assert_eq!(config.cache.ttl_secs, 90);
        assert_eq!(config.cache.max_size, 64);
    }

    #[test]
    fn test_invalid_override_ignored() {
        let mut config = ScoutConfig::default();
        config.apply_overrides(env(&[(CACHE_TTL_ENV, "soon"), (CACHE_MAX_SIZE_ENV, "-3")]));
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.cache.max_size, 1000);
    }

    #[test]
    fn test_relative_project_root_is_absolute() {
        let cwd = std::env::current_dir().unwrap();

        let mut config = ScoutConfig::default();
        config.apply_overrides(env(&[(PROJECT_ROOT_ENV, "fixtures/app")]));
        let root = config.project_root();
        assert!(root.is_absolute());
        assert_eq!(root, cwd.join("fixtures/app"));

        assert_eq!(ScoutConfig::default().project_root(), cwd);
    }

    #[test]
    fn test_build_cache_uses_limits() {
        let mut config = ScoutConfig::default();
        config.cache.max_size = 7;
        config.cache.ttl_secs = 0;
        let cache = config.build_cache();
        assert_eq!(cache.stats().max_size, 7);
        assert_eq!(cache.default_ttl(), Duration::from_secs(1));
    }
}
