//! Configuration loader

use std::path::Path;

use tower_pod_utils::{config_file, PodError, Result};

use super::PodConfig;

/// Overrides `[api] url`
pub const URL_ENV: &str = "TOWER_URL";

/// Overrides `[api] api_key`
pub const API_KEY_ENV: &str = "TOWER_API_KEY";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from default location
    pub fn load() -> Result<PodConfig> {
        let path = config_file();
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            Ok(PodConfig::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<PodConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| PodError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parse configuration from string
    pub fn parse(content: &str, path: &Path) -> Result<PodConfig> {
        toml::from_str(content).map_err(|e| PodError::ConfigInvalid {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply `TOWER_URL` / `TOWER_API_KEY` from the process environment
    pub fn apply_env(config: &mut PodConfig) {
        Self::apply_overrides(
            config,
            std::env::var(URL_ENV).ok(),
            std::env::var(API_KEY_ENV).ok(),
        );
    }

    fn apply_overrides(config: &mut PodConfig, url: Option<String>, api_key: Option<String>) {
        if let Some(url) = url {
            config.api.url = url;
        }
        if let Some(api_key) = api_key {
            config.api.api_key = api_key;
        }
    }

    /// Validate configuration
    pub fn validate(config: &PodConfig) -> Result<()> {
        let url = config.api.url.trim();
        if url.is_empty() {
            return Err(PodError::config("api.url must not be empty"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PodError::config(format!(
                "api.url must start with http:// or https://, got '{}'",
                url
            )));
        }

        if config.api.timeout_secs == 0 {
            return Err(PodError::config("api.timeout_secs must be at least 1"));
        }

        let ns = &config.pod;
        if ns.raw_namespace.is_empty() || ns.namespace.is_empty() {
            return Err(PodError::config("namespace names must not be empty"));
        }
        if ns.raw_namespace == ns.namespace {
            return Err(PodError::config(
                "pod.raw_namespace and pod.namespace must differ",
            ));
        }

        Ok(())
    }

    /// Load, apply environment overrides, and validate
    pub fn load_and_validate() -> Result<PodConfig> {
        let mut config = Self::load()?;
        Self::apply_env(&mut config);
        Self::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(
            &path,
            r#"
            [api]
            url = "http://localhost:8000"
            timeout_secs = 5

            [pod]
            namespace = "tower"
            "#,
        )
        .unwrap();

        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config.api.url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.auth_header_name, "X-API-Key");
        assert_eq!(config.pod.namespace, "tower");
        assert_eq!(config.pod.raw_namespace, "pod.tower.raw");
    }

    #[test]
    fn test_load_from_missing_path() {
        let dir = tempdir().unwrap();
        let result = ConfigLoader::load_from_path(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(PodError::FileRead { .. })));
    }

    #[test]
    fn test_parse_empty_is_default() {
        let config = ConfigLoader::parse("", Path::new("test.toml")).unwrap();
        assert_eq!(config, PodConfig::default());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = ConfigLoader::parse("invalid { toml", Path::new("test.toml"));
        assert!(matches!(result, Err(PodError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_overrides() {
        let mut config = PodConfig::default();
        ConfigLoader::apply_overrides(
            &mut config,
            Some("https://staging.tower.dev/".into()),
            Some("tok".into()),
        );
        assert_eq!(config.api.base_url(), "https://staging.tower.dev/v1");
        assert_eq!(config.api.api_key, "tok");

        ConfigLoader::apply_overrides(&mut config, None, None);
        assert_eq!(config.api.api_key, "tok");
    }

    #[test]
    fn test_validate_default() {
        assert!(ConfigLoader::validate(&PodConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_bad_url() {
        let mut config = PodConfig::default();
        config.api.url = "ftp://example.com".into();
        assert!(ConfigLoader::validate(&config).is_err());

        config.api.url = String::new();
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_validate_timeout() {
        let mut config = PodConfig::default();
        config.api.timeout_secs = 0;
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_validate_namespaces() {
        let mut config = PodConfig::default();
        config.pod.namespace = config.pod.raw_namespace.clone();
        assert!(ConfigLoader::validate(&config).is_err());

        config.pod.namespace = String::new();
        assert!(ConfigLoader::validate(&config).is_err());
    }
}
