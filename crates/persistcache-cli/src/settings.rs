//! Runtime settings for the command-line tool.
//!
//! The cache file is chosen, in order, from `--file`, the
//! `PERSISTCACHE_FILE` environment variable (a `.env` file is honored), and
//! finally `<platform cache dir>/persistcache/cache.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use persistcache_core::{default_cache_path, CacheConfig, DEFAULT_AUTOSAVE_INTERVAL};

/// Application name used for the default cache directory
const APP_NAME: &str = "persistcache";

const FILE_ENV: &str = "PERSISTCACHE_FILE";
const AUTOSAVE_ENV: &str = "PERSISTCACHE_AUTOSAVE_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub cache_file: PathBuf,
    pub autosave_interval: Duration,
}

impl Settings {
    pub fn resolve(file_override: Option<PathBuf>) -> Result<Self> {
        Self::from_sources(
            file_override,
            std::env::var(FILE_ENV).ok(),
            std::env::var(AUTOSAVE_ENV).ok(),
        )
    }

    fn from_sources(
        file_override: Option<PathBuf>,
        file_env: Option<String>,
        autosave_env: Option<String>,
    ) -> Result<Self> {
        let cache_file = file_override
            .or_else(|| file_env.filter(|s| !s.is_empty()).map(PathBuf::from))
            .or_else(|| default_cache_path(APP_NAME))
            .unwrap_or_else(|| PathBuf::from("./cache.json"));

        let autosave_interval = match autosave_env {
            Some(secs) => {
                let secs: u64 = secs
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid {}: {}", AUTOSAVE_ENV, secs))?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_AUTOSAVE_INTERVAL,
        };

        Ok(Self {
            cache_file,
            autosave_interval,
        })
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(self.cache_file.clone()).with_autosave_interval(self.autosave_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let settings = Settings::from_sources(
            Some(PathBuf::from("/a.json")),
            Some("/b.json".to_string()),
            None,
        )
        .unwrap();
        assert_eq!(settings.cache_file, PathBuf::from("/a.json"));
        assert_eq!(settings.autosave_interval, DEFAULT_AUTOSAVE_INTERVAL);
    }

    #[test]
    fn test_env_file_and_interval() {
        let settings =
            Settings::from_sources(None, Some("/b.json".to_string()), Some(" 3 ".to_string()))
                .unwrap();
        assert_eq!(settings.cache_file, PathBuf::from("/b.json"));
        assert_eq!(settings.autosave_interval, Duration::from_secs(3));

        let config = settings.cache_config();
        assert!(config.is_enabled());
        assert_eq!(config.autosave_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_empty_env_falls_back_to_default() {
        let settings = Settings::from_sources(None, Some(String::new()), None).unwrap();
        assert!(settings.cache_file.ends_with("cache.json"));
    }

    #[test]
    fn test_invalid_interval() {
        assert!(Settings::from_sources(None, None, Some("soon".to_string())).is_err());
    }
}
