// File: ./src/config.rs
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Points every on-disk location at one directory (used by the test suite).
pub const TEST_DIR_ENV: &str = "LOSTFOUND_TEST_DIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub url: String,
    pub username: String,
    pub password: String,
    pub data_dir: Option<PathBuf>,
    pub search_debounce_ms: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            url: String::new(),
            username: String::new(),
            password: String::new(),
            data_dir: None,
            search_debounce_ms: 300,
            log_level: "info".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "lostfound", "lostfound")
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(test_dir) = env::var(TEST_DIR_ENV) {
            return Some(PathBuf::from(test_dir).join("config.toml"));
        }
        project_dirs().map(|proj| proj.config_dir().join("config.toml"))
    }

    /// Reads the config file; a missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Self::from_toml(&content).with_context(|| format!("parsing {}", path.display()))
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.backend == Backend::Remote && self.url.trim().is_empty() {
            anyhow::bail!("backend = \"remote\" requires a url");
        }
        Ok(())
    }

    /// Directory holding the item file and the log. Created on demand.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let dir = if let Ok(test_dir) = env::var(TEST_DIR_ENV) {
            PathBuf::from(test_dir)
        } else if let Some(dir) = &self.data_dir {
            dir.clone()
        } else {
            project_dirs()
                .map(|proj| proj.data_dir().to_path_buf())
                .context("no data directory available")?
        };
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.search_debounce_ms, 300);
    }

    #[test]
    fn reads_remote_settings() {
        let config = Config::from_toml(
            r#"
            backend = "remote"
            url = "https://lostfound.example.org"
            username = "desk"
            password = "secret"
            search_debounce_ms = 150
            "#,
        )
        .unwrap();
        assert_eq!(config.backend, Backend::Remote);
        assert_eq!(config.url, "https://lostfound.example.org");
        assert_eq!(config.search_debounce_ms, 150);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn explicit_data_dir_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let wanted = tmp.path().join("board");
        let config = Config {
            data_dir: Some(wanted.clone()),
            ..Config::default()
        };
        if env::var(TEST_DIR_ENV).is_err() {
            assert_eq!(config.data_dir().unwrap(), wanted);
            assert!(wanted.is_dir());
        }
    }

    #[test]
    fn remote_without_url_is_rejected() {
        assert!(Config::from_toml("backend = \"remote\"").is_err());
        assert!(Config::from_toml("backend = \"carrier-pigeon\"").is_err());
    }
}
