use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// App-level settings, next to (but separate from) the gate's blocklist
/// file: the gate rewrites its own file in full on every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Roots file operations are confined to. Empty means "the working
    /// directory".
    #[serde(default)]
    pub allowed_directories: Vec<PathBuf>,

    /// Where per-session JSONL event logs go. None disables them.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load the config file, seeding it with defaults when absent. Any
    /// read/parse/write failure is reported and degrades to defaults.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path)
                .map_err(anyhow::Error::from)
                .and_then(|content| toml::from_str(&content).map_err(anyhow::Error::from))
            {
                Ok(config) => config,
                Err(e) => {
                    eprintln!(
                        "{} failed to load config from {}: {} (using defaults)",
                        "warning:".yellow(),
                        path.display(),
                        e
                    );
                    Self::default()
                }
            }
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                eprintln!(
                    "{} failed to seed config file {}: {}",
                    "warning:".yellow(),
                    path.display(),
                    e
                );
            }
            config
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Get or create the commander configuration directory (~/.commander).
pub fn default_config_dir() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Failed to get home directory")?;

    let config_dir = PathBuf::from(home_dir).join(".commander");
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    Ok(config_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_or_init_seeds_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_or_init(&path);
        assert!(path.exists());
        assert!(config.allowed_directories.is_empty());
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn load_or_init_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = AppConfig {
            allowed_directories: vec![PathBuf::from("/srv/data")],
            log_dir: Some(PathBuf::from("/var/log/commander")),
        };
        config.save(&path).unwrap();

        let loaded = AppConfig::load_or_init(&path);
        assert_eq!(loaded.allowed_directories, config.allowed_directories);
        assert_eq!(loaded.log_dir, config.log_dir);
    }

    #[test]
    fn corrupt_file_degrades_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "allowed_directories = 7").unwrap();

        let config = AppConfig::load_or_init(&path);
        assert!(config.allowed_directories.is_empty());
    }
}
