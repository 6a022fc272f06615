//! Command gate: a blocklist of case-insensitive substring patterns checked
//! before any command is handed to the shell.
//!
//! Matching is deliberately coarse. A pattern matches when the lower-cased
//! command contains the lower-cased pattern anywhere, so the gate is a
//! tripwire against obvious footguns, not a shell parser. It can be bypassed
//! with quoting or aliasing and makes no promise otherwise.

use anyhow::Result;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Patterns every gate starts with: disk formatting, recursive deletion,
/// privilege escalation, world-writable permissions, filesystem creation.
pub const DEFAULT_BLOCKED_COMMANDS: &[&str] = &[
    "format",
    "mkfs",
    "mkswap",
    "dd if=",
    "rm -rf",
    "rm -fr",
    "del /f",
    "sudo",
    "su -",
    "chmod 777",
    "chmod -r 777",
];

/// Outcome of a gate mutation. Absent-on-remove and present-on-add are
/// ordinary outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateUpdate {
    Added,
    AlreadyBlocked,
    Removed,
    NotFound,
}

/// Persisted form of the pattern set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default)]
    pub blocked_commands: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            blocked_commands: DEFAULT_BLOCKED_COMMANDS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl GateConfig {
    /// Load the pattern set from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GateConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save the pattern set to a TOML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// The gate itself: shared pattern set plus an optional backing file that is
/// rewritten in full on every mutation.
#[derive(Clone, Debug)]
pub struct CommandGate {
    patterns: Arc<RwLock<BTreeSet<String>>>,
    config_file: Option<PathBuf>,
}

impl CommandGate {
    /// Create a gate with the default pattern set and no persistence.
    pub fn new() -> Self {
        Self {
            patterns: Arc::new(RwLock::new(default_patterns())),
            config_file: None,
        }
    }

    /// Create a gate backed by a config file. The file is created with the
    /// default set when absent. A load failure is reported and degrades to
    /// the in-memory defaults rather than failing the gate.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        let path_buf = path.as_ref().to_path_buf();
        let patterns = if path_buf.exists() {
            match GateConfig::load_from_file(&path_buf) {
                Ok(config) => config
                    .blocked_commands
                    .into_iter()
                    .map(|p| p.to_lowercase())
                    .collect(),
                Err(e) => {
                    eprintln!(
                        "{} failed to load blocklist from {}: {} (using defaults)",
                        "warning:".yellow(),
                        path_buf.display(),
                        e
                    );
                    default_patterns()
                }
            }
        } else {
            let patterns = default_patterns();
            if let Err(e) = write_config(&path_buf, &patterns) {
                eprintln!(
                    "{} failed to seed blocklist file {}: {}",
                    "warning:".yellow(),
                    path_buf.display(),
                    e
                );
            }
            patterns
        };

        Self {
            patterns: Arc::new(RwLock::new(patterns)),
            config_file: Some(path_buf),
        }
    }

    /// True iff the lower-cased command contains any pattern as a substring.
    /// The first match short-circuits; the matched pattern is reported on
    /// stderr for observability only.
    pub fn is_blocked(&self, command: &str) -> bool {
        let command = command.to_lowercase();
        let patterns = self.read_patterns();
        match patterns.iter().find(|p| command.contains(p.as_str())) {
            Some(pattern) => {
                eprintln!(
                    "{} command matched blocked pattern '{}'",
                    "blocked:".red(),
                    pattern
                );
                true
            }
            None => false,
        }
    }

    /// Add a pattern. Empty or whitespace-only input is an error; inserting
    /// an existing pattern is an ordinary outcome. Mutations persist.
    pub fn block(&self, pattern: &str) -> Result<GateUpdate> {
        let pattern = pattern.trim().to_lowercase();
        if pattern.is_empty() {
            anyhow::bail!("blocked pattern must not be empty");
        }

        let update = {
            let mut patterns = self.write_patterns();
            if patterns.insert(pattern) {
                GateUpdate::Added
            } else {
                GateUpdate::AlreadyBlocked
            }
        };

        if update == GateUpdate::Added {
            self.persist();
        }
        Ok(update)
    }

    /// Remove a pattern. Absence is a `NotFound` outcome, not an error.
    pub fn unblock(&self, pattern: &str) -> Result<GateUpdate> {
        let pattern = pattern.trim().to_lowercase();
        if pattern.is_empty() {
            anyhow::bail!("blocked pattern must not be empty");
        }

        let update = {
            let mut patterns = self.write_patterns();
            if patterns.remove(&pattern) {
                GateUpdate::Removed
            } else {
                GateUpdate::NotFound
            }
        };

        if update == GateUpdate::Removed {
            self.persist();
        }
        Ok(update)
    }

    /// All patterns, sorted.
    pub fn list(&self) -> Vec<String> {
        self.read_patterns().iter().cloned().collect()
    }

    /// Path of the backing config file, if any.
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Rewrite the full pattern set to the backing file. Failure is reported
    /// and absorbed; the in-memory set stays authoritative.
    fn persist(&self) {
        let Some(ref path) = self.config_file else {
            return;
        };
        let patterns = self.read_patterns();
        if let Err(e) = write_config(path, &patterns) {
            eprintln!(
                "{} failed to persist blocklist to {}: {}",
                "warning:".yellow(),
                path.display(),
                e
            );
        }
    }

    fn read_patterns(&self) -> std::sync::RwLockReadGuard<'_, BTreeSet<String>> {
        self.patterns.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_patterns(&self) -> std::sync::RwLockWriteGuard<'_, BTreeSet<String>> {
        self.patterns.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for CommandGate {
    fn default() -> Self {
        Self::new()
    }
}

fn default_patterns() -> BTreeSet<String> {
    DEFAULT_BLOCKED_COMMANDS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn write_config(path: &Path, patterns: &BTreeSet<String>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let config = GateConfig {
        blocked_commands: patterns.iter().cloned().collect(),
    };
    config.save_to_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_patterns_block() {
        let gate = CommandGate::new();
        assert!(gate.is_blocked("sudo apt install foo"));
        assert!(gate.is_blocked("rm -rf /tmp/x"));
        assert!(gate.is_blocked("mkfs.ext4 /dev/sda1"));
        assert!(!gate.is_blocked("echo hello"));
        assert!(!gate.is_blocked("ls -la"));
    }

    #[test]
    fn test_matching_is_case_insensitive_substring() {
        let gate = CommandGate::new();
        assert!(gate.is_blocked("SUDO shutdown now"));
        assert!(gate.is_blocked("echo x && Rm -Rf ."));
        // Substring, not token match.
        assert!(gate.is_blocked("xsudox"));
    }

    #[test]
    fn test_block_rejects_empty_and_whitespace() {
        let gate = CommandGate::new();
        let before = gate.list().len();
        assert!(gate.block("").is_err());
        assert!(gate.block("   ").is_err());
        assert!(gate.unblock("").is_err());
        assert_eq!(gate.list().len(), before);
    }

    #[test]
    fn test_block_is_idempotent() {
        let gate = CommandGate::new();
        assert_eq!(gate.block("shutdown").unwrap(), GateUpdate::Added);
        let count = gate.list().len();
        assert_eq!(gate.block("shutdown").unwrap(), GateUpdate::AlreadyBlocked);
        assert_eq!(gate.block("SHUTDOWN").unwrap(), GateUpdate::AlreadyBlocked);
        assert_eq!(gate.list().len(), count);
    }

    #[test]
    fn test_unblock_absent_is_not_found() {
        let gate = CommandGate::new();
        assert_eq!(gate.unblock("no-such-pattern").unwrap(), GateUpdate::NotFound);
        assert_eq!(gate.unblock("sudo").unwrap(), GateUpdate::Removed);
        assert!(!gate.is_blocked("sudo ls"));
    }

    #[test]
    fn test_list_is_sorted() {
        let gate = CommandGate::new();
        gate.block("zzz-last").unwrap();
        gate.block("aaa-first").unwrap();
        let list = gate.list();
        let mut sorted = list.clone();
        sorted.sort();
        assert_eq!(list, sorted);
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gate.toml");

        let gate = CommandGate::from_file(&path);
        assert!(path.exists(), "file seeded with defaults");
        gate.block("shutdown").unwrap();
        gate.unblock("sudo").unwrap();

        let reloaded = CommandGate::from_file(&path);
        assert!(reloaded.is_blocked("shutdown -h now"));
        assert!(!reloaded.is_blocked("sudo ls"));
        assert_eq!(reloaded.list(), gate.list());
    }

    #[test]
    fn test_corrupt_file_degrades_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gate.toml");
        std::fs::write(&path, "not [valid toml").unwrap();

        let gate = CommandGate::from_file(&path);
        assert!(gate.is_blocked("sudo ls"));
        assert_eq!(gate.list().len(), DEFAULT_BLOCKED_COMMANDS.len());
    }
}
