use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use commander_gate::CommandGate;
use commander_terminal::TerminalManager;

/// Everything a tool needs, built once at startup and passed by reference.
/// No tool reaches for ambient global state.
#[derive(Clone)]
pub struct ToolContext {
    pub work_dir: PathBuf,
    /// Filesystem operations are confined to these roots.
    pub allowed_directories: Vec<PathBuf>,
    pub terminal_manager: Option<Arc<TerminalManager>>,
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("work_dir", &self.work_dir)
            .field("allowed_directories", &self.allowed_directories)
            .field("terminal_manager", &self.terminal_manager.is_some())
            .finish()
    }
}

impl ToolContext {
    /// Context rooted at `work_dir`, which is also the initial allowlist.
    pub fn new(work_dir: PathBuf) -> Self {
        let allowed_directories = vec![resolve_root(&work_dir)];
        Self {
            work_dir,
            allowed_directories,
            terminal_manager: None,
        }
    }

    pub fn with_terminal_manager(mut self, manager: Arc<TerminalManager>) -> Self {
        self.terminal_manager = Some(manager);
        self
    }

    pub fn with_allowed_directories(mut self, dirs: Vec<PathBuf>) -> Self {
        if !dirs.is_empty() {
            self.allowed_directories = dirs.iter().map(|d| resolve_root(d)).collect();
        }
        self
    }

    /// The gate shared with the terminal manager, when one is injected.
    pub fn gate(&self) -> Option<&CommandGate> {
        self.terminal_manager.as_deref().map(TerminalManager::gate)
    }

    /// Resolve a caller-supplied path against the work dir and check it
    /// against the allowlist. `..` components are resolved before the prefix
    /// check, and existing paths are canonicalized so symlinks cannot step
    /// outside an allowed root.
    pub fn validate_path(&self, path: &str) -> Result<PathBuf> {
        let joined = if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.work_dir.join(path)
        };

        let resolved = match joined.canonicalize() {
            Ok(real) => real,
            // Write targets may not exist yet; fall back to a lexical
            // resolution of the normalized parent.
            Err(_) => normalize(&joined),
        };

        if self
            .allowed_directories
            .iter()
            .any(|root| resolved.starts_with(root))
        {
            Ok(resolved)
        } else {
            anyhow::bail!(
                "Path '{}' is outside allowed directories",
                joined.display()
            )
        }
    }
}

/// Resolve an allowed root the same way candidate paths are resolved:
/// canonicalized when it exists (a symlinked root must compare equal to the
/// canonical form of the paths under it), lexically normalized otherwise.
fn resolve_root(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| normalize(path))
}

/// Lexically resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_inside_work_dir() {
        let context = ToolContext::new(PathBuf::from("/srv/data"));
        let resolved = context.validate_path("notes/todo.txt").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/data/notes/todo.txt"));
    }

    #[test]
    fn traversal_out_of_the_allowlist_is_rejected() {
        let context = ToolContext::new(PathBuf::from("/srv/data"));
        assert!(context.validate_path("../etc/passwd").is_err());
        assert!(context.validate_path("/etc/passwd").is_err());
        assert!(context.validate_path("a/../../../etc/passwd").is_err());
    }

    #[test]
    fn traversal_that_stays_inside_is_allowed() {
        let context = ToolContext::new(PathBuf::from("/srv/data"));
        let resolved = context.validate_path("a/../b.txt").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/data/b.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_allowed_root_accepts_existing_paths_under_it() {
        let dir = tempfile::TempDir::new().unwrap();
        let real = dir.path().join("real");
        std::fs::create_dir(&real).unwrap();
        std::fs::write(real.join("data.txt"), "x").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        // The root is the symlink; existing files resolve to the real path
        // and must still pass the prefix check.
        let context = ToolContext::new(link.clone());
        let resolved = context.validate_path("data.txt").unwrap();
        assert_eq!(resolved, real.canonicalize().unwrap().join("data.txt"));

        let extended = ToolContext::new(dir.path().to_path_buf())
            .with_allowed_directories(vec![link.clone()]);
        let through_link = link.join("data.txt");
        assert!(extended
            .validate_path(through_link.to_str().unwrap())
            .is_ok());
    }

    #[test]
    fn extra_allowed_directories_extend_the_allowlist() {
        let context = ToolContext::new(PathBuf::from("/srv/data"))
            .with_allowed_directories(vec![
                PathBuf::from("/srv/data"),
                PathBuf::from("/var/shared"),
            ]);
        assert!(context.validate_path("/var/shared/file.txt").is_ok());
        assert!(context.validate_path("/var/other/file.txt").is_err());
    }
}
