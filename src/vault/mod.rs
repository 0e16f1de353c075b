mod files;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum VaultError {
    /// No notes directory has been chosen yet (first run, or the user
    /// dismissed the folder prompt).
    #[error("no notes directory configured")]
    NotConfigured,
    /// A directory is configured but cannot be resolved to a usable path.
    #[error("notes directory could not be resolved: {0}")]
    Unresolved(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

pub type VaultResult<T> = Result<T, VaultError>;

/// The resolved notes directory. File operations live in `files.rs`; every
/// one of them acquires its own [`DirScope`] and releases it on return.
#[derive(Debug, Clone)]
pub struct Vault {
    dir: PathBuf,
}

impl Vault {
    /// Resolve the configured notes directory. If the stored path has gone
    /// stale (no longer canonicalizes to itself, e.g. a remounted volume),
    /// the fresh canonical path is written back to the config.
    pub fn resolve(config: &mut Config) -> VaultResult<Self> {
        let stored = config.notes_dir().ok_or(VaultError::NotConfigured)?;
        if !stored.is_dir() {
            return Err(VaultError::Unresolved(stored.display().to_string()));
        }
        let canonical = stored
            .canonicalize()
            .map_err(|_| VaultError::Unresolved(stored.display().to_string()))?;
        if canonical != stored {
            tracing::info!(
                "notes directory moved: {} -> {}",
                stored.display(),
                canonical.display()
            );
            config.set_notes_dir(&canonical);
            if let Err(e) = config.save() {
                tracing::warn!("could not persist refreshed notes directory: {}", e);
            }
        }
        Ok(Self { dir: canonical })
    }

    /// Open a directory chosen just now (folder prompt or CLI argument).
    /// Persisting the choice is the caller's job.
    pub fn open(dir: &Path) -> VaultResult<Self> {
        if !dir.is_dir() {
            return Err(VaultError::Unresolved(dir.display().to_string()));
        }
        Ok(Self {
            dir: dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Acquire access to the directory for one file operation.
    fn scope(&self) -> VaultResult<DirScope<'_>> {
        DirScope::acquire(&self.dir)
    }
}

/// Scoped directory access: acquisition verifies the directory is still
/// there and readable, release happens on drop on every exit path. Scopes
/// are per-operation and nest; nothing holds one across the process
/// lifetime.
#[derive(Debug)]
pub struct DirScope<'a> {
    dir: &'a Path,
}

impl<'a> DirScope<'a> {
    fn acquire(dir: &'a Path) -> VaultResult<Self> {
        let meta = fs::metadata(dir)?;
        if !meta.is_dir() {
            return Err(VaultError::Unresolved(dir.display().to_string()));
        }
        // Readability probe; permissions can change between operations.
        fs::read_dir(dir)?;
        tracing::trace!("scope acquired: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        self.dir
    }

    /// Path of a note file inside the scoped directory.
    pub fn note_path(&self, filename: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", filename))
    }
}

impl Drop for DirScope<'_> {
    fn drop(&mut self) {
        tracing::trace!("scope released: {}", self.dir.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_unconfigured() {
        let mut config = Config::default();
        assert!(matches!(
            Vault::resolve(&mut config),
            Err(VaultError::NotConfigured)
        ));
    }

    #[test]
    fn test_resolve_missing_dir() {
        let mut config = Config {
            notes_dir: Some("/nonexistent/flatnote-test".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            Vault::resolve(&mut config),
            Err(VaultError::Unresolved(_))
        ));
    }

    #[test]
    fn test_open_existing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = Vault::open(tmp.path()).unwrap();
        assert!(vault.dir().is_dir());
    }

    #[test]
    fn test_scope_fails_after_dir_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let vault = Vault::open(tmp.path()).unwrap();
        drop(tmp);
        assert!(vault.scope().is_err());
    }
}
