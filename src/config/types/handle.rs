//! Swappable config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement, so a
//! long-running resolver picks up edits to `speaking-url.toml` without
//! blocking requests that already hold the previous snapshot.

use crate::config::{ConfigError, PathConfig};
use crate::utils::hash;
use arc_swap::ArcSwap;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared handle to the active configuration.
#[derive(Debug)]
pub struct ConfigHandle {
    current: ArcSwap<PathConfig>,
    /// Hash of the file content the current config was loaded from.
    content_hash: AtomicU64,
}

impl ConfigHandle {
    pub fn new(config: PathConfig) -> Self {
        let content_hash = config
            .config_path
            .as_deref()
            .and_then(|path| fs::read_to_string(path).ok())
            .map_or(0, |content| hash::compute(content.as_bytes()));
        Self {
            current: ArcSwap::from_pointee(config),
            content_hash: AtomicU64::new(content_hash),
        }
    }

    #[inline]
    pub fn load(&self) -> Arc<PathConfig> {
        self.current.load_full()
    }

    /// Replace the configuration unconditionally.
    pub fn store(&self, config: PathConfig) {
        self.current.store(Arc::new(config));
    }

    /// Reload from disk if the file content changed.
    ///
    /// Returns `Ok(true)` if config was updated, `Ok(false)` if unchanged or
    /// the config was not loaded from a file.
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let current = self.load();
        let Some(path) = current.config_path.as_deref() else {
            return Ok(false);
        };

        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let new_hash = hash::compute(content.as_bytes());
        if new_hash == self.content_hash.load(Ordering::Relaxed) {
            return Ok(false);
        }

        let mut config = PathConfig::from_content(&content, path)?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        self.current.store(Arc::new(config));
        self.content_hash.store(new_hash, Ordering::Relaxed);
        crate::log!("config"; "reloaded {}", path.display());
        Ok(true)
    }
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(PathConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reload_without_file_is_noop() {
        let handle = ConfigHandle::default();
        assert!(!handle.reload().unwrap());
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\nexpire_days = 10").unwrap();

        let config = PathConfig::load(file.path()).unwrap();
        let handle = ConfigHandle::new(config);
        assert_eq!(handle.load().cache.expire_days, 10);
        assert!(!handle.reload().unwrap());

        fs::write(file.path(), "[cache]\nexpire_days = 20\n").unwrap();
        assert!(handle.reload().unwrap());
        assert_eq!(handle.load().cache.expire_days, 20);
    }

    #[test]
    fn test_reload_keeps_old_config_on_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cache]\nexpire_days = 10").unwrap();
        let handle = ConfigHandle::new(PathConfig::load(file.path()).unwrap());

        fs::write(file.path(), "[cache]\nexpire_days = 0\n").unwrap();
        assert!(handle.reload().is_err());
        assert_eq!(handle.load().cache.expire_days, 10);
    }
}
