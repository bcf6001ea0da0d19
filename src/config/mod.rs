//! Resolver configuration for `speaking-url.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── cache      # [cache]
//! │   ├── encode     # [encode]
//! │   ├── post_vars  # [post_vars]
//! │   └── tree       # [tree]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # ConfigHandle (arc-swap)
//! └── mod.rs         # PathConfig (this file)
//! ```
//!
//! Every section is optional; an empty file yields the defaults.

pub mod section;
pub mod types;

pub use section::{
    CacheConfig, EncodeConfig, FixedPostVars, PostVarsConfig, Separator, TreeConfig,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, ConfigHandle, FieldPath};

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "speaking-url.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `speaking-url.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathConfig {
    /// Absolute path to the config file, if loaded from disk (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub encode: EncodeConfig,

    #[serde(default)]
    pub tree: TreeConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub post_vars: PostVarsConfig,
}

impl PathConfig {
    /// Load and validate configuration from a file.
    ///
    /// A relative `cache.directory` is resolved against the file's parent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_content(&content, path)?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string without validation.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse content read from `path`, warning about unknown fields.
    fn from_content(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let (mut config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        if let Some(dir) = config.cache.directory.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.cache.directory = Some(if dir.is_relative() { base.join(dir) } else { dir });
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        crate::log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Validate every section, collecting all errors at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.encode.validate(&mut diag);
        self.tree.validate(&mut diag);
        self.cache.validate(&mut diag);
        self.post_vars.validate(&mut diag);

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PathConfig {
    let (parsed, ignored) = PathConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
