//! `[cache]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! disabled = false
//! expire_days = 60              # grace period for superseded paths
//! sweep_interval_hours = 6      # at most one sweep per interval
//! sweep_min_age_days = 0        # extra age past expiry before deletion
//! directory = ".cache/paths"    # persist the path cache here
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::types::{ConfigDiagnostics, FieldPath};
use crate::core::DAY;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Bypass the path cache entirely (pure encode/decode).
    pub disabled: bool,
    /// Days a superseded path keeps redirecting before it may be swept.
    pub expire_days: u32,
    /// Minimum hours between two sweeps.
    pub sweep_interval_hours: u32,
    /// Additional days past `expire_at` before a row is deleted.
    pub sweep_min_age_days: u32,
    /// Directory for the persisted cache snapshot and sweep marker.
    pub directory: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            expire_days: 60,
            sweep_interval_hours: 6,
            sweep_min_age_days: 0,
            directory: None,
        }
    }
}

impl CacheConfig {
    const FIELD_EXPIRE_DAYS: FieldPath = FieldPath::new("cache.expire_days");
    const FIELD_SWEEP_INTERVAL: FieldPath = FieldPath::new("cache.sweep_interval_hours");

    /// Sweep interval in seconds.
    #[inline]
    pub fn sweep_interval(&self) -> u64 {
        u64::from(self.sweep_interval_hours) * 3600
    }

    /// Minimum age past expiry in seconds.
    #[inline]
    pub fn sweep_min_age(&self) -> u64 {
        u64::from(self.sweep_min_age_days) * DAY
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.expire_days == 0 {
            diag.error_with_hint(
                Self::FIELD_EXPIRE_DAYS,
                "old paths would stop redirecting immediately",
                "use at least 1 day",
            );
        }
        if self.sweep_interval_hours == 0 {
            diag.warn(
                Self::FIELD_SWEEP_INTERVAL,
                "0 sweeps on every cache write",
            );
        }
    }
}
