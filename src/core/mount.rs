//! Mount context - the accumulated trail of mounted sub-hierarchies.
//!
//! Each traversed mount point contributes one `<target>-<mountpoint>` pair;
//! pairs are joined with `,`. The empty context means no mount point was
//! crossed.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::PageId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountContext(Arc<str>);

impl MountContext {
    /// Context with no mount points crossed.
    pub fn empty() -> Self {
        Self(Arc::from(""))
    }

    /// Parameter contributed by mounting `target` at `mount_point`.
    pub fn param(target: PageId, mount_point: PageId) -> String {
        format!("{target}-{mount_point}")
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a mount parameter (or a whole context) to this one.
    pub fn with(&self, param: &str) -> Self {
        if param.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return Self(Arc::from(param));
        }
        Self(Arc::from(format!("{},{}", self.0, param)))
    }

    /// Iterate `(target, mount_point)` pairs, skipping malformed parts.
    pub fn pairs(&self) -> impl Iterator<Item = (PageId, PageId)> + '_ {
        self.0.split(',').filter_map(|part| {
            let (target, mount_point) = part.trim().split_once('-')?;
            Some((
                PageId(target.parse().ok()?),
                PageId(mount_point.parse().ok()?),
            ))
        })
    }

    /// Find the mount point through which `target` was entered.
    pub fn mount_point_for(&self, target: PageId) -> Option<PageId> {
        self.pairs()
            .find(|(t, _)| *t == target)
            .map(|(_, mount_point)| mount_point)
    }
}

impl Default for MountContext {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for MountContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MountContext {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MountContext {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MountContext {
    fn from(s: &str) -> Self {
        Self(Arc::from(s.trim()))
    }
}

impl From<String> for MountContext {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl Serialize for MountContext {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MountContext {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}
