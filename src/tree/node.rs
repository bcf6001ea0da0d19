//! Page records as seen by the resolver.

use rustc_hash::FxHashMap;

use crate::core::PageId;

use super::TitleField;

/// Where a shortcut page points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// A fixed target page.
    Page(PageId),
    /// The first child of the shortcut page.
    FirstChild,
    /// The parent of the shortcut page.
    Parent,
}

/// A page that mounts another subtree at its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountPoint {
    /// Root of the mounted subtree.
    pub target: PageId,
    /// The mounted page replaces the mount point instead of appearing below it.
    pub overlay: bool,
}

/// Page type, carrying the data that only some types need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocType {
    #[default]
    Standard,
    Shortcut(Shortcut),
    Mount(MountPoint),
    Folder,
    /// Trash container; never part of a path.
    Recycler,
}

/// One page of the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageNode {
    pub id: PageId,
    pub parent: Option<PageId>,
    pub doc_type: DocType,
    /// Starts an inner site (sub-domain boundary).
    pub is_site_root: bool,
    /// Domain record attached to this page, if any.
    pub domain: Option<String>,
    /// Traversed but never emitted as a segment.
    pub exclude_from_path: bool,
    /// `PathSegment` holds a whole path below the root.
    pub path_override: bool,
    pub titles: FxHashMap<TitleField, String>,
}

impl PageNode {
    pub fn new(id: impl Into<PageId>, parent: Option<PageId>, title: &str) -> Self {
        let mut titles = FxHashMap::default();
        titles.insert(TitleField::Title, title.to_owned());
        Self {
            id: id.into(),
            parent,
            titles,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, field: TitleField, value: &str) -> Self {
        self.titles.insert(field, value.to_owned());
        self
    }

    pub fn with_doc_type(mut self, doc_type: DocType) -> Self {
        self.doc_type = doc_type;
        self
    }

    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_owned());
        self
    }

    pub fn site_root(mut self) -> Self {
        self.is_site_root = true;
        self
    }

    pub fn excluded(mut self) -> Self {
        self.exclude_from_path = true;
        self
    }

    /// Set a whole-path override.
    pub fn with_override(mut self, path: &str) -> Self {
        self.path_override = true;
        self.with_title(TitleField::PathSegment, path)
    }

    /// Field value, treating empty strings as missing.
    pub fn title(&self, field: TitleField) -> Option<&str> {
        self.titles
            .get(&field)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// First non-empty field in priority order.
    pub fn first_title(&self, fields: &[TitleField]) -> Option<&str> {
        fields.iter().find_map(|field| self.title(*field))
    }

    /// Override path when the flag is set and a non-empty segment exists.
    pub fn override_path(&self) -> Option<&str> {
        if !self.path_override {
            return None;
        }
        self.title(TitleField::PathSegment)
            .map(|segment| segment.trim_matches('/'))
            .filter(|segment| !segment.is_empty())
    }

    pub fn alias(&self) -> Option<&str> {
        self.title(TitleField::Alias)
    }

    pub const fn shortcut(&self) -> Option<Shortcut> {
        match self.doc_type {
            DocType::Shortcut(shortcut) => Some(shortcut),
            _ => None,
        }
    }

    pub const fn mount(&self) -> Option<MountPoint> {
        match self.doc_type {
            DocType::Mount(mount) => Some(mount),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_recycler(&self) -> bool {
        matches!(self.doc_type, DocType::Recycler)
    }
}
