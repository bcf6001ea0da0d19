//! `[encode]` section configuration.
//!
//! Controls how titles become path segments.
//!
//! # Example
//!
//! ```toml
//! [encode]
//! separator = "dash"                          # "underscore" (default) or "dash"
//! unicode_letters = false                     # keep non-Latin letters (slow)
//! title_fields = ["path_segment", "nav_title", "title"]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::types::{ConfigDiagnostics, FieldPath};
use crate::tree::TitleField;

/// Separator character for segments.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    /// Underscore separator (`_`) (default).
    #[default]
    Underscore,
    /// Dash separator (`-`).
    Dash,
}

impl Separator {
    /// Get the character representation.
    pub const fn as_char(&self) -> char {
        match self {
            Self::Underscore => '_',
            Self::Dash => '-',
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EncodeConfig {
    /// Character replacing runs of spaces, dashes, pluses and underscores.
    pub separator: Separator,
    /// Keep all Unicode letters instead of reducing to ASCII.
    pub unicode_letters: bool,
    /// Title-like fields in priority order; the first non-empty one wins.
    pub title_fields: Vec<TitleField>,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            separator: Separator::Underscore,
            unicode_letters: false,
            title_fields: TitleField::DEFAULT_PRIORITY.to_vec(),
        }
    }
}

impl EncodeConfig {
    const FIELD_TITLE_FIELDS: FieldPath = FieldPath::new("encode.title_fields");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title_fields.is_empty() {
            diag.error_with_hint(
                Self::FIELD_TITLE_FIELDS,
                "at least one title field is required",
                "use [\"nav_title\", \"title\"] for plain page titles",
            );
        }
        let mut seen = Vec::with_capacity(self.title_fields.len());
        for field in &self.title_fields {
            if seen.contains(field) {
                diag.error(
                    Self::FIELD_TITLE_FIELDS,
                    format!("`{}` is listed more than once", field.as_str()),
                );
            }
            seen.push(*field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.encode.separator, Separator::Underscore);
        assert!(!config.encode.unicode_letters);
        assert_eq!(
            config.encode.title_fields,
            vec![
                TitleField::PathSegment,
                TitleField::Alias,
                TitleField::NavTitle,
                TitleField::Title
            ]
        );
    }

    #[test]
    fn test_separator_parsing() {
        let config = test_parse_config("[encode]\nseparator = \"dash\"");
        assert_eq!(config.encode.separator, Separator::Dash);
        assert_eq!(config.encode.separator.as_char(), '-');

        let config = test_parse_config("[encode]\nseparator = \"underscore\"");
        assert_eq!(config.encode.separator.as_char(), '_');
    }

    #[test]
    fn test_title_fields_parsing() {
        let config = test_parse_config("[encode]\ntitle_fields = [\"subtitle\", \"title\"]");
        assert_eq!(
            config.encode.title_fields,
            vec![TitleField::Subtitle, TitleField::Title]
        );
    }

    #[test]
    fn test_validate_rejects_empty_and_duplicate_fields() {
        let mut diag = ConfigDiagnostics::new();
        let config = EncodeConfig {
            title_fields: vec![],
            ..EncodeConfig::default()
        };
        config.validate(&mut diag);
        assert_eq!(diag.len(), 1);

        let mut diag = ConfigDiagnostics::new();
        let config = EncodeConfig {
            title_fields: vec![TitleField::Title, TitleField::Title],
            ..EncodeConfig::default()
        };
        config.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
