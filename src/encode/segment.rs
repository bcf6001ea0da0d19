//! Title to path segment conversion.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::Regex;

use crate::config::EncodeConfig;

use super::transliterate::to_ascii;

/// Characters left alone by percent-encoding (RFC 3986 unreserved).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

static MARKUP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\-+_]+").unwrap());
static NOT_ASCII_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_\-]+").unwrap());
static NOT_UNICODE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}0-9_\-]+").unwrap());

/// Turns titles into canonical, percent-encoded path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentEncoder {
    separator: char,
    unicode_letters: bool,
}

impl Default for SegmentEncoder {
    fn default() -> Self {
        Self::new(&EncodeConfig::default())
    }
}

impl SegmentEncoder {
    pub fn new(config: &EncodeConfig) -> Self {
        Self {
            separator: config.separator.as_char(),
            unicode_letters: config.unicode_letters,
        }
    }

    /// Encode a title.
    ///
    /// Returns an empty string when nothing usable is left (e.g. `"!!!"`);
    /// callers omit empty segments.
    ///
    /// ```
    /// use speaking_url::encode::SegmentEncoder;
    ///
    /// let encoder = SegmentEncoder::default();
    /// assert_eq!(encoder.encode("Our <b>Products</b>"), "our_products");
    /// assert_eq!(encoder.encode("Über uns"), "ueber_uns");
    /// assert_eq!(encoder.encode("???"), "");
    /// ```
    pub fn encode(&self, title: &str) -> String {
        let sep = self.separator.to_string();

        let text = title.to_lowercase();
        let text = MARKUP.replace_all(&text, "");
        let text = SEPARATOR_RUN.replace_all(&text, sep.as_str());
        let text = to_ascii(&text, self.unicode_letters).to_lowercase();
        // Transliteration may introduce spaces ("北京" → "bei jing")
        let text = SEPARATOR_RUN.replace_all(&text, sep.as_str());

        let stripped = if self.unicode_letters {
            NOT_UNICODE_WORD.replace_all(&text, "")
        } else {
            NOT_ASCII_WORD.replace_all(&text, "")
        };

        let collapsed = collapse(&stripped, self.separator);
        let trimmed = collapsed.trim_matches(self.separator);
        utf8_percent_encode(trimmed, SEGMENT).to_string()
    }

    /// Canonical form of a segment taken from a request.
    ///
    /// Decodes percent-escapes, lowercases and re-encodes, so `%C3%84`, `Ä`
    /// and `ä` all compare equal to an encoded title.
    pub fn normalize(&self, segment: &str) -> String {
        let decoded = percent_decode_str(segment).decode_utf8_lossy();
        utf8_percent_encode(&decoded.to_lowercase(), SEGMENT).to_string()
    }

    /// Run a request segment through [`encode`](Self::encode) so it can be
    /// compared with encoded titles of candidate pages.
    pub fn encode_request_segment(&self, segment: &str) -> String {
        self.encode(&percent_decode_str(segment).decode_utf8_lossy())
    }
}

/// Collapse runs of `separator` into one.
fn collapse(text: &str, separator: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if c == separator && previous == Some(separator) {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Separator;

    fn encoder(separator: Separator, unicode_letters: bool) -> SegmentEncoder {
        SegmentEncoder::new(&EncodeConfig {
            separator,
            unicode_letters,
            ..EncodeConfig::default()
        })
    }

    #[test]
    fn test_encode_basic() {
        let enc = SegmentEncoder::default();
        assert_eq!(enc.encode("Products"), "products");
        assert_eq!(enc.encode("Our Products"), "our_products");
        assert_eq!(enc.encode("  Spaced   Out  "), "spaced_out");
    }

    #[test]
    fn test_encode_collapses_separators() {
        let enc = SegmentEncoder::default();
        assert_eq!(enc.encode("a - b + c__d"), "a_b_c_d");
        assert_eq!(enc.encode("Rock & Roll"), "rock_roll");
        assert_eq!(enc.encode("-leading and trailing-"), "leading_and_trailing");
    }

    #[test]
    fn test_encode_strips_markup() {
        let enc = SegmentEncoder::default();
        assert_eq!(enc.encode("<em>New</em> arrivals"), "new_arrivals");
    }

    #[test]
    fn test_encode_dash_separator() {
        let enc = encoder(Separator::Dash, false);
        assert_eq!(enc.encode("Our_Products now"), "our-products-now");
    }

    #[test]
    fn test_encode_transliterates() {
        let enc = SegmentEncoder::default();
        assert_eq!(enc.encode("Straße"), "strasse");
        assert_eq!(enc.encode("Crème Brûlée"), "creme_brulee");
    }

    #[test]
    fn test_encode_all_symbols_is_empty() {
        let enc = SegmentEncoder::default();
        assert_eq!(enc.encode("!!!"), "");
        assert_eq!(enc.encode(""), "");
        assert_eq!(enc.encode("<br/>"), "");
    }

    #[test]
    fn test_encode_unicode_letters() {
        let enc = encoder(Separator::Underscore, true);
        assert_eq!(enc.encode("Привет мир"), "%D0%BF%D1%80%D0%B8%D0%B2%D0%B5%D1%82_%D0%BC%D0%B8%D1%80");
        assert_eq!(enc.encode("Café"), "cafe");
    }

    #[test]
    fn test_normalize() {
        let enc = SegmentEncoder::default();
        assert_eq!(enc.normalize("Products"), "products");
        assert_eq!(enc.normalize("%D0%9F"), "%D0%BF");
        assert_eq!(enc.normalize("п"), "%D0%BF");
        assert_eq!(enc.normalize("our_products"), "our_products");
    }

    #[test]
    fn test_encode_request_segment() {
        let enc = SegmentEncoder::default();
        assert_eq!(enc.encode_request_segment("Our-Products"), "our_products");
        assert_eq!(enc.encode_request_segment("%C3%9Cber"), "ueber");
        assert_eq!(enc.encode_request_segment("typo3"), "typo3");
    }
}
