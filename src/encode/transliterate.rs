//! Letter transliteration to ASCII.
//!
//! German and Nordic letters get their conventional two-letter spellings
//! (`ä` → `ae`); everything else goes through `deunicode`.

use deunicode::deunicode_char;

/// Two-letter replacements that `deunicode` would flatten to one letter.
fn special_letter(c: char) -> Option<&'static str> {
    Some(match c {
        'ä' => "ae",
        'ö' => "oe",
        'ü' => "ue",
        'ß' => "ss",
        'æ' => "ae",
        'œ' => "oe",
        'ø' => "oe",
        'å' => "aa",
        'þ' => "th",
        _ => return None,
    })
}

/// Latin-1 Supplement through Latin Extended-B.
#[inline]
fn is_extended_latin(c: char) -> bool {
    ('\u{00C0}'..='\u{024F}').contains(&c)
}

/// Transliterate to ASCII.
///
/// With `latin_only`, characters outside the Latin blocks are kept as they
/// are so the permissive mode can preserve Cyrillic, CJK and other scripts.
pub fn to_ascii(text: &str, latin_only: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if let Some(replacement) = special_letter(c) {
            out.push_str(replacement);
        } else if latin_only && !is_extended_latin(c) {
            out.push(c);
        } else {
            match deunicode_char(c) {
                Some(ascii) => out.push_str(ascii),
                None => out.push(' '),
            }
        }
    }
    out
}
