//! Named character reference table.
//!
//! Contract:
//! - Every name in [`LEGACY`] is recognized both with and without the trailing
//!   semicolon (the HTML legacy set).
//! - Names in [`SEMICOLON_ONLY`] are recognized only with the semicolon.
//! - Lookup keys include the `;` when present; [`lookup`] is exact-match and the
//!   caller performs longest-prefix matching.

use std::collections::HashMap;
use std::sync::OnceLock;

use data::{LEGACY, SEMICOLON_ONLY};

mod data;

/// Longest key in the table, semicolon included.
pub(crate) const MAX_NAME_LEN: usize = 32;

fn table() -> &'static HashMap<String, &'static str> {
    static TABLE: OnceLock<HashMap<String, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut map = HashMap::with_capacity(LEGACY.len() * 2 + SEMICOLON_ONLY.len());
        for &(name, text) in LEGACY {
            map.insert(name.to_string(), text);
            map.insert(format!("{name};"), text);
        }
        for &(name, text) in SEMICOLON_ONLY {
            map.insert(name.to_string(), text);
        }
        map
    })
}

/// Exact lookup of `name` (with its `;` if it has one, without the `&`).
pub(crate) fn lookup(name: &str) -> Option<&'static str> {
    table().get(name).copied()
}

/// Longest prefix of `name` that is a known reference, with its expansion.
pub(crate) fn longest_prefix_match(name: &str) -> Option<(usize, &'static str)> {
    (1..=name.len().min(MAX_NAME_LEN))
        .rev()
        .filter(|&len| name.is_char_boundary(len))
        .find_map(|len| lookup(&name[..len]).map(|text| (len, text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_names_match_with_and_without_semicolon() {
        assert_eq!(lookup("amp"), Some("&"));
        assert_eq!(lookup("amp;"), Some("&"));
        assert_eq!(lookup("AElig"), Some("\u{C6}"));
    }

    #[test]
    fn semicolon_only_names_require_it() {
        assert_eq!(lookup("hellip;"), Some("\u{2026}"));
        assert_eq!(lookup("hellip"), None);
    }

    #[test]
    fn longest_prefix_prefers_the_longer_name() {
        assert_eq!(longest_prefix_match("notin;"), Some((6, "\u{2209}")));
        assert_eq!(longest_prefix_match("notit;"), Some((3, "\u{AC}")));
        assert_eq!(longest_prefix_match("zzz"), None);
    }

    #[test]
    fn covers_the_whole_named_reference_list() {
        assert_eq!(table().len(), 2231);
        assert_eq!(lookup("check;"), Some("\u{2713}"));
        assert_eq!(lookup("Alpha;"), Some("\u{391}"));
        assert_eq!(lookup("frac13;"), Some("\u{2153}"));
        assert_eq!(lookup("NotSquareSubset;"), Some("\u{228F}\u{338}"));
        assert_eq!(lookup("NewLine;"), Some("\n"));
    }

    #[test]
    fn no_key_exceeds_the_scan_limit() {
        assert!(table().keys().all(|key| key.len() <= MAX_NAME_LEN));
    }
}
