use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([!?.,;:])").unwrap());

/// Canonical form of a message, used both for display normalization and as
/// the basis for cache keys. Duplicate messages that differ only in case,
/// diacritics or spacing normalize to the same string.
pub fn normalize(s: &str) -> String {
    // NFD decomposition, then drop the combining marks.
    let stripped: String = s.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let lowered = stripped.trim().to_lowercase();
    let collapsed = WHITESPACE_RUN.replace_all(&lowered, " ");
    SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1").into_owned()
}

fn is_combining_mark(c: char) -> bool {
    // U+0300..U+036F covers the combining diacritical marks block.
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Stable hex cache key for a normalized message.
pub fn cache_key(prefix: &str, normalized: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_basic() {
        assert_eq!(normalize(" hola mundo!  "), "hola mundo!");
    }

    #[test]
    fn normalize_strips_diacritics_and_case() {
        assert_eq!(normalize("  hóla   !!! "), "hola!!!");
        assert_eq!(normalize("Hola!!!"), "hola!!!");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("a\t b\n  c"), "a b c");
    }

    #[test]
    fn normalize_removes_space_before_punctuation() {
        assert_eq!(normalize("hola , mundo !"), "hola, mundo!");
    }

    #[test]
    fn normalize_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn hash_is_stable() {
        assert_eq!(cache_key("t|", "x"), cache_key("t|", "x"));
        assert_ne!(cache_key("t|", "x"), cache_key("s|", "x"));
    }
}
