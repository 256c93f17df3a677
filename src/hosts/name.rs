//! Name grammar and comment detection shared by the parser and validator.

use std::sync::LazyLock;

use regex::Regex;

/// Pattern every hostname and alias must match.
pub const NAME_PATTERN: &str = r"^[A-Za-z0-9._-]+$";

/// Marker that starts a comment field.
pub const COMMENT_PREFIX: char = '#';

static NAME_MATCHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("NAME_PATTERN is a valid regex"));

/// Returns true if the value, once trimmed, starts with `#`.
#[must_use]
pub fn is_comment(value: &str) -> bool {
    value.trim().starts_with(COMMENT_PREFIX)
}

/// Returns true if the value, once trimmed, is a non-empty name made of
/// ASCII letters, digits, `.`, `_` and `-`.
///
/// # Examples
///
/// ```
/// use hostctl::hosts::name::is_valid_name;
///
/// assert!(is_valid_name("host_one.local"));
/// assert!(!is_valid_name("#foo"));
/// assert!(!is_valid_name(""));
/// ```
#[must_use]
pub fn is_valid_name(value: &str) -> bool {
    NAME_MATCHER.is_match(value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod names {
        use super::*;

        #[test]
        fn accepts_grammar_characters() {
            assert!(is_valid_name("localhost"));
            assert!(is_valid_name("host-one.example.com"));
            assert!(is_valid_name("host_two"));
            assert!(is_valid_name("123"));
        }

        #[test]
        fn trims_surrounding_whitespace() {
            assert!(is_valid_name("  localhost\t"));
        }

        #[test]
        fn rejects_empty_and_whitespace() {
            assert!(!is_valid_name(""));
            assert!(!is_valid_name(" \t "));
        }

        #[test]
        fn rejects_characters_outside_grammar() {
            assert!(!is_valid_name("host name"));
            assert!(!is_valid_name("host/name"));
            assert!(!is_valid_name("héte"));
            assert!(!is_valid_name("#foo"));
        }
    }

    mod comments {
        use super::*;

        #[test]
        fn detects_leading_hash_after_trim() {
            assert!(is_comment("#foo"));
            assert!(is_comment("   # spaced"));
        }

        #[test]
        fn ignores_inner_hash() {
            assert!(!is_comment("foo#bar"));
            assert!(!is_comment(""));
        }
    }
}
