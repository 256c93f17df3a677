//! Line tokenizer.
//!
//! Splits one line into whitespace-delimited fields. The first field that
//! starts with `#` swallows the rest of the line, internal spacing
//! included, and becomes the comment field.

use super::name::COMMENT_PREFIX;

/// Any Unicode whitespace separates fields, including `\v` and `\f`.
fn is_separator(c: char) -> bool {
    c.is_whitespace()
}

/// Splits a raw line into fields.
///
/// Returns an empty vector for empty or whitespace-only input. Trailing
/// `\r`/`\n` are stripped so lines read from CRLF files tokenize cleanly.
///
/// # Examples
///
/// ```
/// use hostctl::hosts::tokenize::tokenize;
///
/// let fields = tokenize("10.0.0.1  web\tw1 w2  # rack  4");
/// assert_eq!(fields, ["10.0.0.1", "web", "w1", "w2", "# rack  4"]);
/// ```
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    let mut rest = line
        .trim_end_matches(['\r', '\n'])
        .trim_matches(is_separator);
    let mut fields = Vec::new();

    while !rest.is_empty() {
        if rest.starts_with(COMMENT_PREFIX) {
            fields.push(rest.to_string());
            break;
        }

        let end = rest.find(is_separator).unwrap_or(rest.len());
        fields.push(rest[..end].to_string());
        rest = rest[end..].trim_start_matches(is_separator);
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_yields_no_fields() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t  ").is_empty());
        assert!(tokenize("\r\n").is_empty());
    }

    #[test]
    fn splits_on_runs_of_spaces_and_tabs() {
        assert_eq!(
            tokenize("127.0.0.1 \t localhost\t\tlocal"),
            ["127.0.0.1", "localhost", "local"]
        );
    }

    #[test]
    fn trims_leading_and_trailing_whitespace() {
        assert_eq!(tokenize("\t  ::1 localhost  \t"), ["::1", "localhost"]);
    }

    #[test]
    fn comment_consumes_rest_of_line_verbatim() {
        assert_eq!(
            tokenize("1.1.1.1 one #  keep   this\tspacing"),
            ["1.1.1.1", "one", "#  keep   this\tspacing"]
        );
    }

    #[test]
    fn comment_only_line_is_single_field() {
        assert_eq!(tokenize("  # just a note  "), ["# just a note"]);
    }

    #[test]
    fn hash_inside_a_field_does_not_start_comment() {
        assert_eq!(tokenize("1.1.1.1 a#b"), ["1.1.1.1", "a#b"]);
    }

    #[test]
    fn splits_on_vertical_tab_form_feed_and_unicode_spaces() {
        assert_eq!(
            tokenize("1.1.1.1\u{0b}host\u{0c}h1\u{3000}h2"),
            ["1.1.1.1", "host", "h1", "h2"]
        );
    }

    #[test]
    fn strips_crlf_terminator() {
        assert_eq!(tokenize("1.1.1.1\tone\r\n"), ["1.1.1.1", "one"]);
    }
}
