//! Whitespace normalization applied to every extraction result.
//!
//! Extracted text arrives littered with the source page's indentation,
//! doubled blank lines, and tab-separated layout fragments. [`normalize`]
//! collapses all of that into the compact form that downstream prompt
//! builders expect.

/// Collapses whitespace in extracted text.
///
/// Rules, applied in one pass:
/// - a whitespace run containing at least one newline becomes a single `\n`
/// - any other whitespace run (spaces, tabs) becomes a single space
/// - leading and trailing whitespace is trimmed
///
/// Idempotent: normalizing already-normalized text returns it unchanged.
///
/// # Example
///
/// ```rust
/// use excerpo_core::normalize;
///
/// assert_eq!(normalize("a   b\n\n\nc\t\td"), "a b\nc d");
/// ```
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_newline = false;
    let mut pending_space = false;

    for ch in input.chars() {
        if ch.is_whitespace() {
            if ch == '\n' || ch == '\r' {
                pending_newline = true;
            } else {
                pending_space = true;
            }
        } else {
            if !out.is_empty() {
                if pending_newline {
                    out.push('\n');
                } else if pending_space {
                    out.push(' ');
                }
            }
            pending_newline = false;
            pending_space = false;
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_collapse_rules() {
        assert_eq!(normalize("a   b\n\n\nc\t\td"), "a b\nc d");
    }

    #[test]
    fn test_tabs_become_spaces() {
        assert_eq!(normalize("col1\tcol2\t\tcol3"), "col1 col2 col3");
    }

    #[test]
    fn test_trims_ends() {
        assert_eq!(normalize("  \n padded \t\n"), "padded");
    }

    #[test]
    fn test_mixed_run_prefers_newline() {
        assert_eq!(normalize("a \n b"), "a\nb");
        assert_eq!(normalize("a\r\nb"), "a\nb");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n  "), "");
    }

    #[rstest]
    #[case("a   b\n\n\nc\t\td")]
    #[case("  leading and trailing  ")]
    #[case("single line, no runs")]
    #[case("para one\n\npara two\n\n\npara three")]
    #[case("\t\t\n\n mixed \t soup \n")]
    fn test_idempotent(#[case] input: &str) {
        let once = normalize(input);
        assert_eq!(normalize(&once), once);
    }
}
