//! Graphviz helpers.

/// Escapes `text` for use inside a double-quoted DOT string.
///
/// Statement labels are arbitrary source text, so quotes, backslashes, angle
/// brackets and line breaks all need escaping. Carriage returns are dropped.
///
/// ```rust
/// use defscope::utils::escape_dot;
///
/// assert_eq!(escape_dot("x = \"a\";"), "x = \\\"a\\\";");
/// ```
#[must_use]
pub fn escape_dot(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '<' => out.push_str("\\<"),
            '>' => out.push_str("\\>"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain() {
        assert_eq!(escape_dot("x = 1;"), "x = 1;");
    }

    #[test]
    fn test_escape_specials() {
        assert_eq!(escape_dot(r"a\b"), r"a\\b");
        assert_eq!(escape_dot("if (a < b)"), "if (a \\< b)");
        assert_eq!(escape_dot("one\r\ntwo"), "one\\ntwo");
    }
}
