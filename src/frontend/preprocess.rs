//! Source preprocessing that runs before tokenizing.

/// Drops everything from the first `//` to the end of each line.
///
/// This works on raw text and knows nothing about string literals, so a line
/// such as `print("http://x")` is cut inside the string. Line structure is kept
/// so token positions still refer to the original source.
pub fn strip_comments(source: &str) -> String {
    source
        .split('\n')
        .map(|line| match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_trailing_comments() {
        assert_eq!(
            strip_comments("var x = 1 // one\n// whole line\nx"),
            "var x = 1 \n\nx"
        );
    }

    #[test]
    fn test_keeps_lines_without_comments() {
        assert_eq!(strip_comments("a / b\n\nc"), "a / b\n\nc");
    }

    #[test]
    fn test_cuts_inside_string_literals() {
        assert_eq!(strip_comments(r#"print("http://x")"#), r#"print("http:"#);
    }
}
