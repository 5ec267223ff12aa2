//! Trivia inspection helpers
//!
//! Trivia (whitespace, newlines, comments) lives on the parent node between
//! the significant children. These helpers read the layout the trivia
//! encodes: the indentation of a source line and the document's newline.

use rowan::TextSize;

/// Leading spaces and tabs of the line containing `offset`
///
/// Offsets past the end of `text` are clamped to the end.
pub fn line_indentation(text: &str, offset: TextSize) -> &str {
    let offset = usize::from(offset).min(text.len());
    let line_start = text[..offset]
        .rfind(['\n', '\r'])
        .map(|i| i + 1)
        .unwrap_or(0);
    let line = &text[line_start..];
    let indent_len = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..indent_len]
}

/// Detect the newline sequence used by a document
///
/// The first line break decides; text without one defaults to `\n`.
pub fn detect_newline(text: &str) -> &'static str {
    match text.find('\n') {
        Some(i) if text[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_indentation() {
        let text = "class C\n{\n    void M() { }\n\t\tint x;\n";

        assert_eq!(line_indentation(text, TextSize::from(0)), "");
        assert_eq!(line_indentation(text, TextSize::from(14)), "    ");
        assert_eq!(line_indentation(text, TextSize::from(29)), "\t\t");
        assert_eq!(line_indentation(text, TextSize::from(1000)), "");
    }

    #[test]
    fn test_line_indentation_crlf() {
        let text = "a\r\n  b(1, 2)";
        assert_eq!(line_indentation(text, TextSize::from(6)), "  ");
    }

    #[test]
    fn test_detect_newline() {
        assert_eq!(detect_newline("a\nb"), "\n");
        assert_eq!(detect_newline("a\r\nb"), "\r\n");
        assert_eq!(detect_newline("no line break"), "\n");
    }

    #[test]
    fn test_detect_newline_mixed_uses_first_break() {
        assert_eq!(detect_newline("a\nb\r\nc\r\n"), "\n");
        assert_eq!(detect_newline("a\r\nb\nc\n"), "\r\n");
    }
}
