//! CST-aware lexer that preserves all trivia (whitespace, comments)
//!
//! Every byte of the input ends up in exactly one token, so concatenating
//! the token texts reproduces the source. This is what makes the syntax
//! tree lossless.

use crate::cst::CsSyntaxKind;
use std::ops::Range;

/// Simple span representing a range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: CsSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: CsSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the CST lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// Lex input preserving ALL trivia for CST construction
///
/// - Whitespace runs become `Whitespace` tokens
/// - `//` and `/* */` comments become comment tokens
/// - `\n`, `\r\n` and lone `\r` become `Newline` tokens
///
/// Malformed input (unterminated strings or comments, stray characters)
/// is reported in the error list but still produces tokens.
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    let len = input.len();
    let mut i = 0usize;

    while i < len {
        let Some((current, size)) = next_char(input, i) else {
            break;
        };
        let start = i;

        let (kind, end) = match current {
            '\n' => (CsSyntaxKind::Newline, i + size),
            '\r' => {
                // Handle \r\n as single newline
                let mut end = i + size;
                if let Some(('\n', nl_size)) = next_char(input, end) {
                    end += nl_size;
                }
                (CsSyntaxKind::Newline, end)
            }
            c if c.is_whitespace() => {
                let mut end = i + size;
                while let Some((next_ch, next_size)) = next_char(input, end) {
                    if next_ch.is_whitespace() && next_ch != '\n' && next_ch != '\r' {
                        end += next_size;
                    } else {
                        break;
                    }
                }
                (CsSyntaxKind::Whitespace, end)
            }
            '/' if input[i..].starts_with("//") => {
                let end = input[i..]
                    .find(['\n', '\r'])
                    .map(|offset| i + offset)
                    .unwrap_or(len);
                (CsSyntaxKind::CommentLine, end)
            }
            '/' if input[i..].starts_with("/*") => {
                let end = match input[i + 2..].find("*/") {
                    Some(offset) => i + 2 + offset + 2,
                    None => {
                        errors.push(LexerError::new("Unterminated block comment", span(start, len)));
                        len
                    }
                };
                (CsSyntaxKind::CommentBlock, end)
            }
            '"' => {
                let (end, error) = lex_regular_string(input, start);
                errors.extend(error);
                (CsSyntaxKind::String, end)
            }
            '@' | '$' if string_prefix_len(input, start).is_some() => {
                let prefix = string_prefix_len(input, start).unwrap_or(1);
                let (end, error) = lex_prefixed_string(input, start, prefix);
                errors.extend(error);
                (CsSyntaxKind::String, end)
            }
            '\'' => {
                let (end, error) = lex_char(input, start);
                errors.extend(error);
                (CsSyntaxKind::Char, end)
            }
            c if c.is_ascii_digit() => (CsSyntaxKind::Number, lex_number(input, start)),
            '.' if next_char(input, i + size).is_some_and(|(c, _)| c.is_ascii_digit()) => {
                (CsSyntaxKind::Number, lex_number(input, start))
            }
            c if is_ident_start(c) => lex_word(input, start),
            '@' if next_char(input, i + size).is_some_and(|(c, _)| is_ident_start(c)) => {
                // Verbatim identifier (@class) is never a keyword
                let (_, end) = lex_word(input, start + size);
                (CsSyntaxKind::Ident, end)
            }
            _ => lex_punct(input, start, current, size),
        };

        if kind == CsSyntaxKind::Unknown {
            errors.push(LexerError::new(
                format!("Unexpected character '{current}'"),
                span(start, end),
            ));
        }

        tokens.push(CstToken::new(kind, &input[start..end], span(start, end)));
        i = end;
    }

    (tokens, errors)
}

/// Identifiers and keywords
fn lex_word(input: &str, start: usize) -> (CsSyntaxKind, usize) {
    let mut end = start;
    while let Some((ch, size)) = next_char(input, end) {
        if is_ident_continue(ch) {
            end += size;
        } else {
            break;
        }
    }
    let kind = CsSyntaxKind::from_keyword(&input[start..end]).unwrap_or(CsSyntaxKind::Ident);
    (kind, end)
}

/// Punctuation and operators (longest match)
fn lex_punct(input: &str, start: usize, current: char, size: usize) -> (CsSyntaxKind, usize) {
    const MULTI: [&str; 24] = [
        "??=", "<<=", ">>=", "=>", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=",
        "*=", "/=", "%=", "&=", "|=", "^=", "??", "?.", "->", "::",
    ];

    let rest = &input[start..];
    if let Some(op) = MULTI.iter().find(|op| rest.starts_with(**op)) {
        let kind = if *op == "=>" {
            CsSyntaxKind::FatArrow
        } else {
            CsSyntaxKind::Operator
        };
        return (kind, start + op.len());
    }

    let kind = match current {
        '(' => CsSyntaxKind::LParen,
        ')' => CsSyntaxKind::RParen,
        '{' => CsSyntaxKind::LBrace,
        '}' => CsSyntaxKind::RBrace,
        '[' => CsSyntaxKind::LBracket,
        ']' => CsSyntaxKind::RBracket,
        ',' => CsSyntaxKind::Comma,
        ';' => CsSyntaxKind::Semicolon,
        '.' => CsSyntaxKind::Dot,
        ':' => CsSyntaxKind::Colon,
        '=' => CsSyntaxKind::Equals,
        '<' => CsSyntaxKind::Lt,
        '>' => CsSyntaxKind::Gt,
        '?' => CsSyntaxKind::Question,
        '+' | '-' | '*' | '/' | '%' | '!' | '~' | '&' | '|' | '^' | '#' => CsSyntaxKind::Operator,
        _ => CsSyntaxKind::Unknown,
    };
    (kind, start + size)
}

/// Length of an `@`/`$` string prefix (`@"`, `$"`, `$@"`, `@$"`), excluding the quote
fn string_prefix_len(input: &str, start: usize) -> Option<usize> {
    let rest = &input[start..];
    ["$@\"", "@$\"", "@\"", "$\""]
        .iter()
        .find(|prefix| rest.starts_with(**prefix))
        .map(|prefix| prefix.len() - 1)
}

/// Lex a regular "..." string with backslash escapes. Stops at end of line.
fn lex_regular_string(input: &str, start: usize) -> (usize, Option<LexerError>) {
    let mut end = start + 1;
    while let Some((ch, size)) = next_char(input, end) {
        match ch {
            '\\' => {
                end += size;
                if let Some((escaped, escaped_size)) = next_char(input, end)
                    && escaped != '\n'
                {
                    end += escaped_size;
                }
            }
            '"' => return (end + size, None),
            '\n' | '\r' => break,
            _ => end += size,
        }
    }
    (
        end,
        Some(LexerError::new("Unterminated string literal", span(start, end))),
    )
}

/// Lex verbatim and/or interpolated strings
///
/// Verbatim strings (`@"..."`) escape quotes by doubling them and may span
/// lines. Interpolated strings (`$"..."`) may contain `{expr}` holes which
/// can themselves contain string literals.
fn lex_prefixed_string(input: &str, start: usize, prefix: usize) -> (usize, Option<LexerError>) {
    let prefix_text = &input[start..start + prefix];
    let verbatim = prefix_text.contains('@');
    let interpolated = prefix_text.contains('$');

    let mut end = start + prefix + 1;
    let mut hole_depth = 0usize;

    while let Some((ch, size)) = next_char(input, end) {
        if hole_depth > 0 {
            match ch {
                '{' => hole_depth += 1,
                '}' => hole_depth -= 1,
                '"' => {
                    let (string_end, _) = lex_regular_string(input, end);
                    end = string_end;
                    continue;
                }
                '\n' | '\r' if !verbatim => break,
                _ => {}
            }
            end += size;
            continue;
        }

        match ch {
            '"' if verbatim && input[end + size..].starts_with('"') => end += size * 2,
            '"' => return (end + size, None),
            '\\' if !verbatim => {
                end += size;
                if let Some((_, escaped_size)) = next_char(input, end) {
                    end += escaped_size;
                }
            }
            '{' if interpolated => {
                if input[end + size..].starts_with('{') {
                    end += size * 2;
                } else {
                    hole_depth = 1;
                    end += size;
                }
            }
            '\n' | '\r' if !verbatim => break,
            _ => end += size,
        }
    }

    (
        end,
        Some(LexerError::new("Unterminated string literal", span(start, end))),
    )
}

/// Lex a character literal such as 'a' or '\n'
fn lex_char(input: &str, start: usize) -> (usize, Option<LexerError>) {
    let mut end = start + 1;
    while let Some((ch, size)) = next_char(input, end) {
        match ch {
            '\\' => {
                end += size;
                if let Some((_, escaped_size)) = next_char(input, end) {
                    end += escaped_size;
                }
            }
            '\'' => return (end + size, None),
            '\n' | '\r' => break,
            _ => end += size,
        }
    }
    (
        end,
        Some(LexerError::new("Unterminated character literal", span(start, end))),
    )
}

/// Lex numeric literals: 42, 3.14, 1e10, 0xFF, 1_000, 10UL, 2.5f
fn lex_number(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let mut end = start;

    if input[start..].starts_with("0x") || input[start..].starts_with("0X") {
        end += 2;
        while end < bytes.len() && (bytes[end].is_ascii_hexdigit() || bytes[end] == b'_') {
            end += 1;
        }
    } else {
        while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'_') {
            end += 1;
        }
        if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
            end += 1;
            while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'_') {
                end += 1;
            }
        }
        if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
            let mut exp = end + 1;
            if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
                exp += 1;
            }
            if exp < bytes.len() && bytes[exp].is_ascii_digit() {
                end = exp;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
            }
        }
    }

    // Type suffixes
    while end < bytes.len() && matches!(bytes[end], b'u' | b'U' | b'l' | b'L' | b'f' | b'F' | b'd' | b'D' | b'm' | b'M') {
        end += 1;
    }

    end
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn next_char(input: &str, pos: usize) -> Option<(char, usize)> {
    input[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

fn span(start: usize, end: usize) -> CstSpan {
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<CsSyntaxKind> {
        lex_with_trivia(input).0.into_iter().map(|t| t.kind).collect()
    }

    fn concat(input: &str) -> String {
        lex_with_trivia(input).0.into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_preserves_whitespace() {
        let (tokens, errors) = lex_with_trivia("Foo(  a,\tb)");
        assert!(errors.is_empty());
        assert_eq!(tokens[2].kind, CsSyntaxKind::Whitespace);
        assert_eq!(tokens[2].text, "  ");
        assert_eq!(tokens[5].text, "\t");
    }

    #[test]
    fn test_crlf_is_single_newline() {
        assert_eq!(
            kinds("a\r\nb"),
            vec![CsSyntaxKind::Ident, CsSyntaxKind::Newline, CsSyntaxKind::Ident]
        );
    }

    #[test]
    fn test_lossless_reconstruction() {
        let source = "class C\r\n{\n    void M(int a, string b = \"x\") { } // done\n    /* block */\n}\n";
        assert_eq!(concat(source), source);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("class new if nameof @class"),
            vec![
                CsSyntaxKind::ClassKw,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::NewKw,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::Keyword,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::Ident,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::Ident,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        let (tokens, errors) = lex_with_trivia(r#""a\"b" @"c""d" $"{F("x")}""#);
        assert!(errors.is_empty(), "{errors:?}");
        let strings: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == CsSyntaxKind::String)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(strings, vec![r#""a\"b""#, r#"@"c""d""#, r#"$"{F("x")}""#]);
    }

    #[test]
    fn test_unterminated_string_reports_error() {
        let (tokens, errors) = lex_with_trivia("F(\"abc\n)");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens[2].kind, CsSyntaxKind::String);
        assert_eq!(tokens[2].text, "\"abc");
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("x => y ?? z"),
            vec![
                CsSyntaxKind::Ident,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::FatArrow,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::Ident,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::Operator,
                CsSyntaxKind::Whitespace,
                CsSyntaxKind::Ident,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        let (tokens, _) = lex_with_trivia("0xFF 1_000 3.14f 1e-3");
        let numbers: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == CsSyntaxKind::Number)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(numbers, vec!["0xFF", "1_000", "3.14f", "1e-3"]);
    }

    #[test]
    fn test_unknown_character() {
        let (tokens, errors) = lex_with_trivia("a \u{00A7} b");
        assert_eq!(errors.len(), 1);
        assert!(tokens.iter().any(|t| t.kind == CsSyntaxKind::Unknown));
    }
}
