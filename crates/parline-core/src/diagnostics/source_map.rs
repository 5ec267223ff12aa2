//! Byte offset to line/column conversion

use std::ops::Range;
use std::path::Path;

use super::Location;
use crate::cst::TextRange;

/// Source map for efficient byte offset to line/column conversion
///
/// Uses a precomputed table of line start offsets for O(log n) lookup.
/// `\n`, `\r\n` and a lone `\r` all end a line, matching the lexer.
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// Byte offsets for each line start (line 0, line 1, ...)
    line_starts: Vec<usize>,
    /// Length of the source text in bytes
    len: usize,
}

impl SourceMap {
    /// Create a source map from source text
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let bytes = source.as_bytes();

        for (idx, &byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => line_starts.push(idx + 1),
                b'\r' if bytes.get(idx + 1) != Some(&b'\n') => line_starts.push(idx + 1),
                _ => {}
            }
        }

        Self {
            line_starts,
            len: source.len(),
        }
    }

    /// Zero-based line containing `offset`
    ///
    /// Returns `None` when the offset lies outside the text.
    pub fn line_of(&self, offset: usize) -> Option<usize> {
        if offset > self.len {
            return None;
        }
        Some(match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        })
    }

    /// Number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert byte offset to 1-based (line, column)
    ///
    /// Columns count Unicode scalar values, not bytes. Offsets past the end
    /// are clamped to the end of the text.
    pub fn offset_to_position(&self, offset: usize, source: &str) -> (usize, usize) {
        let offset = offset.min(self.len).min(source.len());
        let line_idx = self.line_of(offset).unwrap_or(0);
        let line_start = self.line_starts[line_idx];
        let column = source
            .get(line_start..offset)
            .map(|text| text.chars().count())
            .unwrap_or(offset - line_start);

        (line_idx + 1, column + 1)
    }

    /// Create a Location struct from a byte span
    pub fn span_to_location(&self, span: &Range<usize>, source: &str, file: &Path) -> Location {
        let (line, column) = self.offset_to_position(span.start, source);
        let (end_line, end_column) = self.offset_to_position(span.end, source);

        Location {
            file: file.to_path_buf(),
            line,
            column,
            end_line: Some(end_line),
            end_column: Some(end_column),
            offset: span.start,
            length: span.end.saturating_sub(span.start),
            span: Some((span.start, span.end)),
        }
    }

    /// Location of a text range
    pub fn range_to_location(&self, range: TextRange, source: &str, file: &Path) -> Location {
        let span = usize::from(range.start())..usize::from(range.end());
        self.span_to_location(&span, source, file)
    }
}
