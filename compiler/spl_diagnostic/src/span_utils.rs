//! Line and column lookup for rendering spans.

use spl_ir::Span;

/// Pre-computed line offset table for line/column lookup.
///
/// ```
/// use spl_diagnostic::span_utils::LineOffsetTable;
///
/// let source = "line1\nline2\nline3";
/// let table = LineOffsetTable::build(source);
///
/// assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
/// assert_eq!(table.offset_to_line_col(source, 6), (2, 1));
/// assert_eq!(table.offset_to_line_col(source, 14), (3, 3));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start; `offsets[0] == 0`.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// Get 1-based line number from a byte offset.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// Get 1-based (line, column) from a byte offset.
    ///
    /// The column counts characters, not bytes, from the start of the line.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self
            .offsets
            .get((line - 1) as usize)
            .copied()
            .unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());

        let prefix = source.get(line_start..end).unwrap_or("");
        let col = u32::try_from(prefix.chars().count()).unwrap_or(u32::MAX - 1) + 1;

        (line, col)
    }

    /// Get the (line, column) where a span starts.
    pub fn span_start(&self, source: &str, span: Span) -> (u32, u32) {
        self.offset_to_line_col(source, span.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let source = "new x = 1;";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 4), (1, 5));
    }

    #[test]
    fn test_offset_at_newline_belongs_to_line() {
        let source = "ab\ncd\n";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 2), (1, 3));
        assert_eq!(table.offset_to_line_col(source, 3), (2, 1));
        assert_eq!(table.offset_to_line_col(source, 5), (2, 3));
    }

    #[test]
    fn test_columns_count_characters() {
        let source = "é = 1;";
        let table = LineOffsetTable::build(source);
        // 'é' is two bytes wide
        assert_eq!(table.offset_to_line_col(source, 2), (1, 2));
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let source = "ab";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.span_start(source, Span::new(10, 12)), (1, 3));
    }
}
