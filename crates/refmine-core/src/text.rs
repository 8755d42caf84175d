//! Text model primitives: offsets, ranges, and line/column conversion.

pub use text_size::{TextRange, TextSize};

/// A 1-based line/column pair.
///
/// Columns count UTF-16 code units, which is what Java tooling reports.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Pre-computed line start offsets for a particular text snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    line_ends: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = Vec::with_capacity(128);
        let mut line_ends = Vec::with_capacity(128);
        line_starts.push(TextSize::from(0));

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                b'\r' => {
                    line_ends.push(TextSize::from(i as u32));
                    if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                        line_starts.push(TextSize::from((i + 2) as u32));
                        i += 2;
                    } else {
                        line_starts.push(TextSize::from((i + 1) as u32));
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }

        line_ends.push(TextSize::from(text.len() as u32));

        Self {
            line_starts,
            line_ends,
            text_len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.text_len
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    fn line_index(&self, offset: TextSize) -> usize {
        // Offsets past the end are clamped; exclusive span ends may equal `text_len`.
        let offset = offset.min(self.text_len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    /// Convert a byte offset into a 1-based line and 1-based UTF-16 column.
    ///
    /// `text` must be the same snapshot used to construct this [`LineIndex`].
    /// Offsets inside a line terminator are clamped to the end of that line, and
    /// offsets that do not fall on a char boundary round down to the previous one.
    pub fn line_col(&self, text: &str, offset: TextSize) -> LineCol {
        debug_assert_eq!(TextSize::from(text.len() as u32), self.text_len);
        let offset = offset.min(self.text_len);
        let line = self.line_index(offset);
        let line_start = u32::from(self.line_starts[line]) as usize;
        let mut end = u32::from(offset.min(self.line_ends[line])) as usize;
        while end > line_start && !text.is_char_boundary(end) {
            end -= 1;
        }
        let utf16_col: u32 = text[line_start..end]
            .chars()
            .map(|c| c.len_utf16() as u32)
            .sum();

        LineCol {
            line: line as u32 + 1,
            col: utf16_col + 1,
        }
    }

    /// Convert a half-open byte range into its start and (exclusive) end positions.
    pub fn range(&self, text: &str, range: TextRange) -> (LineCol, LineCol) {
        (
            self.line_col(text, range.start()),
            self.line_col(text, range.end()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn offsets_map_to_one_based_positions() {
        let text = "class C {\n  int x;\n}\n";
        let index = LineIndex::new(text);

        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_col(text, TextSize::from(0)), LineCol::new(1, 1));
        assert_eq!(index.line_col(text, TextSize::from(6)), LineCol::new(1, 7));
        // `int` on the second line.
        let int = text.find("int").unwrap() as u32;
        assert_eq!(index.line_col(text, TextSize::from(int)), LineCol::new(2, 3));
        assert_eq!(
            index.range(text, TextRange::new(int.into(), (int + 3).into())),
            (LineCol::new(2, 3), LineCol::new(2, 6))
        );
    }

    #[test]
    fn crlf_and_lone_cr_terminate_lines() {
        let text = "a\r\nb\rc";
        let index = LineIndex::new(text);

        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(text, TextSize::from(3)), LineCol::new(2, 1));
        assert_eq!(index.line_col(text, TextSize::from(5)), LineCol::new(3, 1));
        // Inside the `\r\n` pair clamps to the end of line one.
        assert_eq!(index.line_col(text, TextSize::from(2)), LineCol::new(1, 2));
    }

    #[test]
    fn columns_count_utf16_units() {
        // 😀 is a surrogate pair in UTF-16 (2 code units, 4 bytes in UTF-8).
        let text = "a😀b";
        let index = LineIndex::new(text);

        assert_eq!(index.line_col(text, TextSize::from(5)), LineCol::new(1, 4));
        assert_eq!(index.line_col(text, TextSize::from(6)), LineCol::new(1, 5));
        // Mid-codepoint offsets round down.
        assert_eq!(index.line_col(text, TextSize::from(3)), LineCol::new(1, 2));
    }

    #[test]
    fn offsets_past_the_end_clamp() {
        let text = "x";
        let index = LineIndex::new(text);
        assert_eq!(index.text_len(), TextSize::from(1));
        assert_eq!(index.line_col(text, TextSize::from(40)), LineCol::new(1, 2));
    }
}
