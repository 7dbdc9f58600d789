use memchr::memchr_iter;

/// Line-indexed view over a text document.
///
/// The full text is kept as a single string next to a table of line start
/// offsets rebuilt with a newline scan whenever the text is replaced. Lines
/// are addressed by zero-based index in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    text: String,
    line_starts: Vec<usize>,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self {
            text: String::new(),
            line_starts: vec![0],
        }
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = index_lines(&text);
        Self { text, line_starts }
    }

    /// Replaces the entire contents, reindexing line starts.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.line_starts = index_lines(&self.text);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines. An empty buffer still has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the line at `index` without its trailing newline.
    pub fn line(&self, index: usize) -> Option<&str> {
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let line = &self.text[start..end];
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Iterates all lines in document order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        (0..self.line_count()).filter_map(move |index| self.line(index))
    }

    /// Byte offset of the start of `line`, clamped to the last line start.
    pub fn offset_of_line(&self, line: usize) -> usize {
        self.line_starts
            .get(line)
            .or_else(|| self.line_starts.last())
            .copied()
            .unwrap_or(0)
    }

    /// Line index containing the byte `offset`.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        }
    }
}

impl From<&str> for LineBuffer {
    fn from(value: &str) -> Self {
        Self::from_text(value)
    }
}

impl From<String> for LineBuffer {
    fn from(value: String) -> Self {
        Self::from_text(value)
    }
}

fn index_lines(text: &str) -> Vec<usize> {
    let mut starts = Vec::with_capacity(64);
    starts.push(0);
    for offset in memchr_iter(b'\n', text.as_bytes()) {
        starts.push(offset + 1);
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_has_one_line() {
        let buffer = LineBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line(0), Some(""));
        assert_eq!(buffer.line(1), None);
    }

    #[test]
    fn lines_exclude_newlines() {
        let buffer = LineBuffer::from_text("alpha\nbeta\r\ngamma");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line(0), Some("alpha"));
        assert_eq!(buffer.line(1), Some("beta"));
        assert_eq!(buffer.line(2), Some("gamma"));
    }

    #[test]
    fn trailing_newline_yields_empty_last_line() {
        let buffer = LineBuffer::from_text("alpha\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(1), Some(""));
    }

    #[test]
    fn offsets_round_trip() {
        let buffer = LineBuffer::from_text("one\ntwo\nthree");
        assert_eq!(buffer.offset_of_line(0), 0);
        assert_eq!(buffer.offset_of_line(1), 4);
        assert_eq!(buffer.offset_of_line(2), 8);
        assert_eq!(buffer.line_of_offset(0), 0);
        assert_eq!(buffer.line_of_offset(5), 1);
        assert_eq!(buffer.line_of_offset(8), 2);
        assert_eq!(buffer.line_of_offset(12), 2);
    }

    #[test]
    fn set_text_reindexes() {
        let mut buffer = LineBuffer::from_text("one");
        buffer.set_text("one\ntwo");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(1), Some("two"));
    }
}
