/// Byte range of a piece of text inside its source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Shrink the span so it covers `slice.trim()`.
    /// Returns None when the slice is whitespace only.
    pub fn trimmed(source: &str, start: usize, end: usize) -> Option<Self> {
        let slice = &source[start..end];
        let trimmed = slice.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lead = slice.len() - slice.trim_start().len();
        Some(Self::new(start + lead, start + lead + trimmed.len()))
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Smallest span covering both
    pub fn cover(&self, other: &Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Bytes between checkpoints in [`CharOffsets`]
const CHECKPOINT_STRIDE: usize = 256;

/// Converts byte offsets into character offsets for one source text.
///
/// Chunk positions are reported in characters; everything internal works on
/// byte offsets so slicing stays cheap. Non-ASCII text keeps a
/// `(byte, char)` checkpoint roughly every [`CHECKPOINT_STRIDE`] bytes, so a
/// lookup only counts characters from the closest checkpoint.
pub struct CharOffsets<'a> {
    text: &'a str,
    /// Empty for ASCII text, where bytes and characters coincide
    checkpoints: Vec<(usize, usize)>,
}

impl<'a> CharOffsets<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut checkpoints = Vec::new();
        if !text.is_ascii() {
            checkpoints.push((0, 0));
            let mut next = CHECKPOINT_STRIDE;
            for (chars, (byte, _)) in text.char_indices().enumerate() {
                if byte >= next {
                    checkpoints.push((byte, chars));
                    next = byte + CHECKPOINT_STRIDE;
                }
            }
        }

        Self { text, checkpoints }
    }

    /// Character offset of `byte`, which must lie on a character boundary
    pub fn of(&self, byte: usize) -> usize {
        let byte = byte.min(self.text.len());
        if self.checkpoints.is_empty() {
            return byte;
        }

        let idx = self.checkpoints.partition_point(|&(b, _)| b <= byte) - 1;
        let (from, chars) = self.checkpoints[idx];
        chars + self.text[from..byte].chars().count()
    }

    pub fn span(&self, span: Span) -> (usize, usize) {
        (self.of(span.start), self.of(span.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_span() {
        let text = "  hello  world ";
        let span = Span::trimmed(text, 0, 9).unwrap();
        assert_eq!(span.slice(text), "hello");
        assert_eq!(span, Span::new(2, 7));
        assert!(Span::trimmed(text, 7, 9).is_none());
    }

    #[test]
    fn test_char_offsets_multibyte() {
        let text = "héllo wörld";
        let offsets = CharOffsets::new(text);
        let byte = text.find("wörld").unwrap();
        assert_eq!(byte, 7);
        assert_eq!(offsets.of(byte), 6);
        assert_eq!(offsets.of(text.len()), 11);
    }

    #[test]
    fn test_char_offsets_ascii_identity() {
        let offsets = CharOffsets::new("plain ascii");
        assert_eq!(offsets.of(5), 5);
        assert_eq!(offsets.of(100), 11);
    }

    #[test]
    fn test_char_offsets_long_text_match_counting() {
        let text = "Grüße aus Köln, 日本語のテキスト😀. ".repeat(200);
        let offsets = CharOffsets::new(&text);

        for (byte, _) in text.char_indices().step_by(37) {
            assert_eq!(offsets.of(byte), text[..byte].chars().count());
        }
        assert_eq!(offsets.of(text.len()), text.chars().count());
        assert_eq!(offsets.of(0), 0);
    }
}
