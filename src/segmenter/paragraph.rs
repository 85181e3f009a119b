use super::{Segment, SentenceSegmenter};
use crate::span::Span;
use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern"));

/// Sentences per pseudo-paragraph when the text has no line structure
pub const SENTENCES_PER_PSEUDO_PARAGRAPH: usize = 3;

impl SentenceSegmenter {
    /// Split text into paragraphs, trying in order:
    /// - blocks separated by blank lines
    /// - single lines, if that gave at most one paragraph
    /// - runs of three sentences, if that still gave at most one
    pub fn paragraphs(&self, text: &str) -> Vec<Segment> {
        let paragraphs = split_on(text, &BLANK_LINE);
        if paragraphs.len() > 1 {
            return paragraphs;
        }

        let lines = split_lines(text);
        if lines.len() > 1 {
            return lines;
        }

        self.sentence_groups(text, SENTENCES_PER_PSEUDO_PARAGRAPH)
    }

    fn sentence_groups(&self, text: &str, per_group: usize) -> Vec<Segment> {
        self.split(text)
            .chunks(per_group)
            .map(|group| {
                let span = group
                    .iter()
                    .skip(1)
                    .fold(group[0].span, |acc, s| acc.cover(&s.span));
                let text = group
                    .iter()
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                Segment { text, span }
            })
            .collect()
    }
}

fn split_on(text: &str, separator: &Regex) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start = 0;

    for m in separator.find_iter(text) {
        push_trimmed(text, start, m.start(), &mut segments);
        start = m.end();
    }
    push_trimmed(text, start, text.len(), &mut segments);

    segments
}

fn split_lines(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start = 0;

    for (i, _) in text.match_indices('\n') {
        push_trimmed(text, start, i, &mut segments);
        start = i + 1;
    }
    push_trimmed(text, start, text.len(), &mut segments);

    segments
}

fn push_trimmed(text: &str, start: usize, end: usize, out: &mut Vec<Segment>) {
    if let Some(span) = Span::trimmed(text, start, end) {
        out.push(Segment::from_span(text, span));
    }
}
