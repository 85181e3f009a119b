use super::*;

struct ListSplitter(Vec<&'static str>);

impl SentenceSplitter for ListSplitter {
    fn split(&self, _text: &str) -> Result<Vec<String>, SegmentError> {
        Ok(self.0.iter().map(|s| s.to_string()).collect())
    }
}

struct FailingSplitter;

impl SentenceSplitter for FailingSplitter {
    fn split(&self, _text: &str) -> Result<Vec<String>, SegmentError> {
        Err(SegmentError::SplitterFailed("model not loaded".to_string()))
    }
}

fn texts(segments: &[Segment]) -> Vec<&str> {
    segments.iter().map(|s| s.text.as_str()).collect()
}

// ========================================================================
// Sentences
// ========================================================================

#[test]
fn test_unicode_single_letter_sentences() {
    let segmenter = SentenceSegmenter::new();
    let sentences = segmenter.split("A. B. C. D. E.");
    assert_eq!(texts(&sentences), vec!["A.", "B.", "C.", "D.", "E."]);
}

#[test]
fn test_regex_single_letter_sentences() {
    let segmenter = SentenceSegmenter::regex();
    let sentences = segmenter.split("A. B. C. D. E.");
    assert_eq!(texts(&sentences), vec!["A.", "B.", "C.", "D.", "E."]);
}

#[test]
fn test_backends_agree_on_plain_prose() {
    let text = "Hello world. How are you? I am fine.";
    let unicode = SentenceSegmenter::new().sentences(text);
    let regex = SentenceSegmenter::regex().sentences(text);

    assert_eq!(unicode, vec!["Hello world.", "How are you?", "I am fine."]);
    assert_eq!(unicode, regex);
}

#[test]
fn test_regex_keeps_punctuation_runs() {
    let segmenter = SentenceSegmenter::regex();
    let sentences = segmenter.sentences("Wait... what?! Yes");
    assert_eq!(sentences, vec!["Wait...", "what?!", "Yes"]);
}

#[test]
fn test_spans_point_into_source() {
    let text = "  First one.   Second one!\nThird? ";
    for segmenter in [SentenceSegmenter::new(), SentenceSegmenter::regex()] {
        let sentences = segmenter.split(text);
        assert_eq!(sentences.len(), 3);
        for sentence in &sentences {
            assert_eq!(sentence.span.slice(text), sentence.text);
        }
    }
}

#[test]
fn test_blank_input_has_no_sentences() {
    assert!(SentenceSegmenter::new().split("").is_empty());
    assert!(SentenceSegmenter::new().split("   \n\t ").is_empty());
    assert!(SentenceSegmenter::regex().split("   ").is_empty());
}

#[test]
fn test_external_splitter_is_located() {
    let splitter = ListSplitter(vec!["Dr. Smith arrived.", "  ", "He sat down."]);
    let segmenter = SentenceSegmenter::with_splitter(Arc::new(splitter));
    let text = "Dr. Smith arrived. He sat down.";
    let sentences = segmenter.split(text);

    assert_eq!(texts(&sentences), vec!["Dr. Smith arrived.", "He sat down."]);
    assert_eq!(sentences[1].span, Span::new(19, 31));
}

#[test]
fn test_external_splitter_failure_uses_regex() {
    let segmenter = SentenceSegmenter::with_splitter(Arc::new(FailingSplitter));
    let sentences = segmenter.sentences("One. Two.");
    assert_eq!(sentences, vec!["One.", "Two."]);
}

#[test]
fn test_backend_kind_from_config() {
    let kind: SentenceBackendKind = serde_json::from_str("\"regex\"").unwrap();
    assert!(matches!(
        SentenceSegmenter::from_kind(kind).backend(),
        SentenceBackend::Regex
    ));
    assert_eq!(SentenceBackendKind::default(), SentenceBackendKind::Unicode);
}

// ========================================================================
// Paragraphs
// ========================================================================

#[test]
fn test_paragraphs_on_blank_lines() {
    let text = "First paragraph.\nStill first.\n\n  \nSecond paragraph.\n\nThird.";
    let paragraphs = SentenceSegmenter::new().paragraphs(text);
    assert_eq!(
        texts(&paragraphs),
        vec!["First paragraph.\nStill first.", "Second paragraph.", "Third."]
    );
    for p in &paragraphs {
        assert_eq!(p.span.slice(text), p.text);
    }
}

#[test]
fn test_paragraphs_fall_back_to_lines() {
    let text = "Line one.\nLine two.\n\nLine three.";
    // Two blank-line blocks already: no fallback
    assert_eq!(SentenceSegmenter::new().paragraphs(text).len(), 2);

    let text = "Line one.\nLine two.\nLine three.";
    let paragraphs = SentenceSegmenter::new().paragraphs(text);
    assert_eq!(
        texts(&paragraphs),
        vec!["Line one.", "Line two.", "Line three."]
    );
}

#[test]
fn test_paragraphs_fall_back_to_sentence_groups() {
    let text = "One. Two. Three. Four. Five.";
    let paragraphs = SentenceSegmenter::new().paragraphs(text);
    assert_eq!(texts(&paragraphs), vec!["One. Two. Three.", "Four. Five."]);
    assert_eq!(paragraphs[1].span.slice(text), "Four. Five.");
}

#[test]
fn test_paragraphs_of_blank_text() {
    assert!(SentenceSegmenter::new().paragraphs("").is_empty());
    assert!(SentenceSegmenter::new().paragraphs("\n\n  \n").is_empty());
}
