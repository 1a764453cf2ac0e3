//! Paragraph and sentence segmentation of extracted document text.
//!
//! The split points are heuristic: blank lines, or sentence-ending
//! punctuation followed by whitespace and a capital letter. Abbreviations,
//! numbered lists, and PDF layout artifacts (column breaks, interleaved
//! headers/footers) can over- or under-split; that trade-off is accepted
//! rather than patched with more aggressive rules, which would risk cutting
//! legitimate matches across engineered boundaries.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Trimmed contiguous substring of a document's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    /// Trimmed textual content.
    pub text: String,
    /// Byte offset of the trimmed text within the source document.
    pub byte_start: usize,
    /// Exclusive byte offset within the source document.
    pub byte_end: usize,
}

/// Two or more line breaks, allowing horizontal whitespace between them.
fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\r?\n[ \t]*){2,}").expect("paragraph break pattern"))
}

/// Sentence-ending punctuation (plus trailing quotes/brackets), whitespace,
/// then a capital. `\p{Lu}` covers the accented Spanish capitals.
fn sentence_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([.!?…][»”"')\]]*)\s+\p{Lu}"#).expect("sentence boundary pattern")
    })
}

/// Splits text into ordered, trimmed blocks.
///
/// Blank-line runs separate paragraphs; within each paragraph, sentence
/// boundaries cut further. Empty blocks are dropped, duplicates are kept.
pub fn segment(text: &str) -> Vec<TextBlock> {
    let mut blocks = Vec::new();
    let mut paragraph_start = 0;
    for gap in paragraph_break().find_iter(text) {
        push_sentences(text, paragraph_start, gap.start(), &mut blocks);
        paragraph_start = gap.end();
    }
    push_sentences(text, paragraph_start, text.len(), &mut blocks);
    blocks
}

fn push_sentences(text: &str, start: usize, end: usize, blocks: &mut Vec<TextBlock>) {
    let paragraph = &text[start..end];
    let mut cursor = 0;
    for caps in sentence_boundary().captures_iter(paragraph) {
        let Some(punctuation) = caps.get(1) else {
            continue;
        };
        let cut = punctuation.end();
        if cut <= cursor {
            continue;
        }
        push_trimmed(text, start + cursor, start + cut, blocks);
        cursor = cut;
    }
    push_trimmed(text, start + cursor, end, blocks);
}

fn push_trimmed(text: &str, start: usize, end: usize, blocks: &mut Vec<TextBlock>) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let leading = raw.len() - raw.trim_start().len();
    let byte_start = start + leading;
    blocks.push(TextBlock {
        text: trimmed.to_string(),
        byte_start,
        byte_end: byte_start + trimmed.len(),
    });
}
