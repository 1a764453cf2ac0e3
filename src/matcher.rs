//! Trigger-term matching over segmented text.

use crate::segment::TextBlock;
use regex::Regex;
use std::sync::OnceLock;

/// Default trigger terms: the lemma plus common inflections, accented and
/// unaccented. Substring matching on the bare stem alone would miss
/// inflected forms, and PDF extractors sometimes drop the accent.
const DEFAULT_TERMS: &[&str] = &[
    "prórroga",
    "prorroga",
    "prórrogas",
    "prorrogas",
    "prorrogar",
    "prorrogado",
    "prorrogada",
    "prorrogará",
    "prorrogable",
];

/// Whole-text mode: a trigger followed by the first `dd/mm/yyyy` date on the
/// same line, as the original checker reported it.
fn dated_mention() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)pr[oó]rrog\p{L}*.*?\d{2}/\d{2}/\d{4}").expect("dated mention pattern")
    })
}

/// Fixed set of extension-related terms to search for.
#[derive(Clone, Debug)]
pub struct TriggerVocabulary {
    terms: Vec<String>,
}

impl TriggerVocabulary {
    /// Builds a vocabulary from the given terms, lowercased.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary = Self { terms: Vec::new() };
        for term in terms {
            vocabulary.add_term(term.as_ref());
        }
        vocabulary
    }

    /// Adds one term (lowercased, deduplicated).
    pub fn add_term(&mut self, term: &str) {
        let lowered = term.trim().to_lowercase();
        if !lowered.is_empty() && !self.terms.contains(&lowered) {
            self.terms.push(lowered);
        }
    }

    /// Lowercased terms currently in the vocabulary.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Case-insensitive substring containment against any term.
    ///
    /// Deliberately not a whole-word match: "prorrogado" also matches inside
    /// "prorrogados".
    pub fn contains(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.terms.iter().any(|term| lowered.contains(term))
    }

    /// Returns the blocks containing any term, in source order, unranked.
    pub fn matching_blocks(&self, blocks: &[TextBlock]) -> Vec<TextBlock> {
        blocks
            .iter()
            .filter(|block| self.contains(&block.text))
            .cloned()
            .collect()
    }
}

impl Default for TriggerVocabulary {
    fn default() -> Self {
        Self::from_terms(DEFAULT_TERMS)
    }
}

/// Degenerate whole-text mode: raw substrings pairing a trigger with the
/// first following `dd/mm/yyyy` date.
pub fn find_dated_mentions(text: &str) -> Vec<String> {
    dated_mention()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
