// WHY: segmenter facade over the boundary scanner with configurable terminal marks
// Sentences carry display text; comparison keys are derived on demand

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RevisionError;

pub mod normalization;
pub mod scanner;

pub use normalization::{collapse_whitespace, comparison_key, comparison_key_into};
pub use scanner::is_sentence_boundary;

/// Latin and fullwidth/CJK sentence terminators
pub const DEFAULT_TERMINAL_MARKS: [char; 6] = ['.', '!', '?', '\u{3002}', '\u{FF01}', '\u{FF1F}'];

/// Configuration for sentence boundary detection
/// Deserialization goes through `SegmenterRules::new`, so persisted rules are validated too
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSegmenterRules")]
pub struct SegmenterRules {
    /// Characters that end a sentence when followed by whitespace
    pub terminal_marks: Vec<char>,
}

#[derive(Deserialize)]
struct RawSegmenterRules {
    terminal_marks: Vec<char>,
}

impl TryFrom<RawSegmenterRules> for SegmenterRules {
    type Error = RevisionError;

    fn try_from(raw: RawSegmenterRules) -> Result<Self, Self::Error> {
        Self::new(raw.terminal_marks)
    }
}

impl SegmenterRules {
    /// Rules with a custom terminal mark set
    pub fn new(terminal_marks: Vec<char>) -> Result<Self, RevisionError> {
        if let Some(&mark) = terminal_marks.iter().find(|c| c.is_whitespace()) {
            return Err(RevisionError::InvalidTerminalMark(mark));
        }
        Ok(Self { terminal_marks })
    }

    pub fn is_terminal(&self, ch: char) -> bool {
        self.terminal_marks.contains(&ch)
    }
}

impl Default for SegmenterRules {
    fn default() -> Self {
        Self {
            terminal_marks: DEFAULT_TERMINAL_MARKS.to_vec(),
        }
    }
}

/// Byte range of a sentence within the whitespace-collapsed draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

impl ByteSpan {
    pub fn contains(&self, other: &ByteSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// One sentence of a draft in display form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Position in the segmented sequence
    pub index: usize,
    /// Trimmed display text; never case-folded
    pub text: String,
    /// Where the text sits in the collapsed draft
    pub span: ByteSpan,
}

impl Sentence {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Comparison-only key (whitespace collapsed, lower-cased)
    pub fn comparison_key(&self) -> String {
        comparison_key(&self.text)
    }
}

impl AsRef<str> for Sentence {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Punctuation-driven sentence segmenter
#[derive(Debug, Clone, Default)]
pub struct SentenceSegmenter {
    rules: SegmenterRules,
}

impl SentenceSegmenter {
    pub fn new(rules: SegmenterRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &SegmenterRules {
        &self.rules
    }

    /// Segment a draft into ordered sentences
    /// Line breaks and whitespace runs are collapsed first, so a sentence may span lines
    pub fn segment(&self, text: &str) -> Vec<Sentence> {
        let collapsed = collapse_whitespace(text);
        if collapsed.is_empty() {
            return Vec::new();
        }
        scanner::scan_sentences(&collapsed, &self.rules, 0, 0)
    }

    /// Segment each line of a draft separately for paragraph-aware rendering
    /// Blank lines produce empty groups; sentence indices run across the whole draft
    /// Spans address the same collapsed text `segment` scans: non-empty lines joined by one space
    pub fn segment_lines(&self, text: &str) -> Vec<Vec<Sentence>> {
        let mut next_index = 0;
        let mut collapsed_len = 0;
        let mut buffer = String::new();

        let lines: Vec<Vec<Sentence>> = text
            .lines()
            .map(|line| {
                normalization::collapse_whitespace_into(line, &mut buffer);
                if buffer.is_empty() {
                    return Vec::new();
                }

                let base = if collapsed_len == 0 { 0 } else { collapsed_len + 1 };
                let sentences = scanner::scan_sentences(&buffer, &self.rules, next_index, base);
                next_index += sentences.len();
                collapsed_len = base + buffer.len();
                sentences
            })
            .collect();

        debug!(lines = lines.len(), sentences = next_index, "segmented draft by line");
        lines
    }
}

/// Segment with the default terminal marks
pub fn segment(text: &str) -> Vec<Sentence> {
    SentenceSegmenter::default().segment(text)
}

/// Join sentences back into a single line of text
pub fn join_sentences<S: AsRef<str>>(sentences: &[S]) -> String {
    sentences
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}
