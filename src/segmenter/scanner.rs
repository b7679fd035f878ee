// WHY: explicit finite scan for terminal-mark-plus-whitespace boundaries
// Kept separate from the segmenter facade so the boundary rule is testable on its own

use tracing::debug;

use super::{ByteSpan, Sentence, SegmenterRules};

/// Split already-collapsed text into sentences, numbering them from `first_index`
/// Spans are shifted by `base_offset` so they address the whole collapsed draft
pub fn scan_sentences(
    text: &str,
    rules: &SegmenterRules,
    first_index: usize,
    base_offset: usize,
) -> Vec<Sentence> {
    let char_indices: Vec<(usize, char)> = text.char_indices().collect();
    let chars: Vec<char> = char_indices.iter().map(|(_, ch)| *ch).collect();

    let mut sentences = Vec::new();
    let mut index = first_index;
    let mut sentence_start_byte = 0;

    let mut i = 0;
    while i < chars.len() {
        if !is_sentence_boundary(&chars, i, rules) {
            i += 1;
            continue;
        }

        // Boundary guarantees a following char, so i + 1 is in range
        let end_byte = char_indices[i + 1].0;
        push_sentence(
            &mut sentences,
            &mut index,
            &text[sentence_start_byte..end_byte],
            base_offset + sentence_start_byte,
        );

        let mut next = i + 1;
        while next < chars.len() && chars[next].is_whitespace() {
            next += 1;
        }

        sentence_start_byte = if next < char_indices.len() {
            char_indices[next].0
        } else {
            text.len()
        };
        i = next;
    }

    // Trailing text without a closing boundary
    if sentence_start_byte < text.len() {
        push_sentence(
            &mut sentences,
            &mut index,
            &text[sentence_start_byte..],
            base_offset + sentence_start_byte,
        );
    }

    debug!(sentences = sentences.len(), bytes = text.len(), "scanned sentences");
    sentences
}

fn push_sentence(sentences: &mut Vec<Sentence>, index: &mut usize, raw: &str, raw_start: usize) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let start = raw_start + (raw.len() - raw.trim_start().len());
    sentences.push(Sentence {
        index: *index,
        text: trimmed.to_string(),
        span: ByteSpan {
            start,
            end: start + trimmed.len(),
        },
    });
    *index += 1;
}

/// Check if position `pos` in `chars` ends a sentence
/// A boundary is a terminal mark immediately followed by at least one whitespace char
pub fn is_sentence_boundary(chars: &[char], pos: usize, rules: &SegmenterRules) -> bool {
    if pos + 1 >= chars.len() {
        return false;
    }

    rules.is_terminal(chars[pos]) && chars[pos + 1].is_whitespace()
}
