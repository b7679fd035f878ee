// WHY: whole-sentence presence/absence detection between two drafts
// Set-based on comparison keys, so relocated verbatim sentences are not flagged

use std::collections::HashSet;

use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::segmenter::{comparison_key, comparison_key_into, Sentence, SentenceSegmenter};

/// Display-form sentences of a new draft with no match in the old draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    sentences: HashSet<String>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, sentence: &str) -> bool {
        self.sentences.contains(sentence)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sentences.iter().map(String::as_str)
    }

    /// Changed sentences in lexical order
    pub fn sorted(&self) -> Vec<&str> {
        let mut sorted: Vec<&str> = self.iter().collect();
        sorted.sort_unstable();
        sorted
    }

    fn insert(&mut self, sentence: &str) {
        if !self.sentences.contains(sentence) {
            self.sentences.insert(sentence.to_string());
        }
    }
}

// Sorted so serialized output is stable across runs
impl Serialize for ChangeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sorted())
    }
}

impl<S: Into<String>> FromIterator<S> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            sentences: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Flag every new sentence whose comparison key is absent from the old sentences
/// Runs in O(|old| + |new|); reordering alone never produces a change
pub fn detect_changes<O, N>(old_sentences: &[O], new_sentences: &[N]) -> ChangeSet
where
    O: AsRef<str>,
    N: AsRef<str>,
{
    let old_keys: HashSet<String> = old_sentences
        .iter()
        .map(|s| comparison_key(s.as_ref()))
        .collect();

    let mut changes = ChangeSet::new();
    let mut key = String::new();

    for sentence in new_sentences {
        let sentence = sentence.as_ref();
        comparison_key_into(sentence, &mut key);
        if !old_keys.contains(key.as_str()) {
            changes.insert(sentence);
        }
    }

    debug!(
        old = old_sentences.len(),
        new = new_sentences.len(),
        changed = changes.len(),
        "detected sentence changes"
    );
    changes
}

/// Segment both drafts with `segmenter` and detect changes between them
pub fn detect_draft_changes(segmenter: &SentenceSegmenter, old_draft: &str, new_draft: &str) -> ChangeSet {
    let old_sentences = segmenter.segment(old_draft);
    let new_sentences = segmenter.segment(new_draft);
    detect_changes(&old_sentences, &new_sentences)
}

/// A sentence tagged for the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedSentence {
    pub index: usize,
    pub text: String,
    pub changed: bool,
}

/// Tag each sentence with whether it appears in `changes`
pub fn annotate(sentences: &[Sentence], changes: &ChangeSet) -> Vec<AnnotatedSentence> {
    sentences
        .iter()
        .map(|sentence| AnnotatedSentence {
            index: sentence.index,
            text: sentence.text.clone(),
            changed: changes.contains(&sentence.text),
        })
        .collect()
}

/// Line-by-line annotation of a draft, preserving blank lines as empty groups
/// A display sentence is changed when the whole-draft sentence covering its span is in `changes`,
/// so a line without a terminal mark still lights up when the sentence it merged into changed
pub fn annotate_lines(
    segmenter: &SentenceSegmenter,
    draft: &str,
    changes: &ChangeSet,
) -> Vec<Vec<AnnotatedSentence>> {
    let detected = segmenter.segment(draft);

    segmenter
        .segment_lines(draft)
        .iter()
        .map(|line| {
            line.iter()
                .map(|sentence| AnnotatedSentence {
                    index: sentence.index,
                    text: sentence.text.clone(),
                    changed: covering_sentence(&detected, sentence)
                        .is_some_and(|covering| changes.contains(&covering.text)),
                })
                .collect()
        })
        .collect()
}

// Line splits refine whole-draft splits, so each display span sits inside exactly one detected span
fn covering_sentence<'a>(detected: &'a [Sentence], sentence: &Sentence) -> Option<&'a Sentence> {
    let pos = detected.partition_point(|d| d.span.end <= sentence.span.start);
    detected.get(pos).filter(|d| d.span.contains(&sentence.span))
}
