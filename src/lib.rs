pub mod change_set;
pub mod error;
pub mod scores;
pub mod segmenter;
pub mod session;
pub mod version_slot;

// Re-export main types for convenient access
pub use segmenter::{
    segment, ByteSpan, Sentence, SentenceSegmenter, SegmenterRules
};

pub use change_set::{
    annotate, annotate_lines, detect_changes, detect_draft_changes,
    AnnotatedSentence, ChangeSet
};

pub use scores::{
    aggregate, order_suggestions, percentage,
    EvaluationScoreMap, ImprovementSuggestion, Metric, Score
};

pub use error::RevisionError;
pub use session::{RefinementTicket, RevisionSession};
pub use version_slot::{Snapshot, VersionSlot};
