// WHY: typed errors for the revision engine library API
// Degenerate drafts and partial score maps are not errors; only contract violations and bad input

use thiserror::Error;

/// Failures surfaced by the library API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevisionError {
    /// Revert requested while the version slot is empty.
    #[error("no previous version to revert to")]
    NoPreviousVersion,

    /// A refinement result arrived after a newer refinement was started.
    #[error("stale refinement result: ticket {ticket} superseded by {current}")]
    StaleRefinement { ticket: u64, current: u64 },

    /// Evaluation score outside the 1-5 scale.
    #[error("score {0} is outside the 1-5 range")]
    ScoreOutOfRange(i64),

    /// Score map key that is not one of the five evaluation metrics.
    #[error("unknown evaluation metric: {0}")]
    UnknownMetric(String),

    /// Whitespace cannot terminate a sentence.
    #[error("invalid terminal mark {0:?}: whitespace cannot end a sentence")]
    InvalidTerminalMark(char),
}
