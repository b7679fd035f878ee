// WHY: single-capacity holder for the draft a refinement replaced
// Not an undo stack: a new snapshot overwrites an unconsumed one and a revert empties the slot

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RevisionError;
use crate::scores::{EvaluationScoreMap, ImprovementSuggestion};

/// Draft plus the evaluation that belonged to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub draft: String,
    pub scores: EvaluationScoreMap,
    pub improvements: Vec<ImprovementSuggestion>,
}

/// Empty or holding exactly one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "snapshot", rename_all = "snake_case")]
pub enum VersionSlot {
    #[default]
    Empty,
    Holding(Snapshot),
}

impl VersionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot, silently replacing any unconsumed one
    pub fn snapshot(
        &mut self,
        draft: impl Into<String>,
        scores: EvaluationScoreMap,
        improvements: Vec<ImprovementSuggestion>,
    ) {
        let replaced = self.is_holding();
        *self = VersionSlot::Holding(Snapshot {
            draft: draft.into(),
            scores,
            improvements,
        });
        debug!(replaced, "stored previous version");
    }

    /// Take the stored snapshot and empty the slot
    pub fn revert(&mut self) -> Result<Snapshot, RevisionError> {
        match std::mem::take(self) {
            VersionSlot::Holding(snapshot) => {
                debug!(chars = snapshot.draft.chars().count(), "reverted to previous version");
                Ok(snapshot)
            }
            VersionSlot::Empty => Err(RevisionError::NoPreviousVersion),
        }
    }

    /// Whether a revert would succeed; gate the revert action on this
    pub fn is_holding(&self) -> bool {
        matches!(self, VersionSlot::Holding(_))
    }

    pub fn peek(&self) -> Option<&Snapshot> {
        match self {
            VersionSlot::Holding(snapshot) => Some(snapshot),
            VersionSlot::Empty => None,
        }
    }

    pub fn clear(&mut self) {
        *self = VersionSlot::Empty;
    }
}
