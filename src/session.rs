use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::change_set::{annotate_lines, detect_draft_changes, AnnotatedSentence, ChangeSet};
use crate::error::RevisionError;
use crate::scores::{aggregate, order_suggestions, EvaluationScoreMap, ImprovementSuggestion};
use crate::segmenter::{SegmenterRules, SentenceSegmenter};
use crate::version_slot::{Snapshot, VersionSlot};

/// Identifies one outstanding refinement request
/// WHY: only the newest ticket may be applied, so late results cannot clobber newer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementTicket(u64);

impl RefinementTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Caller-owned editing state for one letter
/// WHY: the only mutable piece of the engine; callers serialize access to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisionSession {
    draft: String,
    #[serde(default)]
    scores: EvaluationScoreMap,
    #[serde(default)]
    improvements: Vec<ImprovementSuggestion>,
    #[serde(default)]
    slot: VersionSlot,
    #[serde(default)]
    changes: ChangeSet,
    #[serde(default)]
    generation: u64,
    #[serde(default)]
    rules: SegmenterRules,
}

impl RevisionSession {
    /// Start a session on a freshly generated draft
    pub fn new(draft: impl Into<String>) -> Self {
        Self::with_rules(draft, SegmenterRules::default())
    }

    pub fn with_rules(draft: impl Into<String>, rules: SegmenterRules) -> Self {
        Self {
            draft: draft.into(),
            scores: EvaluationScoreMap::new(),
            improvements: Vec::new(),
            slot: VersionSlot::new(),
            changes: ChangeSet::new(),
            generation: 0,
            rules,
        }
    }

    /// Load a session from disk, returns None if the file doesn't exist
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read session {}", path.display()))
            }
        };

        let session = serde_json::from_str(&content)
            .with_context(|| format!("Malformed session file {}", path.display()))?;
        Ok(Some(session))
    }

    /// Persist the session as pretty JSON
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write session {}", path.display()))?;
        Ok(())
    }

    /// Replace the letter with a newly generated one, dropping all revision state
    pub fn reset(&mut self, draft: impl Into<String>) {
        let rules = std::mem::take(&mut self.rules);
        let generation = self.generation;
        *self = Self::with_rules(draft, rules);
        // Keep counting so tickets issued before the reset stay stale
        self.generation = generation + 1;
        info!(generation = self.generation, "Session reset with new draft");
    }

    /// Register a refinement request; any earlier ticket becomes stale
    pub fn begin_refinement(&mut self) -> RefinementTicket {
        self.generation += 1;
        info!(generation = self.generation, "Refinement started");
        RefinementTicket(self.generation)
    }

    /// Install a refined draft for `ticket`, returning the sentences it changed
    /// Stale tickets are rejected without touching any state
    pub fn apply_refinement(
        &mut self,
        ticket: RefinementTicket,
        refined: impl Into<String>,
    ) -> Result<&ChangeSet, RevisionError> {
        if ticket.0 != self.generation {
            return Err(RevisionError::StaleRefinement {
                ticket: ticket.0,
                current: self.generation,
            });
        }

        let refined = refined.into();
        let segmenter = SentenceSegmenter::new(self.rules.clone());
        let changes = detect_draft_changes(&segmenter, &self.draft, &refined);

        let previous = std::mem::replace(&mut self.draft, refined);
        let scores = std::mem::take(&mut self.scores);
        let improvements = std::mem::take(&mut self.improvements);
        self.slot.snapshot(previous, scores, improvements);
        self.changes = changes;

        // Consumed; a duplicate delivery of the same result is stale too
        self.generation += 1;

        info!(
            generation = ticket.0,
            changed = self.changes.len(),
            "Applied refinement"
        );
        Ok(&self.changes)
    }

    /// Attach evaluator output to the current draft
    pub fn record_evaluation(&mut self, scores: EvaluationScoreMap, improvements: Vec<ImprovementSuggestion>) {
        self.scores = scores;
        self.improvements = order_suggestions(improvements);
    }

    /// Restore the draft and evaluation that the last refinement replaced
    pub fn revert(&mut self) -> Result<Snapshot, RevisionError> {
        let snapshot = self.slot.revert()?;

        self.draft = snapshot.draft.clone();
        self.scores = snapshot.scores.clone();
        self.improvements = snapshot.improvements.clone();
        self.changes = ChangeSet::new();
        // Results for requests issued against the replaced draft no longer apply
        self.generation += 1;

        info!("Reverted to previous version");
        Ok(snapshot)
    }

    pub fn can_revert(&self) -> bool {
        self.slot.is_holding()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn scores(&self) -> &EvaluationScoreMap {
        &self.scores
    }

    pub fn improvements(&self) -> &[ImprovementSuggestion] {
        &self.improvements
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    pub fn rules(&self) -> &SegmenterRules {
        &self.rules
    }

    /// Rounded mean of the current scores, None before any evaluation
    pub fn mean_score(&self) -> Option<f64> {
        (!self.scores.is_empty()).then(|| aggregate(&self.scores))
    }

    /// Current draft by line, each sentence flagged if the last refinement changed it
    pub fn annotated(&self) -> Vec<Vec<AnnotatedSentence>> {
        let segmenter = SentenceSegmenter::new(self.rules.clone());
        annotate_lines(&segmenter, &self.draft, &self.changes)
    }
}
