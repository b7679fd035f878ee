// WHY: turns the evaluator's free-text reply into a score map and suggestion list
// The reply format is loose ("정확성: 4점 - reason", "Accuracy: 4"), so several patterns per metric

use std::collections::HashMap;

use anyhow::Result;
use regex_automata::meta::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{order_suggestions, EvaluationScoreMap, ImprovementSuggestion, Metric, Score};

/// Score assigned to a metric the reply never mentions
pub const FALLBACK_SCORE: u8 = 3;

/// When the evaluator reply should produce improvement suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionPolicy {
    /// Suggestions are produced only while the unrounded mean is below this value
    pub average_threshold: f64,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            // 95 on the 0-100 scale
            average_threshold: 4.75,
        }
    }
}

/// Compiled per-metric patterns for evaluator replies
pub struct ScoreExtractor {
    patterns: HashMap<Metric, Vec<Regex>>,
}

impl ScoreExtractor {
    pub fn new() -> Result<Self> {
        let mut patterns = HashMap::new();

        for metric in Metric::ALL {
            let compiled = metric_patterns(metric)
                .iter()
                .map(|pattern| Regex::new(pattern))
                .collect::<Result<Vec<_>, _>>()?;
            patterns.insert(metric, compiled);
        }

        debug!("Compiled score patterns for {} metrics", patterns.len());
        Ok(Self { patterns })
    }

    /// Score every metric, clamping to 1-5 and falling back to 3 when nothing matches
    pub fn extract_scores(&self, response: &str) -> EvaluationScoreMap {
        let mut scores = EvaluationScoreMap::new();

        for metric in Metric::ALL {
            let found = self.find_score(metric, response);
            let score = match found {
                Some(value) => Score::clamped(value),
                None => {
                    warn!(
                        metric = metric.key(),
                        fallback = FALLBACK_SCORE,
                        "Could not find metric score in evaluator reply"
                    );
                    Score::clamped(i64::from(FALLBACK_SCORE))
                }
            };
            scores.insert(metric, score);
        }

        scores
    }

    fn find_score(&self, metric: Metric, response: &str) -> Option<i64> {
        let regexes = self.patterns.get(&metric)?;

        for regex in regexes {
            let mut caps = regex.create_captures();
            regex.captures(response, &mut caps);
            if let Some(span) = caps.get_group(1) {
                if let Ok(value) = response[span.start..span.end].parse::<i64>() {
                    return Some(value);
                }
            }
        }
        None
    }
}

// First match wins, so the strict "N점" forms come before the loose ones
fn metric_patterns(metric: Metric) -> &'static [&'static str] {
    match metric {
        Metric::Accuracy => &[
            r"(?i)정확성[:\s]*\(?accuracy\)?[:\s]*([0-9])\s*점",
            r"(?i)정확성[:\s]+([0-9])",
            r"(?i)accuracy[:\s]+([0-9])",
        ],
        Metric::Professionalism => &[
            r"(?i)전문성[:\s]*\(?professionalism\)?[:\s]*([0-9])\s*점",
            r"(?i)전문성[:\s]+([0-9])",
            r"(?i)professionalism[:\s]+([0-9])",
        ],
        Metric::Coherence => &[
            r"(?i)논리성[/·\s]*구조?[:\s]*\(?coherence\)?[:\s]*([0-9])\s*점",
            r"(?i)논리성[:\s]+([0-9])",
            r"(?i)구조[:\s]+([0-9])",
            r"(?i)coherence[:\s]+([0-9])",
        ],
        Metric::Personalization => &[
            r"(?i)개인화[:\s]*\(?personalization\)?[:\s]*([0-9])\s*점",
            r"(?i)개인화[:\s]+([0-9])",
            r"(?i)personalization[:\s]+([0-9])",
        ],
        Metric::Persuasiveness => &[
            r"(?i)설득력[:\s]*\(?persuasiveness\)?[:\s]*([0-9])\s*점",
            r"(?i)설득력[:\s]+([0-9])",
            r"(?i)persuasiveness[:\s]+([0-9])",
        ],
    }
}

/// Build suggestions for every metric below 5 when the mean is under the policy threshold
/// Reasons come from the reply line mentioning the metric, after its first '-'
pub fn derive_suggestions(
    scores: &EvaluationScoreMap,
    response: &str,
    policy: &SuggestionPolicy,
) -> Vec<ImprovementSuggestion> {
    let Some(mean) = scores.mean() else {
        return Vec::new();
    };
    if mean >= policy.average_threshold {
        return Vec::new();
    }

    let suggestions = scores
        .iter()
        .filter(|(_, score)| score.value() < Score::MAX)
        .map(|(metric, score)| ImprovementSuggestion {
            metric,
            score,
            reason: reason_for(metric, response)
                .unwrap_or_else(|| format!("currently {score} points")),
            improvement: metric.improvement_advice().to_string(),
        })
        .collect();

    order_suggestions(suggestions)
}

fn reason_for(metric: Metric, response: &str) -> Option<String> {
    let key = metric.key();
    let line = response.lines().find(|line| {
        line.contains(metric.korean_label()) || line.to_lowercase().contains(key)
    })?;

    let (_, reason) = line.split_once('-')?;
    let reason = reason.trim();
    (!reason.is_empty()).then(|| reason.to_string())
}
