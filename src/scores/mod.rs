// WHY: fixed-metric evaluation scores, their aggregation, and suggestion ordering
// Maps may be partial because the evaluator is allowed to skip metrics

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RevisionError;

pub mod extraction;

pub use extraction::{derive_suggestions, ScoreExtractor, SuggestionPolicy};

/// The five letter-quality metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Metric {
    Accuracy,
    Professionalism,
    Coherence,
    Personalization,
    Persuasiveness,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Accuracy,
        Metric::Professionalism,
        Metric::Coherence,
        Metric::Personalization,
        Metric::Persuasiveness,
    ];

    /// Stable machine key
    pub fn key(self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::Professionalism => "professionalism",
            Metric::Coherence => "coherence",
            Metric::Personalization => "personalization",
            Metric::Persuasiveness => "persuasiveness",
        }
    }

    /// Label used by the Korean evaluation service
    pub fn korean_label(self) -> &'static str {
        match self {
            Metric::Accuracy => "정확성",
            Metric::Professionalism => "전문성",
            Metric::Coherence => "논리성",
            Metric::Personalization => "개인화",
            Metric::Persuasiveness => "설득력",
        }
    }

    /// Fixed advice shown next to a low-scoring metric
    pub fn improvement_advice(self) -> &'static str {
        match self {
            Metric::Accuracy => "Add concrete facts and data, and include verifiable information.",
            Metric::Professionalism => "Recheck grammar and keep a consistently professional tone.",
            Metric::Coherence => "Make the introduction-body-conclusion structure clear and strengthen links between paragraphs.",
            Metric::Personalization => "Add the candidate's own examples and concrete results such as numbers and dates.",
            Metric::Persuasiveness => "State the recommendation clearly and back it with memorable examples.",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = RevisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(trimmed) || m.korean_label() == trimmed)
            .ok_or_else(|| RevisionError::UnknownMetric(trimmed.to_string()))
    }
}

impl TryFrom<String> for Metric {
    type Error = RevisionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Metric> for String {
    fn from(metric: Metric) -> Self {
        metric.key().to_string()
    }
}

/// Integer quality score on the 1-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, RevisionError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Score(value as u8))
        } else {
            Err(RevisionError::ScoreOutOfRange(value))
        }
    }

    /// Force an arbitrary integer onto the scale
    pub fn clamped(value: i64) -> Self {
        Score(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = RevisionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Score::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-metric scores for one draft; any subset of the five metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationScoreMap {
    scores: BTreeMap<Metric, Score>,
}

impl EvaluationScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: Metric, score: Score) -> Option<Score> {
        self.scores.insert(metric, score)
    }

    pub fn get(&self, metric: Metric) -> Option<Score> {
        self.scores.get(&metric).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.scores.len() == Metric::ALL.len()
    }

    /// Metrics the evaluator did not report
    pub fn missing(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|m| !self.scores.contains_key(m))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Score)> + '_ {
        self.scores.iter().map(|(m, s)| (*m, *s))
    }

    /// Unrounded mean of the present scores
    pub fn mean(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let total: u32 = self.scores.values().map(|s| u32::from(s.value())).sum();
        Some(f64::from(total) / self.scores.len() as f64)
    }
}

impl FromIterator<(Metric, Score)> for EvaluationScoreMap {
    fn from_iter<I: IntoIterator<Item = (Metric, Score)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// One evaluator suggestion for a metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    pub metric: Metric,
    pub score: Score,
    pub reason: String,
    pub improvement: String,
}

/// Mean of the present scores rounded to one decimal; 0.0 for an empty map
pub fn aggregate(scores: &EvaluationScoreMap) -> f64 {
    scores.mean().map(|mean| round_to(mean, 1)).unwrap_or(0.0)
}

/// Mean mapped from the 1-5 scale onto 0-100, two decimals; 0.0 for an empty map
pub fn percentage(scores: &EvaluationScoreMap) -> f64 {
    scores
        .mean()
        .map(|mean| round_to((mean - 1.0) / 4.0 * 100.0, 2))
        .unwrap_or(0.0)
}

/// Worst-scoring metrics first; equal scores keep the evaluator's order
pub fn order_suggestions(mut suggestions: Vec<ImprovementSuggestion>) -> Vec<ImprovementSuggestion> {
    suggestions.sort_by_key(|s| s.score);
    suggestions
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(v: i64) -> Score {
        Score::new(v).unwrap()
    }

    fn suggestion(metric: Metric, v: i64) -> ImprovementSuggestion {
        ImprovementSuggestion {
            metric,
            score: score(v),
            reason: format!("{metric} reason"),
            improvement: metric.improvement_advice().to_string(),
        }
    }

    #[test]
    fn test_aggregate_full_map() {
        let scores: EvaluationScoreMap = Metric::ALL.into_iter().map(|m| (m, score(5))).collect();
        assert_eq!(aggregate(&scores), 5.0);
        assert!(scores.is_complete());
    }

    #[test]
    fn test_aggregate_partial_map() {
        let scores: EvaluationScoreMap = [(Metric::Accuracy, score(1)), (Metric::Coherence, score(5))]
            .into_iter()
            .collect();
        assert_eq!(aggregate(&scores), 3.0);
        assert_eq!(scores.missing().len(), 3);
    }

    #[test]
    fn test_aggregate_rounds_to_one_decimal() {
        let scores: EvaluationScoreMap = [
            (Metric::Accuracy, score(4)),
            (Metric::Professionalism, score(4)),
            (Metric::Coherence, score(5)),
        ]
        .into_iter()
        .collect();
        assert_eq!(aggregate(&scores), 4.3);
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate(&EvaluationScoreMap::new()), 0.0);
        assert_eq!(percentage(&EvaluationScoreMap::new()), 0.0);
    }

    #[test]
    fn test_percentage() {
        let scores: EvaluationScoreMap = [(Metric::Accuracy, score(3)), (Metric::Coherence, score(4))]
            .into_iter()
            .collect();
        assert_eq!(percentage(&scores), 62.5);

        let top: EvaluationScoreMap = [(Metric::Accuracy, score(5))].into_iter().collect();
        assert_eq!(percentage(&top), 100.0);
    }

    #[test]
    fn test_order_is_stable_ascending() {
        let ordered = order_suggestions(vec![
            suggestion(Metric::Accuracy, 4),
            suggestion(Metric::Coherence, 2),
            suggestion(Metric::Personalization, 4),
            suggestion(Metric::Persuasiveness, 2),
            suggestion(Metric::Professionalism, 3),
        ]);

        let metrics: Vec<Metric> = ordered.iter().map(|s| s.metric).collect();
        assert_eq!(
            metrics,
            vec![
                Metric::Coherence,
                Metric::Persuasiveness,
                Metric::Professionalism,
                Metric::Accuracy,
                Metric::Personalization,
            ]
        );
    }

    #[test]
    fn test_score_range() {
        assert_eq!(Score::new(0), Err(RevisionError::ScoreOutOfRange(0)));
        assert_eq!(Score::new(6), Err(RevisionError::ScoreOutOfRange(6)));
        assert_eq!(Score::clamped(9).value(), 5);
        assert_eq!(Score::clamped(-2).value(), 1);
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!("Accuracy".parse::<Metric>(), Ok(Metric::Accuracy));
        assert_eq!("설득력".parse::<Metric>(), Ok(Metric::Persuasiveness));
        assert_eq!(
            "warmth".parse::<Metric>(),
            Err(RevisionError::UnknownMetric("warmth".to_string()))
        );
    }

    #[test]
    fn test_score_map_json_accepts_korean_keys() {
        let scores: EvaluationScoreMap =
            serde_json::from_str(r#"{"정확성": 4, "논리성": 2, "persuasiveness": 5}"#).unwrap();

        assert_eq!(scores.get(Metric::Accuracy), Some(score(4)));
        assert_eq!(scores.get(Metric::Coherence), Some(score(2)));
        assert_eq!(scores.len(), 3);

        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(json, r#"{"accuracy":4,"coherence":2,"persuasiveness":5}"#);
    }

    #[test]
    fn test_score_map_json_rejects_out_of_range() {
        let result: Result<EvaluationScoreMap, _> = serde_json::from_str(r#"{"accuracy": 7}"#);
        assert!(result.is_err());

        let result: Result<EvaluationScoreMap, _> = serde_json::from_str(r#"{"warmth": 3}"#);
        assert!(result.is_err());
    }
}
