use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use redline::scores::{derive_suggestions, ScoreExtractor, SuggestionPolicy};
use redline::{
    aggregate, annotate, detect_draft_changes, order_suggestions, percentage,
    AnnotatedSentence, EvaluationScoreMap, ImprovementSuggestion, RevisionSession,
    SegmenterRules, SentenceSegmenter,
};

#[derive(Parser, Debug)]
#[command(name = "redline")]
#[command(about = "Sentence-level change tracking and score review for refined letter drafts")]
#[command(version)]
struct Cli {
    /// Sentence terminators, as one string of characters (default: .!?。！？)
    #[arg(long, global = true)]
    terminal_marks: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the new draft's sentences flagged as changed or unchanged
    Diff {
        /// Draft before refinement
        old: PathBuf,
        /// Draft after refinement
        new: PathBuf,
    },
    /// Summarize an evaluation result ({"scores": {...}, "improvements": [...]})
    Score {
        evaluation: PathBuf,
    },
    /// Parse a free-text evaluator reply into scores and suggestions
    Extract {
        response: PathBuf,
        /// Mean below which suggestions are produced
        #[arg(long, default_value_t = SuggestionPolicy::default().average_threshold)]
        threshold: f64,
    },
    /// Start a session file from a generated draft
    Init {
        #[arg(long)]
        session: PathBuf,
        draft: PathBuf,
    },
    /// Apply a refined draft to a session
    Refine {
        #[arg(long)]
        session: PathBuf,
        refined: PathBuf,
    },
    /// Attach an evaluation result to the session's current draft
    Evaluate {
        #[arg(long)]
        session: PathBuf,
        evaluation: PathBuf,
    },
    /// Restore the draft replaced by the last refinement
    Revert {
        #[arg(long)]
        session: PathBuf,
    },
    /// Print the session's current draft, changes and scores
    Show {
        #[arg(long)]
        session: PathBuf,
    },
}

/// Evaluation service payload
#[derive(Debug, Deserialize)]
struct EvaluationPayload {
    scores: EvaluationScoreMap,
    #[serde(default)]
    improvements: Vec<ImprovementSuggestion>,
}

#[derive(Debug, Serialize)]
struct ScoreSummary {
    mean: f64,
    percentage: f64,
    missing: Vec<String>,
    improvements: Vec<ImprovementSuggestion>,
}

impl ScoreSummary {
    fn new(scores: &EvaluationScoreMap, improvements: Vec<ImprovementSuggestion>) -> Self {
        Self {
            mean: aggregate(scores),
            percentage: percentage(scores),
            missing: scores.missing().into_iter().map(String::from).collect(),
            improvements: order_suggestions(improvements),
        }
    }
}

#[derive(Debug, Serialize)]
struct SessionView<'a> {
    draft: &'a str,
    can_revert: bool,
    mean: Option<f64>,
    lines: Vec<Vec<AnnotatedSentence>>,
    improvements: &'a [ImprovementSuggestion],
}

impl<'a> SessionView<'a> {
    fn new(session: &'a RevisionSession) -> Self {
        Self {
            draft: session.draft(),
            can_revert: session.can_revert(),
            mean: session.mean_score(),
            lines: session.annotated(),
            improvements: session.improvements(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .json()
        .init();

    let cli = Cli::parse();
    info!(?cli, "Parsed CLI arguments");

    let rules = match &cli.terminal_marks {
        Some(marks) => SegmenterRules::new(marks.chars().collect())?,
        None => SegmenterRules::default(),
    };

    match cli.command {
        Commands::Diff { old, new } => {
            let old_draft = read_text(&old).await?;
            let new_draft = read_text(&new).await?;

            let segmenter = SentenceSegmenter::new(rules);
            let changes = detect_draft_changes(&segmenter, &old_draft, &new_draft);
            let annotated = annotate(&segmenter.segment(&new_draft), &changes);

            info!(
                sentences = annotated.len(),
                changed = changes.len(),
                "Diff complete"
            );
            print_json(&annotated)?;
        }
        Commands::Score { evaluation } => {
            let payload = read_evaluation(&evaluation).await?;
            print_json(&ScoreSummary::new(&payload.scores, payload.improvements))?;
        }
        Commands::Extract { response, threshold } => {
            let reply = read_text(&response).await?;
            let extractor = ScoreExtractor::new()?;
            let scores = extractor.extract_scores(&reply);
            let policy = SuggestionPolicy {
                average_threshold: threshold,
            };
            let improvements = derive_suggestions(&scores, &reply, &policy);

            print_json(&serde_json::json!({
                "scores": scores,
                "summary": ScoreSummary::new(&scores, improvements),
            }))?;
        }
        Commands::Init { session, draft } => {
            let draft = read_text(&draft).await?;
            let state = RevisionSession::with_rules(draft, rules);
            state.save(&session).await?;
            info!("Created session {}", session.display());
            print_json(&SessionView::new(&state))?;
        }
        Commands::Refine { session, refined } => {
            let mut state = load_session(&session).await?;
            let refined = read_text(&refined).await?;

            let ticket = state.begin_refinement();
            state.apply_refinement(ticket, refined)?;
            state.save(&session).await?;
            print_json(&SessionView::new(&state))?;
        }
        Commands::Evaluate { session, evaluation } => {
            let mut state = load_session(&session).await?;
            let payload = read_evaluation(&evaluation).await?;

            state.record_evaluation(payload.scores, payload.improvements);
            state.save(&session).await?;
            print_json(&SessionView::new(&state))?;
        }
        Commands::Revert { session } => {
            let mut state = load_session(&session).await?;
            state.revert()?;
            state.save(&session).await?;
            print_json(&SessionView::new(&state))?;
        }
        Commands::Show { session } => {
            let state = load_session(&session).await?;
            print_json(&SessionView::new(&state))?;
        }
    }

    Ok(())
}

async fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn read_evaluation(path: &Path) -> Result<EvaluationPayload> {
    let content = read_text(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Malformed evaluation payload {}", path.display()))
}

async fn load_session(path: &Path) -> Result<RevisionSession> {
    match RevisionSession::load(path).await? {
        Some(session) => Ok(session),
        None => anyhow::bail!("Session file does not exist: {}", path.display()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
