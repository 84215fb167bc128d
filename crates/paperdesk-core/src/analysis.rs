use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{PaperdeskError, Result};

/// Inputs shorter than this still run, but results are unreliable.
pub const ADVISORY_MIN_WORDS: usize = 100;

/// The three analyses offered by the analysis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Plagiarism,
    Novelty,
    Citation,
}

impl AnalysisKind {
    pub fn all() -> &'static [AnalysisKind] {
        &[
            AnalysisKind::Plagiarism,
            AnalysisKind::Novelty,
            AnalysisKind::Citation,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            AnalysisKind::Plagiarism => "plagiarism",
            AnalysisKind::Novelty => "novelty",
            AnalysisKind::Citation => "citation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::Plagiarism => "Plagiarism Check",
            AnalysisKind::Novelty => "Novelty Detection",
            AnalysisKind::Citation => "Citation Analysis",
        }
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = PaperdeskError;

    fn from_str(s: &str) -> Result<Self> {
        AnalysisKind::all()
            .iter()
            .copied()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PaperdeskError::validation(
                    "Invalid Analysis",
                    format!("unknown analysis '{s}'; choose plagiarism, novelty or citation"),
                )
            })
    }
}

/// Free-text content shared by all three analyses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisInput {
    pub text: String,
}

impl AnalysisInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(PaperdeskError::validation(
                "Input Required",
                "Please provide text or paper content for analysis.",
            ));
        }
        Ok(())
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the text is long enough for meaningful results. Advisory only.
    pub fn meets_advisory_length(&self) -> bool {
        self.word_count() >= ADVISORY_MIN_WORDS
    }
}

// ── Plagiarism ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Concern {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Concern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Concern::Low => write!(f, "low"),
            Concern::Medium => write!(f, "medium"),
            Concern::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismMatch {
    pub source: String,
    pub text: String,
    /// Similarity percentage (0-100).
    pub similarity: f64,
    pub concern: Concern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismReport {
    /// Overall similarity (0-100).
    pub overall_score: f64,
    #[serde(default)]
    pub matches: Vec<PlagiarismMatch>,
}

impl PlagiarismReport {
    pub fn risk(&self) -> RiskBand {
        RiskBand::from_score(self.overall_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            RiskBand::Low
        } else if score < 50.0 {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskBand::Low => write!(f, "Low"),
            RiskBand::Medium => write!(f, "Medium"),
            RiskBand::High => write!(f, "High"),
        }
    }
}

// ── Novelty ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoveltyReport {
    /// Novelty (0-100).
    pub novelty_score: f64,
    /// Category name to assessment.
    #[serde(default)]
    pub analysis: BTreeMap<String, String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub similar_works: Vec<String>,
}

// ── Citation ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStats {
    pub total_papers: u64,
    pub total_citations: u64,
    pub average_citations: f64,
    pub h_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluentialPaper {
    pub title: String,
    pub year: i32,
    pub citations: u64,
    pub centrality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationCluster {
    pub name: String,
    pub papers: u64,
    /// Cohesion (0-1).
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationReport {
    pub network_stats: NetworkStats,
    #[serde(default)]
    pub influential_papers: Vec<InfluentialPaper>,
    #[serde(default)]
    pub clusters: Vec<CitationCluster>,
    #[serde(default)]
    pub trends: Vec<String>,
}

/// One analysis outcome, tagged by the kind that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnalysisResult {
    Plagiarism(PlagiarismReport),
    Novelty(NoveltyReport),
    Citation(CitationReport),
}

impl AnalysisResult {
    /// Decode the `analysis` field of a successful response.
    ///
    /// The variant is chosen by the kind that was requested, not by
    /// probing which fields happen to be present.
    pub fn from_payload(kind: AnalysisKind, payload: serde_json::Value) -> Result<Self> {
        if !payload.is_object() {
            return Err(PaperdeskError::MalformedPayload(format!(
                "{kind} analysis was not a structured report"
            )));
        }
        let malformed = |e: serde_json::Error| {
            PaperdeskError::MalformedPayload(format!("{kind} analysis: {e}"))
        };
        let result = match kind {
            AnalysisKind::Plagiarism => {
                AnalysisResult::Plagiarism(serde_json::from_value(payload).map_err(malformed)?)
            }
            AnalysisKind::Novelty => {
                AnalysisResult::Novelty(serde_json::from_value(payload).map_err(malformed)?)
            }
            AnalysisKind::Citation => {
                AnalysisResult::Citation(serde_json::from_value(payload).map_err(malformed)?)
            }
        };
        Ok(result)
    }

    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisResult::Plagiarism(_) => AnalysisKind::Plagiarism,
            AnalysisResult::Novelty(_) => AnalysisKind::Novelty,
            AnalysisResult::Citation(_) => AnalysisKind::Citation,
        }
    }
}
