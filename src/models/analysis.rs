//! Analysis kinds and the result shapes returned by the analysis services.

use serde::{Deserialize, Serialize};
use url::Url;

/// Similarity score at or above which a match is considered high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 70.0;
/// Similarity score at or above which a match is considered moderate risk.
pub const MODERATE_RISK_THRESHOLD: f64 = 40.0;

/// Which remote analysis to run.
///
/// The rest state ("nothing selected") is `Option::<AnalysisKind>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    AiDetection,
    Plagiarism,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiDetection => "ai_detection",
            Self::Plagiarism => "plagiarism",
        }
    }

    /// Human-readable label used in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AiDetection => "AI detection",
            Self::Plagiarism => "Plagiarism check",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ai_detection" | "ai" | "detect-ai" => Some(Self::AiDetection),
            "plagiarism" | "similarity" => Some(Self::Plagiarism),
            _ => None,
        }
    }
}

/// Confidence reported by the AI detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Presentation classification derived from an AI verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiRisk {
    AiGenerated,
    HumanWritten,
}

/// Presentation classification derived from a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            Self::High
        } else if score >= MODERATE_RISK_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

/// Writing statistics included in a detailed AI detection response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalFeatures {
    pub avg_sentence_length: f64,
    pub avg_word_length: f64,
    pub vocabulary_diversity: f64,
    pub sentence_variance: f64,
    pub total_sentences: u64,
    pub total_words: u64,
}

/// Detailed breakdown returned when the detector is asked for one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AiBreakdown {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistical_features: Option<StatisticalFeatures>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub confidence_factors: Vec<String>,
}

impl AiBreakdown {
    pub fn is_empty(&self) -> bool {
        self.statistical_features.is_none() && self.confidence_factors.is_empty()
    }
}

/// Result of an AI-generation analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResult {
    /// Probability (0-100) that the text is machine generated.
    pub ai_probability: f64,
    pub verdict: String,
    pub confidence: Confidence,
    /// Lower is more predictable, i.e. more AI-like.
    pub perplexity: f64,
    /// Higher means more varied sentence lengths, i.e. more human-like.
    pub burstiness: f64,
    #[serde(default, skip_serializing_if = "AiBreakdown::is_empty")]
    pub breakdown: AiBreakdown,
}

impl AiResult {
    pub fn risk(&self) -> AiRisk {
        if self.verdict.contains("AI-Generated") {
            AiRisk::AiGenerated
        } else {
            AiRisk::HumanWritten
        }
    }
}

/// A single web source compared against the submitted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilaritySource {
    pub title: String,
    pub snippet: String,
    pub similarity_score: f64,
    pub link: Url,
}

impl SimilaritySource {
    pub fn risk(&self) -> RiskLevel {
        RiskLevel::from_score(self.similarity_score)
    }
}

/// Result of a plagiarism similarity analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismResult {
    pub max_similarity_score: f64,
    pub top_link: Option<Url>,
    /// Ordered as returned by the service; empty means no matches were found.
    pub sources: Vec<SimilaritySource>,
}

impl PlagiarismResult {
    pub fn risk(&self) -> RiskLevel {
        RiskLevel::from_score(self.max_similarity_score)
    }
}

/// The one current analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    AiDetection(AiResult),
    Plagiarism(PlagiarismResult),
}

impl AnalysisResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            Self::AiDetection(_) => AnalysisKind::AiDetection,
            Self::Plagiarism(_) => AnalysisKind::Plagiarism,
        }
    }
}
