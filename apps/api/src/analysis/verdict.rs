use serde::{Deserialize, Serialize};

/// Banded reading of the ATS similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchVerdict {
    Excellent,
    Good,
    NeedsImprovement,
}

impl MatchVerdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Excellent => "🎉 Excellent match! Your resume aligns well with the job.",
            Self::Good => "👍 Good match! Some improvements possible.",
            Self::NeedsImprovement => "⚠️ Needs improvement. Review suggestions below.",
        }
    }
}

/// Banded reading of the AI evaluation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationVerdict {
    Outstanding,
    Solid,
    SignificantImprovements,
}

impl EvaluationVerdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Outstanding
        } else if score >= 60.0 {
            Self::Solid
        } else {
            Self::SignificantImprovements
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Outstanding => "🌟 Outstanding resume! Strong candidate profile.",
            Self::Solid => "💪 Solid resume! Minor enhancements recommended.",
            Self::SignificantImprovements => "🔧 Significant improvements needed.",
        }
    }
}

/// Verdict as sent to clients.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictView<V> {
    pub level: V,
    pub message: &'static str,
}

impl From<MatchVerdict> for VerdictView<MatchVerdict> {
    fn from(level: MatchVerdict) -> Self {
        Self {
            level,
            message: level.message(),
        }
    }
}

impl From<EvaluationVerdict> for VerdictView<EvaluationVerdict> {
    fn from(level: EvaluationVerdict) -> Self {
        Self {
            level,
            message: level.message(),
        }
    }
}
