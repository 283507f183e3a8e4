//! Owned data types shared between the core and the terminal front-end.
//!
//! Everything the external service returns is deserialized straight into these
//! structs. Wire names follow the service's camelCase response schema.
use serde::{Deserialize, Deserializer, Serialize};

/// One evaluated criterion from the checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    /// `true` when the prompt satisfies the criterion.
    pub status: bool,
    pub feedback: String,
}

/// Checklist items partitioned into the three fixed categories.
///
/// Membership is decided by the service; nothing here reclassifies items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedChecklist {
    pub context: Vec<ChecklistItem>,
    pub structure: Vec<ChecklistItem>,
    pub ux_details: Vec<ChecklistItem>,
}

impl GroupedChecklist {
    /// Returns `(title, items)` pairs in display order.
    pub fn sections(&self) -> [(&'static str, &[ChecklistItem]); 3] {
        [
            ("Context & Goals", self.context.as_slice()),
            ("Structure & Flow", self.structure.as_slice()),
            ("UX & Interaction", self.ux_details.as_slice()),
        ]
    }

    /// Number of items across all groups that pass.
    pub fn passed(&self) -> usize {
        self.sections()
            .iter()
            .flat_map(|(_, items)| items.iter())
            .filter(|i| i.status)
            .count()
    }

    /// Total number of items across all groups.
    pub fn total(&self) -> usize {
        self.context.len() + self.structure.len() + self.ux_details.len()
    }
}

/// Full verdict for an analyzed prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Suitability rating, 0 to 100.
    #[serde(deserialize_with = "score_from_number")]
    pub score: i64,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub checklist: GroupedChecklist,
    pub prioritized_actions: Vec<String>,
    /// The service's rewrite of the user's prompt.
    pub refined_prompt: String,
    pub whats_changed: Vec<String>,
}

/// Accepts integral or fractional JSON numbers, rounding the latter.
fn score_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.round() as i64)
}

/// Advice for the next iteration after an unexpected generation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationAdvice {
    pub misunderstanding: String,
    pub root_cause: String,
    /// Exact text to paste into the next iteration.
    pub fix: String,
}

/// Which of the two workflows the session is running.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Score and rewrite a prompt.
    #[default]
    Analyze,
    /// Explain why a generation went wrong and suggest a fix.
    Debug,
}

impl AppMode {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            AppMode::Analyze => AppMode::Debug,
            AppMode::Debug => AppMode::Analyze,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AppMode::Analyze => "Vibe Check",
            AppMode::Debug => "Debug Vibe",
        }
    }
}

/// Lifecycle of the single request a session may have outstanding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Qualitative band a score falls into. Drives the gauge color and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Average,
    Poor,
}

impl ScoreBand {
    /// `>= 80` is Excellent, `>= 50` is Average, everything below is Poor.
    pub fn from_score(score: i64) -> Self {
        if score >= 80 {
            ScoreBand::Excellent
        } else if score >= 50 {
            ScoreBand::Average
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Average => "Average",
            ScoreBand::Poor => "Poor",
        }
    }
}
