//! Core types for the TRIZ problem solver
//!
//! The matrix and catalog are loaded once and never mutated. Everything else
//! here belongs to a single solve and is dropped once it has been rendered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Worsening label reported for every classification.
///
/// The classifier does not pick a worsening parameter; this constant stands in
/// for one and is shown to the user as a known limitation.
pub const PLACEHOLDER_WORSENING: &str = "Weight of moving object";

/// One populated cell of the contradiction matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContradictionRecord {
    pub improving: String,
    pub worsening: String,
    pub principles: Vec<u32>,
}

/// A principle explanation produced during a solve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionEntry {
    pub principle_num: u32,
    pub name: String,
    pub solution: String,
}

/// Industry flavour used to steer the generated examples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Automotive,
    Aerospace,
    Medical,
    General,
}

impl Industry {
    /// Keyword groups, checked in order; first hit wins.
    const RULES: [(Industry, &'static [&'static str]); 3] = [
        (Industry::Automotive, &["car", "vehicle", "automotive"]),
        (Industry::Aerospace, &["aerospace", "aircraft", "plane"]),
        (Industry::Medical, &["medical", "healthcare", "surgical"]),
    ];

    /// Pick the industry by plain substring containment on the lower-cased problem.
    pub fn detect(problem: &str) -> Self {
        let lower = problem.to_lowercase();
        Self::RULES
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
            .map(|(industry, _)| *industry)
            .unwrap_or(Industry::General)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Industry::Automotive => "automotive",
            Industry::Aerospace => "aerospace",
            Industry::Medical => "medical",
            Industry::General => "general",
        }
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-blocking warning shown alongside the results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub message: String,
}

impl Advisory {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// How the improving parameter was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// Label found in the model's reply
    Model,
    /// Similarity match against the problem text
    Fallback,
}

/// Result of classifying a problem description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub improving: Option<String>,
    pub worsening: String,
    pub source: ClassificationSource,
}

/// Canned guidance used when the matrix has nothing for the label
pub const SEPARATION_STRATEGIES: [&str; 4] = [
    "Separate in Time (e.g., temporary structures)",
    "Separate in Space (e.g., distributed systems)",
    "Change Scale (e.g., nano-materials)",
    "Transition to Supersystem (e.g., shared components)",
];

/// What a solve produced after classification
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SolveOutcome {
    /// Problem text was empty; nothing was asked
    EmptyProblem,
    /// Neither the model nor the fallback produced a label
    NoParameter,
    /// Label known, but no matrix row for it
    NoDirectPrinciples { strategies: Vec<String> },
    /// Principles found and explained
    Principles {
        industry: Industry,
        entries: Vec<SolutionEntry>,
        recommendation: Option<String>,
    },
}

/// Everything one solve produced, ready for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    pub session_id: Uuid,
    pub problem: String,
    pub advisories: Vec<Advisory>,
    pub classification: Option<Classification>,
    pub outcome: SolveOutcome,
    pub created_at: DateTime<Utc>,
}

impl SolveReport {
    pub fn new(problem: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            problem: problem.into(),
            advisories: Vec::new(),
            classification: None,
            outcome: SolveOutcome::EmptyProblem,
            created_at: Utc::now(),
        }
    }

    /// Principle numbers the report explained, in render order
    pub fn principle_numbers(&self) -> Vec<u32> {
        match &self.outcome {
            SolveOutcome::Principles { entries, .. } => {
                entries.iter().map(|e| e.principle_num).collect()
            }
            _ => Vec::new(),
        }
    }
}
