//! Principle selection
//!
//! Finds the matrix row for an improving label and caps the principles to
//! explain. Only the improving label is used; the worsening side is carried
//! by the record but plays no part in the choice.

use crate::matrix::ContradictionMatrix;
use crate::types::{ContradictionRecord, SEPARATION_STRATEGIES};

/// Most principles explained per solve
pub const MAX_PRINCIPLES: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'m> {
    /// A record was found; `principles` is its capped work list
    Principles {
        record: &'m ContradictionRecord,
        principles: Vec<u32>,
    },
    /// Nothing in the matrix for this label
    NoDirectPrinciples { strategies: Vec<String> },
}

/// First record whose improving label equals `improving` exactly.
pub fn select<'m>(matrix: &'m ContradictionMatrix, improving: &str) -> Selection<'m> {
    match matrix.find_improving(improving) {
        Some(record) => {
            let principles: Vec<u32> = record.principles.iter().take(MAX_PRINCIPLES).copied().collect();
            tracing::debug!(
                improving,
                worsening = %record.worsening,
                available = record.principles.len(),
                selected = principles.len(),
                "Selected principles"
            );
            Selection::Principles { record, principles }
        }
        None => Selection::NoDirectPrinciples {
            strategies: SEPARATION_STRATEGIES.iter().map(|s| s.to_string()).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> ContradictionMatrix {
        ContradictionMatrix::new(vec![
            ContradictionRecord {
                improving: "Strength".to_string(),
                worsening: "Weight".to_string(),
                principles: vec![1, 8, 15],
            },
            ContradictionRecord {
                improving: "Speed".to_string(),
                worsening: "Weight".to_string(),
                principles: vec![2, 28, 13, 38, 10, 19, 35, 34, 3, 26],
            },
        ])
    }

    #[test]
    fn test_found_record_keeps_order() {
        let matrix = matrix();
        match select(&matrix, "Strength") {
            Selection::Principles { record, principles } => {
                assert_eq!(record.worsening, "Weight");
                assert_eq!(principles, vec![1, 8, 15]);
            }
            other => panic!("unexpected selection: {:?}", other),
        }
    }

    #[test]
    fn test_cap_at_six() {
        let matrix = matrix();
        match select(&matrix, "Speed") {
            Selection::Principles { principles, .. } => {
                assert_eq!(principles, vec![2, 28, 13, 38, 10, 19]);
            }
            other => panic!("unexpected selection: {:?}", other),
        }
    }

    #[test]
    fn test_missing_label_gives_generic_strategies() {
        let matrix = matrix();
        match select(&matrix, "strength") {
            Selection::NoDirectPrinciples { strategies } => {
                assert_eq!(strategies.len(), 4);
                assert!(strategies[0].starts_with("Separate in Time"));
                assert!(strategies[3].starts_with("Transition to Supersystem"));
            }
            other => panic!("unexpected selection: {:?}", other),
        }
    }
}
