//! Solve flow
//!
//! classify → select → explain → recommend, strictly in that order. Every
//! failure from the hosted model is absorbed into an advisory; `solve` itself
//! cannot fail.

use crate::catalog::PrincipleCatalog;
use crate::classifier::Classifier;
use crate::generator::Generator;
use crate::llm::CompletionBackend;
use crate::matrix::ContradictionMatrix;
use crate::selector::{self, Selection};
use crate::types::*;

/// Knobs that change how a solve runs, not what it produces
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Issue per-principle explanation requests together
    pub concurrent_explanations: bool,
}

/// Owns the static data and the model client for the lifetime of the process.
pub struct SolverSession<B> {
    backend: B,
    matrix: ContradictionMatrix,
    catalog: PrincipleCatalog,
    options: SessionOptions,
}

impl<B: CompletionBackend> SolverSession<B> {
    pub fn new(backend: B, matrix: ContradictionMatrix, catalog: PrincipleCatalog) -> Self {
        Self {
            backend,
            matrix,
            catalog,
            options: SessionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn matrix(&self) -> &ContradictionMatrix {
        &self.matrix
    }

    pub fn catalog(&self) -> &PrincipleCatalog {
        &self.catalog
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one problem through the whole pipeline.
    pub async fn solve(&self, problem: &str) -> SolveReport {
        let problem = problem.trim();
        let mut report = SolveReport::new(problem);

        if problem.is_empty() {
            report
                .advisories
                .push(Advisory::warning("Please describe your engineering problem"));
            return report;
        }

        tracing::info!(session = %report.session_id, chars = problem.len(), "Solving problem");

        // 1. Classify
        let classifier = Classifier::new(&self.backend, self.matrix.improving_labels());
        let classification = classifier.classify(problem, &mut report.advisories).await;
        let improving = classification.improving.clone();
        report.classification = Some(classification);

        let Some(improving) = improving else {
            tracing::info!(session = %report.session_id, "No parameter identified");
            report.advisories.push(Advisory::warning(
                "Could not identify a parameter to improve. Try naming the property you want to improve.",
            ));
            report.outcome = SolveOutcome::NoParameter;
            return report;
        };

        // 2. Select
        let principles = match selector::select(&self.matrix, &improving) {
            Selection::Principles { principles, .. } => principles,
            Selection::NoDirectPrinciples { strategies } => {
                tracing::info!(session = %report.session_id, improving = %improving, "No matrix row for label");
                report.advisories.push(Advisory::warning(
                    "No direct principles found. Applying separation strategies...",
                ));
                report.outcome = SolveOutcome::NoDirectPrinciples { strategies };
                return report;
            }
        };

        // 3. Explain
        let industry = Industry::detect(problem);
        let generator = Generator::new(&self.backend, &self.catalog)
            .concurrent(self.options.concurrent_explanations);
        let entries = generator
            .explain_all(problem, industry, &principles, &mut report.advisories)
            .await;

        // 4. Recommend
        let recommendation = generator
            .recommend(problem, industry, &entries, &mut report.advisories)
            .await;

        tracing::info!(
            session = %report.session_id,
            improving = %improving,
            %industry,
            principles = entries.len(),
            recommended = recommendation.is_some(),
            "Solve complete"
        );

        report.outcome = SolveOutcome::Principles {
            industry,
            entries,
            recommendation,
        };
        report
    }
}
