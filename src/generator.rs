//! Explanation and recommendation generation
//!
//! One request per selected principle asking for real-life applications, then
//! one request ranking them. A failed request only affects its own section.

use crate::catalog::PrincipleCatalog;
use crate::llm::{CompletionBackend, CompletionRequest, RequestKind};
use crate::types::{Advisory, Industry, SolutionEntry};
use futures_util::future::join_all;

/// Shown in place of an explanation the model could not produce
pub const SOLUTION_PLACEHOLDER: &str = "Could not generate solution due to API error.";

pub struct Generator<'a, B> {
    backend: &'a B,
    catalog: &'a PrincipleCatalog,
    concurrent: bool,
}

impl<'a, B: CompletionBackend> Generator<'a, B> {
    pub fn new(backend: &'a B, catalog: &'a PrincipleCatalog) -> Self {
        Self {
            backend,
            catalog,
            concurrent: false,
        }
    }

    /// Issue the per-principle requests together instead of one by one.
    /// Output order is unaffected.
    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// One entry per principle, in the order given.
    pub async fn explain_all(
        &self,
        problem: &str,
        industry: Industry,
        principles: &[u32],
        advisories: &mut Vec<Advisory>,
    ) -> Vec<SolutionEntry> {
        let results = if self.concurrent {
            let pending: Vec<_> = principles
                .iter()
                .map(|&n| self.explain(problem, industry, n))
                .collect();
            join_all(pending).await
        } else {
            let mut results = Vec::with_capacity(principles.len());
            for &n in principles {
                results.push(self.explain(problem, industry, n).await);
            }
            results
        };

        results
            .into_iter()
            .map(|(entry, advisory)| {
                advisories.extend(advisory);
                entry
            })
            .collect()
    }

    async fn explain(
        &self,
        problem: &str,
        industry: Industry,
        principle_num: u32,
    ) -> (SolutionEntry, Option<Advisory>) {
        let name = self.catalog.name_of(principle_num).to_string();
        let request = CompletionRequest::new(
            RequestKind::Explanation,
            explanation_prompt(problem, principle_num, &name, industry),
        );

        let (solution, advisory) = match self.backend.complete(&request).await {
            Ok(text) => (text.trim().to_string(), None),
            Err(e) => {
                tracing::warn!(principle = principle_num, error = %e, "Explanation request failed");
                (
                    SOLUTION_PLACEHOLDER.to_string(),
                    Some(Advisory::warning(format!("AI failed to generate solution: {}", e))),
                )
            }
        };

        (
            SolutionEntry {
                principle_num,
                name,
                solution,
            },
            advisory,
        )
    }

    /// Ask which of the explained principles fits best. `None` on failure.
    pub async fn recommend(
        &self,
        problem: &str,
        industry: Industry,
        entries: &[SolutionEntry],
        advisories: &mut Vec<Advisory>,
    ) -> Option<String> {
        let options = match serde_json::to_string_pretty(entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Could not serialize solution entries");
                return None;
            }
        };

        let request = CompletionRequest::new(
            RequestKind::Recommendation,
            recommendation_prompt(problem, industry, &options),
        );

        match self.backend.complete(&request).await {
            Ok(text) => Some(text.trim().to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation request failed");
                advisories.push(Advisory::warning(format!(
                    "AI couldn't generate optimal explanation: {}",
                    e
                )));
                None
            }
        }
    }
}

fn explanation_prompt(problem: &str, principle_num: u32, name: &str, industry: Industry) -> String {
    format!(
        r#"You are an expert TRIZ engineer.

Given the following engineering problem:
"{problem}"

And TRIZ Principle {principle_num}: "{name}",

Generate 1-2 real-life solution examples or strategies that apply this principle to solve the problem, especially for the "{industry}" industry. Be specific and realistic (e.g., techniques, materials, configurations used in known products or systems).

Format:
- Real-life Solution 1: ...
- Real-life Solution 2: ...
"#
    )
}

fn recommendation_prompt(problem: &str, industry: Industry, options: &str) -> String {
    format!(
        r#"We have the following TRIZ principle applications for the problem:

Problem: "{problem}"
Industry: {industry}

Principle Options:
{options}

Based on the problem and industry context, which principle is **most effective** and **why**?
Explain the logic clearly, referencing both benefits and practical applicability.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedBackend;

    #[tokio::test]
    async fn test_explains_in_order_with_names() {
        let backend = ScriptedBackend::new().reply(" one \n").reply("eight").reply("fifteen");
        let catalog = PrincipleCatalog::standard();
        let generator = Generator::new(&backend, &catalog);
        let mut advisories = Vec::new();

        let entries = generator
            .explain_all("heavy panels", Industry::Automotive, &[1, 8, 15], &mut advisories)
            .await;

        let nums: Vec<u32> = entries.iter().map(|e| e.principle_num).collect();
        assert_eq!(nums, vec![1, 8, 15]);
        assert_eq!(entries[0].solution, "one");
        assert_eq!(entries[1].name, "Anti-weight");
        assert!(advisories.is_empty());

        let requests = backend.recorded();
        assert_eq!(requests.len(), 3);
        assert!(requests[1].prompt.contains("TRIZ Principle 8: \"Anti-weight\""));
        assert!(requests[1].prompt.contains("\"automotive\" industry"));
        assert!(requests.iter().all(|r| r.kind == RequestKind::Explanation));
    }

    #[tokio::test]
    async fn test_failed_explanation_is_isolated() {
        let backend = ScriptedBackend::new().reply("a").fail("timeout").reply("c");
        let catalog = PrincipleCatalog::standard();
        let generator = Generator::new(&backend, &catalog);
        let mut advisories = Vec::new();

        let entries = generator
            .explain_all("p", Industry::General, &[1, 2, 3], &mut advisories)
            .await;

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].solution, SOLUTION_PLACEHOLDER);
        assert_eq!(entries[2].solution, "c");
        assert_eq!(advisories.len(), 1);
        assert!(advisories[0].message.contains("timeout"));
    }

    #[tokio::test]
    async fn test_unknown_principle_name() {
        let backend = ScriptedBackend::new().reply("x");
        let catalog = PrincipleCatalog::standard();
        let generator = Generator::new(&backend, &catalog);
        let mut advisories = Vec::new();

        let entries = generator
            .explain_all("p", Industry::General, &[77], &mut advisories)
            .await;
        assert_eq!(entries[0].name, "Unknown");
    }

    #[tokio::test]
    async fn test_concurrent_keeps_order() {
        let backend = ScriptedBackend::new().reply("r1").reply("r2").reply("r3");
        let catalog = PrincipleCatalog::standard();
        let generator = Generator::new(&backend, &catalog).concurrent(true);
        let mut advisories = Vec::new();

        let entries = generator
            .explain_all("p", Industry::General, &[35, 10, 2], &mut advisories)
            .await;

        let nums: Vec<u32> = entries.iter().map(|e| e.principle_num).collect();
        assert_eq!(nums, vec![35, 10, 2]);
        assert_eq!(entries.len(), 3);
    }

    #[tokio::test]
    async fn test_recommendation_includes_entries() {
        let backend = ScriptedBackend::new().reply("  Principle 1 wins.  ");
        let catalog = PrincipleCatalog::standard();
        let generator = Generator::new(&backend, &catalog);
        let mut advisories = Vec::new();
        let entries = vec![SolutionEntry {
            principle_num: 1,
            name: "Segmentation".to_string(),
            solution: "Split the panel".to_string(),
        }];

        let text = generator
            .recommend("heavy panels", Industry::Medical, &entries, &mut advisories)
            .await;

        assert_eq!(text.as_deref(), Some("Principle 1 wins."));
        let request = &backend.recorded()[0];
        assert_eq!(request.kind, RequestKind::Recommendation);
        assert!(request.prompt.contains("Industry: medical"));
        assert!(request.prompt.contains("\"principle_num\": 1"));
        assert!(request.prompt.contains("Split the panel"));
    }

    #[tokio::test]
    async fn test_recommendation_failure_is_soft() {
        let backend = ScriptedBackend::new().fail("502");
        let catalog = PrincipleCatalog::standard();
        let generator = Generator::new(&backend, &catalog);
        let mut advisories = Vec::new();

        let text = generator.recommend("p", Industry::General, &[], &mut advisories).await;
        assert!(text.is_none());
        assert!(advisories[0].message.starts_with("AI couldn't generate optimal explanation"));
    }
}
