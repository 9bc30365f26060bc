//! Parameter classifier
//!
//! Maps a problem description onto one improving parameter of the matrix.
//! The model is asked first; if it fails or its reply names no known label,
//! the problem text itself is matched against the labels by similarity.

use crate::llm::{CompletionBackend, CompletionRequest, RequestKind};
use crate::types::{Advisory, Classification, ClassificationSource, PLACEHOLDER_WORSENING};

/// Minimum similarity ratio for a fallback match
pub const FALLBACK_CUTOFF: f64 = 0.6;

pub struct Classifier<'a, B> {
    backend: &'a B,
    labels: Vec<&'a str>,
}

impl<'a, B: CompletionBackend> Classifier<'a, B> {
    /// `labels` are the allowed improving labels, in the order they are tried.
    pub fn new(backend: &'a B, labels: Vec<&'a str>) -> Self {
        Self { backend, labels }
    }

    pub fn labels(&self) -> &[&'a str] {
        &self.labels
    }

    /// Classify `problem`, pushing any user-facing notes into `advisories`.
    pub async fn classify(&self, problem: &str, advisories: &mut Vec<Advisory>) -> Classification {
        let request = CompletionRequest::new(RequestKind::Classification, self.prompt(problem));

        match self.backend.complete(&request).await {
            Ok(reply) => {
                if let Some(label) = extract_label(&reply, &self.labels) {
                    tracing::info!(label, "Model classified problem");
                    return classification(Some(label.to_string()), ClassificationSource::Model);
                }
                tracing::warn!(reply = %reply.trim(), "Model reply named no known parameter");
                advisories.push(Advisory::warning(
                    "AI response didn't match known parameters. Using fallback...",
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Classification request failed");
                advisories.push(Advisory::warning(format!(
                    "AI analysis failed: {}. Using manual fallback...",
                    e
                )));
            }
        }

        let label = closest_label(problem, &self.labels);
        tracing::info!(label = ?label, "Fallback classification");
        classification(label, ClassificationSource::Fallback)
    }

    fn prompt(&self, problem: &str) -> String {
        format!(
            r#"Analyze this engineering problem and identify ONLY the single most relevant parameter to improve
from this exact list: {labels}

Return JUST ONE parameter name from the list above. Example: "Strength"

Problem: {problem}"#,
            labels = self.labels.join(", "),
            problem = problem,
        )
    }
}

fn classification(improving: Option<String>, source: ClassificationSource) -> Classification {
    Classification {
        improving,
        worsening: PLACEHOLDER_WORSENING.to_string(),
        source,
    }
}

/// First label contained (case-insensitively) in the reply
pub fn extract_label<'l>(reply: &str, labels: &[&'l str]) -> Option<&'l str> {
    let reply = reply.to_lowercase();
    labels
        .iter()
        .find(|label| reply.contains(&label.to_lowercase()))
        .copied()
}

/// Closest label to `text` by similarity ratio, capitalized like a sentence.
///
/// Both sides are lower-cased before comparing. Returns `None` when nothing
/// reaches [`FALLBACK_CUTOFF`].
pub fn closest_label(text: &str, labels: &[&str]) -> Option<String> {
    let word: Vec<char> = text.to_lowercase().chars().collect();

    labels
        .iter()
        .map(|label| label.to_lowercase())
        .filter_map(|candidate| {
            let chars: Vec<char> = candidate.chars().collect();
            let score = similarity(&chars, &word);
            (score >= FALLBACK_CUTOFF).then_some((score, candidate))
        })
        // highest score wins; ties go to the lexicographically larger label
        .max_by(|(sa, ca), (sb, cb)| sa.total_cmp(sb).then_with(|| ca.cmp(cb)))
        .map(|(_, candidate)| capitalize(&candidate))
}

/// Ratcliff/Obershelp similarity: `2 * matches / (len(a) + len(b))`.
pub fn similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(a, b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, k) = longest_match(a, b);
    if k == 0 {
        return 0;
    }
    k + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + k..], &b[j + k..])
}

/// Longest common block as (start in a, start in b, length).
/// Ties resolve to the earliest block in `a`, then in `b`.
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let k = curr[j + 1];
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
