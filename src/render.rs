//! Report rendering
//!
//! Two targets: plain text for the terminal and a self-contained HTML page
//! for the web form. Model output is shown verbatim in both.

use crate::types::*;
use std::fmt::Write;

pub const TITLE: &str = "TRIZ Engineering Problem Solver";
const FOOTER: &str = "TRIZ Problem Solver | Groq-hosted model + TRIZ contradiction matrix";
const PLACEHOLDER_NOTE: &str =
    "The worsening parameter is a fixed placeholder; only the improving parameter is classified.";

const HOW_IT_WORKS: [&str; 4] = [
    "Describe your engineering problem with contradictory requirements",
    "AI identifies the key parameter to improve",
    "System matches against the TRIZ contradiction matrix",
    "Recommends inventive principles with real-world solutions",
];

// ============================================================================
// Terminal
// ============================================================================

pub fn render_text(report: &SolveReport) -> String {
    let mut out = String::new();

    for advisory in &report.advisories {
        let _ = writeln!(out, "[warning] {}", advisory.message);
    }

    if let Some(Classification {
        improving: Some(improving),
        worsening,
        ..
    }) = &report.classification
    {
        let _ = writeln!(
            out,
            "\nIdentified contradiction: Improving {} vs Worsening {}",
            improving, worsening
        );
        let _ = writeln!(out, "({})", PLACEHOLDER_NOTE);
    }

    match &report.outcome {
        SolveOutcome::EmptyProblem | SolveOutcome::NoParameter => {}
        SolveOutcome::NoDirectPrinciples { strategies } => {
            let _ = writeln!(out, "\nTry these approaches:");
            for (i, s) in strategies.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, s);
            }
        }
        SolveOutcome::Principles {
            industry,
            entries,
            recommendation,
        } => {
            let _ = writeln!(out, "\nTRIZ Principles with Real-Life Solutions ({} industry)", industry);
            let _ = writeln!(out, "{}", "=".repeat(60));
            for entry in entries {
                let _ = writeln!(out, "\nPrinciple {}: {}", entry.principle_num, entry.name);
                let _ = writeln!(out, "{}", "-".repeat(60));
                let _ = writeln!(out, "{}", entry.solution);
            }
            if let Some(text) = recommendation {
                let _ = writeln!(out, "\nOptimal Recommendation");
                let _ = writeln!(out, "{}", "=".repeat(60));
                let _ = writeln!(out, "{}", text);
            }
        }
    }

    let _ = writeln!(
        out,
        "\n{} | session {} | {}",
        FOOTER,
        report.session_id,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out
}

// ============================================================================
// HTML
// ============================================================================

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #222; }
textarea { width: 100%; font: inherit; padding: .5rem; box-sizing: border-box; }
button { margin-top: .5rem; padding: .5rem 1.5rem; font: inherit; cursor: pointer; }
.advisory { padding: .6rem 1rem; border-radius: 4px; margin: .5rem 0; }
.warning { background: #fff4ce; }
.info { background: #e7f0fd; }
.success { background: #dff6dd; padding: .6rem 1rem; border-radius: 4px; }
.note { color: #666; font-size: .9rem; }
.principle { border-top: 1px solid #ddd; padding-top: .5rem; }
.model { white-space: pre-wrap; }
footer { margin-top: 2rem; color: #888; font-size: .85rem; border-top: 1px solid #eee; padding-top: .5rem; }
"#;

/// The form page, with the report underneath when there is one.
pub fn render_page(problem: &str, report: Option<&SolveReport>) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<h1>&#9881; {title}</h1>
<details><summary>How it works</summary><ol>"#,
        title = TITLE,
        style = STYLE,
    );
    for step in HOW_IT_WORKS {
        let _ = write!(html, "<li>{}</li>", escape_html(step));
    }
    let _ = write!(
        html,
        r#"</ol></details>
<form method="post" action="/solve">
<label for="problem">Describe your engineering problem:</label>
<textarea id="problem" name="problem" rows="7" placeholder="e.g., 'We need stronger body panels but they're making the vehicle too heavy'">{problem}</textarea>
<button type="submit">Solve Problem</button>
</form>
"#,
        problem = escape_html(problem),
    );

    if let Some(report) = report {
        render_report_html(&mut html, report);
    }

    let _ = write!(html, "<footer>{}</footer>\n</body>\n</html>\n", escape_html(FOOTER));
    html
}

fn render_report_html(html: &mut String, report: &SolveReport) {
    for advisory in &report.advisories {
        let _ = writeln!(
            html,
            r#"<div class="advisory warning">{}</div>"#,
            escape_html(&advisory.message)
        );
    }

    if let Some(Classification {
        improving: Some(improving),
        worsening,
        ..
    }) = &report.classification
    {
        let _ = writeln!(
            html,
            r#"<div class="success">Identified contradiction: Improving <strong>{}</strong> vs Worsening <strong>{}</strong></div>
<p class="note">{}</p>"#,
            escape_html(improving),
            escape_html(worsening),
            PLACEHOLDER_NOTE
        );
    }

    match &report.outcome {
        SolveOutcome::EmptyProblem | SolveOutcome::NoParameter => {}
        SolveOutcome::NoDirectPrinciples { strategies } => {
            html.push_str("<p><strong>Try these approaches:</strong></p>\n<ol>\n");
            for s in strategies {
                let _ = writeln!(html, "<li>{}</li>", escape_html(s));
            }
            html.push_str("</ol>\n");
        }
        SolveOutcome::Principles {
            industry,
            entries,
            recommendation,
        } => {
            let _ = writeln!(
                html,
                "<h2>&#127919; TRIZ Principles with Real-Life Solutions</h2>\n<p class=\"note\">Industry: {}</p>",
                industry
            );
            for entry in entries {
                let _ = writeln!(
                    html,
                    r#"<section class="principle"><h3>Principle {}: {}</h3>
<p><strong>Real-life Solutions:</strong></p>
<div class="model">{}</div></section>"#,
                    entry.principle_num,
                    escape_html(&entry.name),
                    escape_html(&entry.solution)
                );
            }
            if let Some(text) = recommendation {
                let _ = writeln!(
                    html,
                    r#"<h2>&#127942; Optimal Recommendation</h2>
<div class="advisory info model">{}</div>"#,
                    escape_html(text)
                );
            }
        }
    }

    let _ = writeln!(
        html,
        r#"<p class="note">Session {} &middot; {}</p>"#,
        report.session_id,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principles_report() -> SolveReport {
        let mut report = SolveReport::new("heavy <panels>");
        report.classification = Some(Classification {
            improving: Some("Strength".to_string()),
            worsening: PLACEHOLDER_WORSENING.to_string(),
            source: ClassificationSource::Model,
        });
        report.outcome = SolveOutcome::Principles {
            industry: Industry::Automotive,
            entries: vec![
                SolutionEntry {
                    principle_num: 1,
                    name: "Segmentation".to_string(),
                    solution: "- Real-life Solution 1: <modular> panels".to_string(),
                },
                SolutionEntry {
                    principle_num: 8,
                    name: "Anti-weight".to_string(),
                    solution: "foam cores".to_string(),
                },
            ],
            recommendation: Some("Go with 8".to_string()),
        };
        report
    }

    #[test]
    fn test_text_sections_in_order() {
        let text = render_text(&principles_report());
        let p1 = text.find("Principle 1: Segmentation").unwrap();
        let p8 = text.find("Principle 8: Anti-weight").unwrap();
        let rec = text.find("Optimal Recommendation").unwrap();
        assert!(p1 < p8 && p8 < rec);
        assert!(text.contains("Improving Strength vs Worsening Weight of moving object"));
    }

    #[test]
    fn test_text_advisories_are_warnings() {
        let mut report = SolveReport::new("x");
        report.advisories.push(Advisory::warning("AI analysis failed: down"));
        let text = render_text(&report);
        assert!(text.starts_with("[warning] AI analysis failed: down\n"));
    }

    #[test]
    fn test_html_escapes_model_output() {
        let report = principles_report();
        let html = render_page(&report.problem, Some(&report));
        assert!(html.contains("&lt;modular&gt; panels"));
        assert!(html.contains("heavy &lt;panels&gt;</textarea>"));
        assert!(!html.contains("<modular>"));
    }

    #[test]
    fn test_html_generic_strategies() {
        let mut report = SolveReport::new("x");
        report.advisories.push(Advisory::warning(
            "No direct principles found. Applying separation strategies...",
        ));
        report.outcome = SolveOutcome::NoDirectPrinciples {
            strategies: SEPARATION_STRATEGIES.iter().map(|s| s.to_string()).collect(),
        };
        let html = render_page("x", Some(&report));
        assert!(html.contains(r#"<div class="advisory warning">No direct principles found"#));
        assert_eq!(html.matches("<li>Separate in").count(), 2);
    }

    #[test]
    fn test_empty_page_has_form() {
        let html = render_page("", None);
        assert!(html.contains(r#"<form method="post" action="/solve">"#));
        assert!(!html.contains("Optimal Recommendation"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
