//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::metrics::SweepResults;
use anyhow::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from results
    fn generate(&self, results: &SweepResults, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates Markdown reports from sweep results
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Generate summary header section
    /// @ai:effects pure
    fn generate_summary(results: &SweepResults) -> String {
        let mut output = String::new();

        writeln!(output, "# Reasoning Budget Sweep").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "**Date:** {}", results.timestamp).unwrap();
        writeln!(output, "**Model:** {}", results.model).unwrap();
        writeln!(output, "**Trials per budget:** {}", results.trials).unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Generate per-budget bucket table
    /// @ai:effects pure
    fn generate_bucket_table(results: &SweepResults) -> String {
        let mut output = String::new();

        writeln!(output, "## Results by Token Budget").unwrap();
        writeln!(output).unwrap();
        writeln!(
            output,
            "| Budget | Trials | Accuracy | Avg Reasoning Tokens | Avg Latency | Reasoning Tok/s |"
        )
        .unwrap();
        writeln!(output, "|--------|--------|----------|----------------------|-------------|-----------------|").unwrap();

        for bucket in &results.buckets {
            writeln!(
                output,
                "| {} | {} | {:.1}% | {:.1} | {:.2}s | {:.1} |",
                bucket.max_tokens,
                bucket.trial_count,
                bucket.accuracy * 100.0,
                bucket.avg_reasoning_tokens,
                bucket.avg_latency,
                bucket.reasoning_tokens_per_sec
            )
            .unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Generate fit section
    /// @ai:effects pure
    fn generate_fit_section(results: &SweepResults) -> String {
        let mut output = String::new();

        writeln!(output, "## Accuracy vs Reasoning Tokens").unwrap();
        writeln!(output).unwrap();

        match results.fit {
            Some(fit) => {
                writeln!(
                    output,
                    "Least-squares fit: accuracy = {:.6} * reasoning_tokens + {:.4} (r^2 = {:.3})",
                    fit.slope, fit.intercept, fit.r_squared
                )
                .unwrap();
            }
            None => {
                writeln!(output, "Not enough distinct buckets for a fit.").unwrap();
            }
        }

        writeln!(output).unwrap();
        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, results: &SweepResults, output_path: &Path) -> Result<()> {
        let mut content = String::new();

        content.push_str(&Self::generate_summary(results));
        content.push_str(&Self::generate_bucket_table(results));
        content.push_str(&Self::generate_fit_section(results));

        std::fs::write(output_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{BudgetStats, FitLine};
    use tempfile::TempDir;

    fn sample_results() -> SweepResults {
        SweepResults {
            timestamp: "2026-08-07T00:00:00Z".to_string(),
            model: "o1-preview".to_string(),
            trials: 10,
            buckets: vec![
                BudgetStats {
                    max_tokens: 100,
                    trial_count: 10,
                    accuracy: 0.3,
                    avg_reasoning_tokens: 85.0,
                    avg_latency: 2.1,
                    reasoning_tokens_per_sec: 40.5,
                },
                BudgetStats {
                    max_tokens: 200,
                    trial_count: 10,
                    accuracy: 0.7,
                    avg_reasoning_tokens: 170.0,
                    avg_latency: 3.4,
                    reasoning_tokens_per_sec: 50.0,
                },
            ],
            fit: FitLine::fit(&[(85.0, 0.3), (170.0, 0.7)]),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let reporter = MarkdownReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("results.md");

        reporter.generate(&sample_results(), &output).unwrap();
        assert!(output.exists());

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("# Reasoning Budget Sweep"));
        assert!(content.contains("| 100 | 10 | 30.0% |"));
        assert!(content.contains("Least-squares fit"));
    }

    #[test]
    fn test_report_without_fit() {
        let reporter = MarkdownReporter::new();
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("results.md");

        let mut results = sample_results();
        results.fit = None;

        reporter.generate(&results, &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert!(content.contains("Not enough distinct buckets"));
    }
}
