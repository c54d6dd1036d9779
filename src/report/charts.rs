//! @ai:module:intent Chart generation for sweep results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator
//! @ai:module:stateless true

use crate::metrics::SweepResults;
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts from results
    fn generate_all(&self, results: &SweepResults, output_dir: &Path) -> Result<Vec<String>>;
}

/// @ai:intent Generates charts from sweep results
pub struct ChartGenerator;

/// @ai:intent Budget axis range with padding so edge bars stay visible
/// @ai:effects pure
fn budget_range(results: &SweepResults) -> Result<std::ops::Range<f64>> {
    let first = results.buckets.first().context("no buckets to plot")?;
    let last = results.buckets.last().context("no buckets to plot")?;

    let x_min = first.max_tokens as f64;
    let x_max = last.max_tokens as f64;
    let pad = ((x_max - x_min) * 0.05).max(x_max * 0.01).max(50.0);

    Ok((x_min - pad)..(x_max + pad))
}

/// @ai:intent Bar half-width derived from bucket spacing
/// @ai:effects pure
fn bar_half_width(results: &SweepResults) -> f64 {
    if results.buckets.len() < 2 {
        return 25.0;
    }

    let step = (results.buckets[1].max_tokens - results.buckets[0].max_tokens) as f64;
    (step * 0.35).max(1.0)
}

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Accuracy line with reasoning-token bars and fit line
    /// @ai:effects fs:write
    fn generate_accuracy_chart(&self, results: &SweepResults, output_path: &Path) -> Result<()> {
        let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
        root.fill(&WHITE)?;

        let x_range = budget_range(results)?;
        let half_width = bar_half_width(results);

        let max_reasoning = results
            .buckets
            .iter()
            .map(|b| b.avg_reasoning_tokens)
            .fold(0.0f64, f64::max)
            .max(1.0)
            * 1.2;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Accuracy and Reasoning Tokens vs Token Budget",
                ("sans-serif", 28),
            )
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .right_y_label_area_size(55)
            .build_cartesian_2d(x_range.clone(), 0f64..1.05f64)?
            .set_secondary_coord(x_range, 0f64..max_reasoning);

        chart
            .configure_mesh()
            .x_desc("Max Completion Tokens")
            .y_desc("Accuracy")
            .draw()?;

        chart
            .configure_secondary_axes()
            .y_desc("Avg Reasoning Tokens")
            .draw()?;

        chart
            .draw_secondary_series(results.buckets.iter().map(|b| {
                let x = b.max_tokens as f64;
                Rectangle::new(
                    [(x - half_width, 0.0), (x + half_width, b.avg_reasoning_tokens)],
                    GREEN.mix(0.3).filled(),
                )
            }))?
            .label("Avg Reasoning Tokens")
            .legend(|(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], GREEN.mix(0.3).filled())
            });

        chart
            .draw_series(
                LineSeries::new(
                    results
                        .buckets
                        .iter()
                        .map(|b| (b.max_tokens as f64, b.accuracy)),
                    &BLUE,
                )
                .point_size(3),
            )?
            .label("Accuracy")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        if let Some(fit) = results.fit {
            chart
                .draw_series(LineSeries::new(
                    results
                        .buckets
                        .iter()
                        .map(|b| (b.max_tokens as f64, fit.predict(b.avg_reasoning_tokens))),
                    &RED,
                ))?
                .label(format!("Fit (r^2={:.2})", fit.r_squared))
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    /// @ai:intent Latency and reasoning throughput against token budget
    /// @ai:effects fs:write
    fn generate_latency_chart(&self, results: &SweepResults, output_path: &Path) -> Result<()> {
        let root = BitMapBackend::new(output_path, (900, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let x_range = budget_range(results)?;

        let max_latency = results
            .buckets
            .iter()
            .map(|b| b.avg_latency)
            .fold(0.0f64, f64::max)
            .max(0.1)
            * 1.2;

        let max_tps = results
            .buckets
            .iter()
            .map(|b| b.reasoning_tokens_per_sec)
            .fold(0.0f64, f64::max)
            .max(0.1)
            * 1.2;

        let mut chart = ChartBuilder::on(&root)
            .caption("Latency and Reasoning Throughput", ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .right_y_label_area_size(55)
            .build_cartesian_2d(x_range.clone(), 0f64..max_latency)?
            .set_secondary_coord(x_range, 0f64..max_tps);

        chart
            .configure_mesh()
            .x_desc("Max Completion Tokens")
            .y_desc("Avg Latency (s)")
            .draw()?;

        chart
            .configure_secondary_axes()
            .y_desc("Reasoning Tokens / s")
            .draw()?;

        chart
            .draw_series(
                LineSeries::new(
                    results
                        .buckets
                        .iter()
                        .map(|b| (b.max_tokens as f64, b.avg_latency)),
                    &BLUE,
                )
                .point_size(3),
            )?
            .label("Avg Latency")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart
            .draw_secondary_series(
                LineSeries::new(
                    results
                        .buckets
                        .iter()
                        .map(|b| (b.max_tokens as f64, b.reasoning_tokens_per_sec)),
                    &GREEN,
                )
                .point_size(3),
            )?
            .label("Reasoning Tokens / s")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Generate all charts
    /// @ai:effects fs:write
    fn generate_all(&self, results: &SweepResults, output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        if results.buckets.is_empty() {
            tracing::warn!("No buckets to plot, skipping charts");
            return Ok(vec![]);
        }

        let mut generated = Vec::new();

        let accuracy_path = output_dir.join("accuracy.png");
        self.generate_accuracy_chart(results, &accuracy_path)?;
        generated.push("accuracy.png".to_string());

        let latency_path = output_dir.join("latency.png");
        self.generate_latency_chart(results, &latency_path)?;
        generated.push("latency.png".to_string());

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{BudgetStats, FitLine};
    use tempfile::TempDir;

    fn create_test_results() -> SweepResults {
        let buckets: Vec<BudgetStats> = (1..=5)
            .map(|i| BudgetStats {
                max_tokens: i * 100,
                trial_count: 10,
                accuracy: 0.1 * i as f64,
                avg_reasoning_tokens: 80.0 * i as f64,
                avg_latency: 1.5 + 0.6 * i as f64,
                reasoning_tokens_per_sec: 40.0 + i as f64,
            })
            .collect();

        let points: Vec<(f64, f64)> = buckets
            .iter()
            .map(|b| (b.avg_reasoning_tokens, b.accuracy))
            .collect();
        let fit = FitLine::fit(&points);

        SweepResults {
            timestamp: "2026-08-07T00:00:00Z".to_string(),
            model: "o1-preview".to_string(),
            trials: 10,
            buckets,
            fit,
        }
    }

    #[test]
    fn test_generate_all_charts() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();
        let results = create_test_results();

        let files = generator.generate_all(&results, temp.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(temp.path().join("accuracy.png").exists());
        assert!(temp.path().join("latency.png").exists());
    }

    #[test]
    fn test_empty_results_skip_charts() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();

        let results = SweepResults {
            timestamp: "2026-08-07T00:00:00Z".to_string(),
            model: "o1-preview".to_string(),
            trials: 0,
            buckets: vec![],
            fit: None,
        };

        let files = generator.generate_all(&results, temp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_single_bucket_still_plots() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();

        let mut results = create_test_results();
        results.buckets.truncate(1);
        results.fit = None;

        let files = generator.generate_all(&results, temp.path()).unwrap();
        assert_eq!(files.len(), 2);
    }
}
