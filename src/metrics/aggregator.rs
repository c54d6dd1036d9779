//! @ai:module:intent Bucketed aggregation of trial records
//! @ai:module:layer application
//! @ai:module:public_api MetricsAggregator
//! @ai:module:stateless true

use crate::metrics::types::{BudgetStats, FitLine, SweepResults};
use crate::record::TrialRecord;
use std::collections::BTreeMap;

/// @ai:intent Trait for metrics aggregation
pub trait MetricsAggregatorTrait: Send + Sync {
    /// @ai:intent Bucket trial records by budget and compute sweep results
    fn aggregate(&self, records: &[TrialRecord], model: &str, trials: u32) -> SweepResults;
}

/// @ai:intent Aggregates trial records into per-budget statistics
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// @ai:intent Create a new metrics aggregator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Compute statistics for one budget bucket
    /// @ai:pre records is non-empty and shares one max_tokens value
    /// @ai:effects pure
    fn bucket_stats(max_tokens: u32, records: &[&TrialRecord]) -> BudgetStats {
        let trial_count = records.len() as u32;

        let correct = records.iter().filter(|r| r.is_correct).count();
        let accuracy = correct as f64 / trial_count as f64;

        let avg_reasoning_tokens = average(records.iter().map(|r| r.reasoning_tokens as f64));
        let avg_latency = average(records.iter().map(|r| r.latency));

        let total_reasoning: f64 = records.iter().map(|r| r.reasoning_tokens as f64).sum();
        let total_latency: f64 = records.iter().map(|r| r.latency).sum();

        let reasoning_tokens_per_sec = if total_latency > 0.0 {
            total_reasoning / total_latency
        } else {
            0.0
        };

        BudgetStats {
            max_tokens,
            trial_count,
            accuracy,
            avg_reasoning_tokens,
            avg_latency,
            reasoning_tokens_per_sec,
        }
    }

    /// @ai:intent Group records by their token budget, ascending
    /// @ai:effects pure
    fn bucket_by_budget(records: &[TrialRecord]) -> BTreeMap<u32, Vec<&TrialRecord>> {
        let mut buckets: BTreeMap<u32, Vec<&TrialRecord>> = BTreeMap::new();

        for record in records {
            buckets.entry(record.max_tokens).or_default().push(record);
        }

        buckets
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// @ai:intent Calculate average of an iterator of f64
/// @ai:effects pure
fn average<I: Iterator<Item = f64>>(iter: I) -> f64 {
    let (sum, count) = iter.fold((0.0, 0u32), |(s, c), v| (s + v, c + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl MetricsAggregatorTrait for MetricsAggregator {
    /// @ai:intent Bucket trial records by budget and compute sweep results
    /// @ai:effects pure
    fn aggregate(&self, records: &[TrialRecord], model: &str, trials: u32) -> SweepResults {
        let buckets: Vec<BudgetStats> = Self::bucket_by_budget(records)
            .into_iter()
            .map(|(max_tokens, bucket)| Self::bucket_stats(max_tokens, &bucket))
            .collect();

        let points: Vec<(f64, f64)> = buckets
            .iter()
            .map(|b| (b.avg_reasoning_tokens, b.accuracy))
            .collect();

        let fit = FitLine::fit(&points);

        SweepResults {
            timestamp: chrono::Utc::now().to_rfc3339(),
            model: model.to_string(),
            trials,
            buckets,
            fit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(max_tokens: u32, correct: bool, reasoning: u32, latency: f64) -> TrialRecord {
        TrialRecord {
            max_tokens,
            response: String::new(),
            is_correct: correct,
            input_tokens: 30,
            output_tokens: reasoning + 8,
            reasoning_tokens: reasoning,
            total_tokens: 38 + reasoning,
            latency,
        }
    }

    #[test]
    fn test_average() {
        let values = vec![10.0, 20.0, 30.0];
        assert!((average(values.into_iter()) - 20.0).abs() < 0.01);
    }

    #[test]
    fn test_average_empty() {
        let values: Vec<f64> = vec![];
        assert!((average(values.into_iter()) - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_buckets_sorted_by_budget() {
        let records = vec![
            record(500, true, 400, 5.0),
            record(100, false, 90, 1.0),
            record(300, true, 250, 3.0),
        ];

        let results = MetricsAggregator::new().aggregate(&records, "o1-preview", 1);

        let budgets: Vec<u32> = results.buckets.iter().map(|b| b.max_tokens).collect();
        assert_eq!(budgets, vec![100, 300, 500]);
    }

    #[test]
    fn test_bucket_accuracy_and_averages() {
        let records = vec![
            record(200, true, 100, 2.0),
            record(200, false, 180, 4.0),
            record(200, true, 140, 3.0),
            record(200, false, 60, 1.0),
        ];

        let results = MetricsAggregator::new().aggregate(&records, "o1-preview", 4);

        assert_eq!(results.buckets.len(), 1);
        let bucket = &results.buckets[0];

        assert_eq!(bucket.trial_count, 4);
        assert!((bucket.accuracy - 0.5).abs() < 1e-9);
        assert!((bucket.avg_reasoning_tokens - 120.0).abs() < 1e-9);
        assert!((bucket.avg_latency - 2.5).abs() < 1e-9);
        // 480 reasoning tokens over 10 seconds of wall time
        assert!((bucket.reasoning_tokens_per_sec - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_present_with_multiple_buckets() {
        let mut records = Vec::new();

        // Accuracy climbs with reasoning tokens
        for (budget, reasoning, correct) in
            [(100u32, 80u32, false), (300, 250, true), (500, 420, true)]
        {
            records.push(record(budget, correct, reasoning, 1.0));
        }

        let results = MetricsAggregator::new().aggregate(&records, "o1-preview", 1);
        let fit = results.fit.unwrap();
        assert!(fit.slope > 0.0);
    }

    #[test]
    fn test_no_fit_with_single_bucket() {
        let records = vec![record(100, true, 90, 1.0), record(100, false, 80, 1.0)];

        let results = MetricsAggregator::new().aggregate(&records, "o1-preview", 2);
        assert!(results.fit.is_none());
    }

    #[test]
    fn test_empty_records_empty_buckets() {
        let results = MetricsAggregator::new().aggregate(&[], "o1-preview", 0);
        assert!(results.buckets.is_empty());
        assert!(results.fit.is_none());
    }
}
