//! @ai:module:intent Sweep execution: fire the budget grid and collect records
//! @ai:module:layer application
//! @ai:module:public_api SweepExecutor
//! @ai:module:stateless false

use crate::config::SweepConfig;
use crate::probe::Probe;
use crate::record::TrialRecord;
use crate::runner::client::CompletionClientTrait;
use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;

/// @ai:intent Executes a token budget sweep against the completion client
pub struct SweepExecutor<C: CompletionClientTrait> {
    client: Arc<C>,
    probe: Probe,
    sweep: SweepConfig,
}

impl<C: CompletionClientTrait> SweepExecutor<C> {
    /// @ai:intent Create a new sweep executor
    /// @ai:effects pure
    pub fn new(client: Arc<C>, probe: Probe, sweep: SweepConfig) -> Self {
        Self {
            client,
            probe,
            sweep,
        }
    }

    /// @ai:intent Expand the sweep into one entry per (budget, trial)
    /// @ai:effects pure
    fn build_grid(&self) -> Vec<u32> {
        self.sweep
            .budgets()
            .into_iter()
            .flat_map(|budget| std::iter::repeat(budget).take(self.sweep.trials as usize))
            .collect()
    }

    /// @ai:intent Issue a single timed call and grade the reply
    /// @ai:effects network, time
    async fn execute_once(&self, max_tokens: u32) -> Result<TrialRecord> {
        let start = Instant::now();
        let response = self.client.complete(&self.probe.prompt, max_tokens).await?;
        let latency = start.elapsed();

        let is_correct = self.probe.grade(&response.content);

        Ok(TrialRecord {
            max_tokens,
            response: response.content,
            is_correct,
            input_tokens: response.input_tokens,
            output_tokens: response.output_tokens,
            reasoning_tokens: response.reasoning_tokens,
            total_tokens: response.total_tokens,
            latency: latency.as_secs_f64(),
        })
    }

    /// @ai:intent Issue every call in the grid at once and await them all
    ///
    /// A failed call drops that trial with a warning; the sweep continues.
    /// @ai:effects network, time
    pub async fn execute_sweep(&self) -> Result<Vec<TrialRecord>> {
        let grid = self.build_grid();

        tracing::info!(
            "Issuing {} calls ({} budgets x {} trials)",
            grid.len(),
            self.sweep.budgets().len(),
            self.sweep.trials
        );

        let calls = grid.iter().map(|&budget| self.execute_once(budget));
        let outcomes = join_all(calls).await;

        let mut records = Vec::with_capacity(grid.len());

        for (budget, outcome) in grid.iter().zip(outcomes) {
            match outcome {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Trial at budget {} failed: {}", budget, e);
                }
            }
        }

        tracing::info!(
            "Sweep complete: {} of {} trials recorded",
            records.len(),
            grid.len()
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use crate::runner::client::MockCompletionClient;

    fn small_sweep() -> SweepConfig {
        SweepConfig {
            budget_min: 100,
            budget_max: 300,
            budget_step: 100,
            trials: 2,
            dry_run: false,
        }
    }

    #[test]
    fn test_grid_repeats_each_budget_per_trial() {
        let client = Arc::new(MockCompletionClient::new("9.8".to_string(), 50));
        let executor = SweepExecutor::new(client, Probe::builtin(), small_sweep());

        let grid = executor.build_grid();
        assert_eq!(grid, vec![100, 100, 200, 200, 300, 300]);
    }

    #[tokio::test]
    async fn test_sweep_records_every_trial() {
        let client = Arc::new(MockCompletionClient::new("9.8".to_string(), 50));
        let executor = SweepExecutor::new(client, Probe::builtin(), small_sweep());

        let records = executor.execute_sweep().await.unwrap();
        assert_eq!(records.len(), 6);

        assert!(records.iter().all(|r| r.is_correct));
        assert!(records.iter().all(|r| r.latency >= 0.0));
        assert_eq!(records[0].max_tokens, 100);
        assert_eq!(records[5].max_tokens, 300);
    }

    #[tokio::test]
    async fn test_sweep_grades_wrong_answer() {
        let client = Arc::new(MockCompletionClient::new("9.11".to_string(), 50));
        let executor = SweepExecutor::new(client, Probe::builtin(), small_sweep());

        let records = executor.execute_sweep().await.unwrap();
        assert!(records.iter().all(|r| !r.is_correct));
    }

    #[tokio::test]
    async fn test_token_accounting_propagates() {
        let client = Arc::new(MockCompletionClient::new("9.8".to_string(), 150));
        let executor = SweepExecutor::new(client, Probe::builtin(), small_sweep());

        let records = executor.execute_sweep().await.unwrap();

        // Mock caps reasoning tokens at the budget
        let low: Vec<_> = records.iter().filter(|r| r.max_tokens == 100).collect();
        let high: Vec<_> = records.iter().filter(|r| r.max_tokens == 300).collect();

        assert!(low.iter().all(|r| r.reasoning_tokens == 100));
        assert!(high.iter().all(|r| r.reasoning_tokens == 150));
        assert!(records
            .iter()
            .all(|r| r.total_tokens == r.input_tokens + r.output_tokens));
    }
}
