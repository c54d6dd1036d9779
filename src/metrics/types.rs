//! @ai:module:intent Result types for bucketed sweep statistics
//! @ai:module:layer domain
//! @ai:module:public_api BudgetStats, FitLine, SweepResults
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Aggregated statistics for one token budget bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStats {
    pub max_tokens: u32,
    pub trial_count: u32,
    /// Fraction of trials graded correct, 0..=1
    pub accuracy: f64,
    pub avg_reasoning_tokens: f64,
    pub avg_latency: f64,
    /// Total reasoning tokens over total wall time in the bucket
    pub reasoning_tokens_per_sec: f64,
}

/// @ai:intent Least-squares line of accuracy against avg reasoning tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FitLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl FitLine {
    /// @ai:intent Fit a least-squares line through (x, y) points
    ///
    /// Returns None with fewer than two points or zero variance in x.
    /// @ai:effects pure
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut syy = 0.0;
        let mut sxy = 0.0;

        for (x, y) in points {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        // Constant y is fitted exactly by the horizontal line
        let r_squared = if syy == 0.0 {
            1.0
        } else {
            (sxy * sxy) / (sxx * syy)
        };

        Some(Self {
            slope,
            intercept,
            r_squared,
        })
    }

    /// @ai:intent Evaluate the fitted line at x
    /// @ai:effects pure
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// @ai:intent Complete bucketed results for one sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResults {
    pub timestamp: String,
    pub model: String,
    pub trials: u32,
    /// Buckets sorted ascending by max_tokens
    pub buckets: Vec<BudgetStats>,
    #[serde(default)]
    pub fit: Option<FitLine>,
}
