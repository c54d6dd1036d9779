//! @ai:module:intent Configuration structs for the benchmark harness
//! @ai:module:layer infrastructure
//! @ai:module:public_api BenchmarkConfig, ApiConfig, SweepConfig, PathConfig
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Main configuration for the benchmark harness
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    pub api: ApiConfig,
    pub sweep: SweepConfig,
    pub paths: PathConfig,
}

/// @ai:intent API configuration for the completion client
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// @ai:intent Token budget sweep configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default = "default_budget_min")]
    pub budget_min: u32,
    #[serde(default = "default_budget_max")]
    pub budget_max: u32,
    #[serde(default = "default_budget_step")]
    pub budget_step: u32,
    #[serde(default = "default_trials")]
    pub trials: u32,
    #[serde(default)]
    pub dry_run: bool,
}

/// @ai:intent Path configuration for input/output directories
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub probes_dir: PathBuf,
    pub results_dir: PathBuf,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            sweep: SweepConfig::default(),
            paths: PathConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            budget_min: default_budget_min(),
            budget_max: default_budget_max(),
            budget_step: default_budget_step(),
            trials: default_trials(),
            dry_run: false,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            probes_dir: PathBuf::from("probes"),
            results_dir: PathBuf::from("results"),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "o1-preview".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_budget_min() -> u32 {
    100
}

fn default_budget_max() -> u32 {
    5000
}

fn default_budget_step() -> u32 {
    100
}

fn default_trials() -> u32 {
    10
}

impl BenchmarkConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.sweep.validate()?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl SweepConfig {
    /// @ai:intent Check the sweep grid is well-formed
    /// @ai:effects pure
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.budget_step == 0 {
            anyhow::bail!("budget_step must be greater than zero");
        }

        if self.budget_min == 0 {
            anyhow::bail!("budget_min must be greater than zero");
        }

        if self.budget_min > self.budget_max {
            anyhow::bail!(
                "budget_min ({}) exceeds budget_max ({})",
                self.budget_min,
                self.budget_max
            );
        }

        if self.trials == 0 {
            anyhow::bail!("trials must be greater than zero");
        }

        Ok(())
    }

    /// @ai:intent Enumerate token budgets in the sweep, smallest first
    /// @ai:effects pure
    pub fn budgets(&self) -> Vec<u32> {
        (self.budget_min..=self.budget_max)
            .step_by(self.budget_step as usize)
            .collect()
    }

    /// @ai:intent Total number of API calls the sweep will issue
    /// @ai:effects pure
    pub fn total_calls(&self) -> usize {
        self.budgets().len() * self.trials as usize
    }
}
