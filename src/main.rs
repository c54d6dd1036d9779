//! @ai:module:intent CLI for the reasoning budget benchmark
//! @ai:module:layer presentation

use anyhow::Result;
use clap::{Parser, Subcommand};
use reasoning_bench::{
    config::BenchmarkConfig,
    metrics::{MetricsAggregator, MetricsAggregatorTrait, SweepResults},
    probe::{Probe, ProbeLoader, ProbeLoaderTrait},
    record,
    report::ReportGenerator,
    runner::{CompletionClientTrait, MockCompletionClient, OpenAiClient, SweepExecutor},
    TrialRecord,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "reasoning-bench")]
#[command(about = "Measure reasoning accuracy and latency across completion token budgets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a token budget sweep
    Run {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Probe ID from the probes directory (built-in probe if omitted)
        #[arg(long)]
        probe: Option<String>,

        /// Trials per budget
        #[arg(short, long)]
        trials: Option<u32>,

        /// Smallest token budget
        #[arg(long)]
        budget_min: Option<u32>,

        /// Largest token budget
        #[arg(long)]
        budget_max: Option<u32>,

        /// Budget step
        #[arg(long)]
        budget_step: Option<u32>,

        /// Run without making API calls
        #[arg(long)]
        dry_run: bool,

        /// Output directory for results
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print bucketed statistics for an existing CSV
    Analyze {
        /// Path to results CSV file
        #[arg(short, long)]
        results: PathBuf,

        /// Model name shown in the summary
        #[arg(long)]
        model: Option<String>,
    },

    /// Regenerate reports from an existing CSV
    Report {
        /// Path to results CSV file
        #[arg(short, long)]
        results: PathBuf,

        /// Output directory for reports
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,

        /// Model name shown in the reports
        #[arg(long)]
        model: Option<String>,
    },

    /// List available probes
    Probes {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = "reasoning-bench.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reasoning_bench=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            probe,
            trials,
            budget_min,
            budget_max,
            budget_step,
            dry_run,
            output,
        } => {
            run_sweep(RunArgs {
                config,
                probe,
                trials,
                budget_min,
                budget_max,
                budget_step,
                dry_run,
                output,
            })
            .await
        }
        Commands::Analyze { results, model } => analyze(results, model),
        Commands::Report {
            results,
            output,
            model,
        } => generate_reports(results, output, model),
        Commands::Probes { config } => list_probes(config),
        Commands::Init { output } => init_config(output),
    }
}

struct RunArgs {
    config: Option<PathBuf>,
    probe: Option<String>,
    trials: Option<u32>,
    budget_min: Option<u32>,
    budget_max: Option<u32>,
    budget_step: Option<u32>,
    dry_run: bool,
    output: Option<PathBuf>,
}

/// @ai:intent Run the budget sweep end to end
/// @ai:effects network, fs:write
async fn run_sweep(args: RunArgs) -> Result<()> {
    let mut config = load_or_default_config(args.config)?;

    if let Some(trials) = args.trials {
        config.sweep.trials = trials;
    }
    if let Some(min) = args.budget_min {
        config.sweep.budget_min = min;
    }
    if let Some(max) = args.budget_max {
        config.sweep.budget_max = max;
    }
    if let Some(step) = args.budget_step {
        config.sweep.budget_step = step;
    }
    config.sweep.dry_run = args.dry_run;
    config.sweep.validate()?;

    let probe = resolve_probe(&config, args.probe)?;

    tracing::info!(
        "Probe '{}': {} budgets x {} trials against {}",
        probe.id,
        config.sweep.budgets().len(),
        config.sweep.trials,
        config.api.model
    );

    let results_root = args.output.unwrap_or_else(|| config.paths.results_dir.clone());
    let timestamp = chrono::Utc::now().format("%Y-%m-%d_%H-%M-%S");
    let output_dir = results_root.join(timestamp.to_string());
    std::fs::create_dir_all(&output_dir)?;
    tracing::info!("Output directory: {}", output_dir.display());

    let records = if config.sweep.dry_run {
        tracing::info!("Running in dry-run mode");
        let client = Arc::new(MockCompletionClient::new(probe.expected.clone(), 128));
        execute_sweep(client, probe.clone(), &config).await?
    } else {
        let client = Arc::new(OpenAiClient::new(config.api.clone())?);
        execute_sweep(client, probe.clone(), &config).await?
    };

    if records.is_empty() {
        tracing::warn!("No trials completed, nothing to report");
        return Ok(());
    }

    let csv_path = output_dir.join("results.csv");
    record::write_csv(&records, &csv_path)?;
    tracing::info!("Raw records saved to {}", csv_path.display());

    let aggregator = MetricsAggregator::new();
    let results = aggregator.aggregate(&records, &config.api.model, config.sweep.trials);

    let reporter = ReportGenerator::new();
    reporter.generate_all(&results, &output_dir)?;

    print_summary(&results);

    Ok(())
}

/// @ai:intent Execute the sweep with the given client
/// @ai:effects network
async fn execute_sweep<C: CompletionClientTrait>(
    client: Arc<C>,
    probe: Probe,
    config: &BenchmarkConfig,
) -> Result<Vec<TrialRecord>> {
    let executor = SweepExecutor::new(client, probe, config.sweep.clone());
    executor.execute_sweep().await
}

/// @ai:intent Resolve the probe to run: named from disk, or built-in
/// @ai:effects fs:read
fn resolve_probe(config: &BenchmarkConfig, probe_id: Option<String>) -> Result<Probe> {
    match probe_id {
        Some(id) => {
            let loader = ProbeLoader::new();

            match loader.load_by_id(&config.paths.probes_dir, &id)? {
                Some(probe) => Ok(probe),
                None => anyhow::bail!(
                    "Probe '{}' not found in {}",
                    id,
                    config.paths.probes_dir.display()
                ),
            }
        }
        None => Ok(Probe::builtin()),
    }
}

/// @ai:intent Print bucketed statistics for an existing CSV
/// @ai:effects fs:read
fn analyze(results_path: PathBuf, model: Option<String>) -> Result<()> {
    let results = aggregate_csv(&results_path, model)?;
    print_summary(&results);
    Ok(())
}

/// @ai:intent Regenerate reports from an existing CSV
/// @ai:effects fs:read, fs:write
fn generate_reports(results_path: PathBuf, output_dir: PathBuf, model: Option<String>) -> Result<()> {
    let results = aggregate_csv(&results_path, model)?;

    let reporter = ReportGenerator::new();
    reporter.generate_all(&results, &output_dir)?;

    println!("Reports generated in {}", output_dir.display());
    Ok(())
}

/// @ai:intent Read a CSV and bucket it into sweep results
/// @ai:effects fs:read
fn aggregate_csv(results_path: &std::path::Path, model: Option<String>) -> Result<SweepResults> {
    let records = record::read_csv(results_path)?;

    if records.is_empty() {
        anyhow::bail!("No records in {}", results_path.display());
    }

    let model = model.unwrap_or_else(|| "unknown".to_string());
    let aggregator = MetricsAggregator::new();
    let mut results = aggregator.aggregate(&records, &model, 0);

    // Trials were not persisted in the CSV, recover from bucket sizes
    results.trials = results
        .buckets
        .iter()
        .map(|b| b.trial_count)
        .max()
        .unwrap_or(0);

    Ok(results)
}

/// @ai:intent List available probes
/// @ai:effects fs:read
fn list_probes(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config_path)?;
    let loader = ProbeLoader::new();

    let mut probes = vec![Probe::builtin()];

    if config.paths.probes_dir.exists() {
        probes.extend(loader.load_all(&config.paths.probes_dir)?);
    }

    println!("Available probes ({}):", probes.len());
    println!();
    println!("{:<25} {:<10} {:<20}", "ID", "Match", "Expected");
    println!("{}", "-".repeat(60));

    for probe in &probes {
        println!(
            "{:<25} {:<10} {:<20}",
            probe.id,
            probe.match_mode.as_str(),
            probe.expected
        );
    }

    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<()> {
    let config = BenchmarkConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<PathBuf>) -> Result<BenchmarkConfig> {
    match path {
        Some(p) => BenchmarkConfig::load(&p),
        None => {
            let default_path = PathBuf::from("reasoning-bench.toml");

            if default_path.exists() {
                BenchmarkConfig::load(&default_path)
            } else {
                Ok(BenchmarkConfig::default())
            }
        }
    }
}

/// @ai:intent Print summary table to console
/// @ai:effects io
fn print_summary(results: &SweepResults) {
    println!();
    println!("Reasoning Budget Sweep Results");
    println!("==============================");
    println!();
    println!("Model: {}", results.model);
    println!();
    println!(
        "{:<10} {:>8} {:>10} {:>16} {:>14} {:>12}",
        "Budget", "Trials", "Accuracy", "Avg Reasoning", "Avg Latency", "Reason Tok/s"
    );
    println!("{}", "-".repeat(75));

    for bucket in &results.buckets {
        println!(
            "{:<10} {:>8} {:>9.1}% {:>16.1} {:>13.2}s {:>12.1}",
            bucket.max_tokens,
            bucket.trial_count,
            bucket.accuracy * 100.0,
            bucket.avg_reasoning_tokens,
            bucket.avg_latency,
            bucket.reasoning_tokens_per_sec
        );
    }

    println!();

    match results.fit {
        Some(fit) => {
            println!(
                "Fit: accuracy = {:.6} * reasoning_tokens + {:.4} (r^2 = {:.3})",
                fit.slope, fit.intercept, fit.r_squared
            );
        }
        None => {
            println!("Fit: not enough distinct buckets");
        }
    }

    println!();
}
