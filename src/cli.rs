use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

use crate::agent::{build_oracle, FallbackOracle};
use crate::config::{AppConfig, OracleBackend};
use crate::error::{QuorumError, Result};
use crate::simulation::{ConsoleReporter, JsonLinesSink, MultiSink, Simulation};

#[derive(Parser)]
#[command(name = "quorum")]
#[command(version = "0.1.0")]
#[command(about = "Market simulation with an LLM fund reviewed by a risk panel", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory (default.toml, then $QUORUM_ENV)
    #[arg(short, long, default_value = "config", global = true)]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a simulation
    Run(RunArgs),
    /// Check that the oracle answers
    Probe {
        /// Model to ask (defaults to the configured one)
        #[arg(long)]
        model: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Number of steps
    #[arg(short, long)]
    pub steps: Option<u32>,
    /// Seed for reproducible runs
    #[arg(long, env = "QUORUM_SEED")]
    pub seed: Option<u64>,
    /// Oracle model identifier
    #[arg(long)]
    pub model: Option<String>,
    /// Run without a model server (every oracle call falls back to HOLD)
    #[arg(long)]
    pub offline: bool,
    /// Skip the oracle-backed general analyst
    #[arg(long)]
    pub no_general: bool,
    /// Pause between steps in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,
    /// Print snapshots to stdout as JSON lines instead of the text trace
    #[arg(long)]
    pub json: bool,
    /// Also write JSON-lines snapshots to this file (stdout output is unchanged)
    #[arg(short, long)]
    pub output: Option<String>,
}

impl RunArgs {
    /// Command-line flags win over file and environment settings
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(steps) = self.steps {
            config.simulation.steps = steps;
        }
        if self.seed.is_some() {
            config.simulation.seed = self.seed;
        }
        if let Some(model) = &self.model {
            config.oracle.model = model.clone();
        }
        if self.offline {
            config.oracle.backend = OracleBackend::Offline;
        }
        if self.no_general {
            config.research.general_analyst = false;
        }
        if let Some(delay) = self.delay_ms {
            config.simulation.step_delay_ms = delay;
        }
    }
}

/// Sinks for a run: stdout gets the text trace, or JSON lines with `--json`;
/// `--output` adds a JSON-lines file.
pub fn output_sink(args: &RunArgs) -> Result<MultiSink> {
    let mut sink = MultiSink::new();
    if args.json {
        sink.push(Box::new(JsonLinesSink::new(std::io::stdout())));
    } else {
        sink.push(Box::new(ConsoleReporter::stdout()));
    }
    if let Some(path) = &args.output {
        let file = File::create(path)?;
        sink.push(Box::new(JsonLinesSink::new(BufWriter::new(file))));
    }
    Ok(sink)
}

pub async fn run_simulation(mut config: AppConfig, args: &RunArgs) -> Result<()> {
    args.apply(&mut config);
    config.validate().map_err(QuorumError::InvalidConfig)?;

    let oracle = FallbackOracle::new(build_oracle(&config.oracle)?, config.oracle.model.clone());
    let mut sim = Simulation::new(
        config.simulation.clone(),
        oracle,
        config.research.general_analyst,
    );

    let mut sink = output_sink(args)?;

    info!(
        run_id = %sim.run_id(),
        steps = config.simulation.steps,
        backend = ?config.oracle.backend,
        model = %config.oracle.model,
        "Starting simulation"
    );
    sim.run_with(config.simulation.steps, &mut sink).await?;
    Ok(())
}

/// Connectivity check
pub async fn probe(config: &AppConfig, model: Option<&str>) -> Result<()> {
    let model = model.unwrap_or(&config.oracle.model);
    let oracle = build_oracle(&config.oracle)?;
    let reply = oracle
        .generate("Say YES if you receive this message.", model)
        .await?;
    println!("{}", reply);
    Ok(())
}

pub fn show_config(config: &AppConfig) -> Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
