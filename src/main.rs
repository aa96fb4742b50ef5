use clap::Parser;
use quorum::cli::{self, Cli, Commands, RunArgs};
use quorum::config::AppConfig;
use quorum::error::Result;
use quorum::logging::{init_logging, init_logging_simple};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Validation happens per command, after flag overrides
    let config = match AppConfig::load_from(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging_simple();
            error!("Failed to load config: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Some(Commands::Run(args)) => {
            let _guard = init_logging(&config.logging);
            cli::run_simulation(config, &args).await?;
        }
        Some(Commands::Probe { model }) => {
            init_logging_simple();
            cli::probe(&config, model.as_deref()).await?;
        }
        Some(Commands::Config) => {
            init_logging_simple();
            cli::show_config(&config)?;
        }
        None => {
            // Default: a run with the configured settings
            let _guard = init_logging(&config.logging);
            cli::run_simulation(config, &RunArgs::default()).await?;
        }
    }

    Ok(())
}
