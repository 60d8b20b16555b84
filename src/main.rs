//! SMOTEWB - Main Entry Point

use clap::Parser;
use smotewb::cli::{cmd_inspect, cmd_resample, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging on stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smotewb=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resample { data, target, output, separator, sampler, json } => {
            cmd_resample(&data, &target, &output, separator, &sampler, json)?;
        }
        Commands::Inspect { data, target, separator, sampler, json } => {
            cmd_inspect(&data, &target, separator, &sampler, json)?;
        }
    }

    Ok(())
}
