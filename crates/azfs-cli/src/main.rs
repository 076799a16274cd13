use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::Level;

use azfs_sdk::AzFs;

mod cli;
mod commands;
mod config;
mod render;

use config::ClientConfig;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let config = match ClientConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => match err.into_usage_error() {
            Ok(usage) => usage.exit(),
            Err(err) => return report(err.into()),
        },
    };

    match run(&config, cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn report(err: anyhow::Error) -> ExitCode {
    eprintln!("{} {err:#}", "error:".red().bold());
    ExitCode::FAILURE
}

fn run(config: &ClientConfig, cli: cli::Cli) -> anyhow::Result<()> {
    let fs = AzFs::new(config.connect()?);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run_command(&fs, cli.command, cli.format, &mut out)?;
    out.flush()?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
