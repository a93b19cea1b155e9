//! storeprobe: resilient end-to-end checks for the demo storefront
//!
//! ## Usage
//!
//! ```bash
//! storeprobe list --known-defects          # Show the catalogue
//! storeprobe run --suite login             # Run one suite headless
//! storeprobe run --headed --fail-fast      # Watch it, stop at first failure
//! storeprobe config --config probe.yaml    # Show effective configuration
//! ```

use clap::Parser;
use std::process::ExitCode;
use storeprobe_cli::{handlers, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, Verbosity};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config);

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
}

/// `RUST_LOG` wins; otherwise the level follows `-q`/`-v`
fn init_tracing(config: CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false)
        .try_init();
}

fn run(cli: Cli, config: CliConfig) -> CliResult<()> {
    match cli.command {
        Commands::List(args) => {
            print!("{}", handlers::list(&args)?);
            Ok(())
        }
        Commands::Config(args) => {
            print!("{}", handlers::config(&args)?);
            Ok(())
        }
        Commands::Run(args) => {
            let runtime = tokio::runtime::Runtime::new()
                .map_err(|e| CliError::config(format!("cannot start async runtime: {e}")))?;
            runtime.block_on(handlers::run(config, &args))
        }
    }
}
