//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// storeprobe: resilient end-to-end checks for the demo storefront
#[derive(Parser, Debug)]
#[command(name = "storeprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only failures and the summary)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List suites and cases
    List(ListArgs),

    /// Run cases against the storefront in a browser
    Run(RunArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the list command
#[derive(Parser, Debug, Default)]
pub struct ListArgs {
    /// Only this suite (repeatable)
    #[arg(short, long)]
    pub suite: Vec<String>,

    /// Include known-defect cases
    #[arg(long)]
    pub known_defects: bool,
}

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Only this suite (repeatable)
    #[arg(short, long)]
    pub suite: Vec<String>,

    /// Only cases whose id or name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Include known-defect cases
    #[arg(long)]
    pub known_defects: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Storefront root URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Stop after the first failed case
    #[arg(long)]
    pub fail_fast: bool,

    /// Fail the run when a known defect no longer reproduces
    #[arg(long)]
    pub strict: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug, Default)]
pub struct ConfigArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Color choice argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_list() {
            let cli = Cli::parse_from(["storeprobe", "list", "--suite", "cart"]);
            if let Commands::List(args) = cli.command {
                assert_eq!(args.suite, ["cart"]);
                assert!(!args.known_defects);
            } else {
                panic!("expected List command");
            }
        }

        #[test]
        fn test_parse_run_flags() {
            let cli = Cli::parse_from([
                "storeprobe",
                "run",
                "-s",
                "login",
                "-s",
                "contact",
                "--filter",
                "submit",
                "--known-defects",
                "--headed",
                "--base-url",
                "http://localhost:8080",
                "--fail-fast",
                "--strict",
                "--json",
            ]);
            if let Commands::Run(args) = cli.command {
                assert_eq!(args.suite, ["login", "contact"]);
                assert_eq!(args.filter.as_deref(), Some("submit"));
                assert!(args.known_defects);
                assert!(args.headed);
                assert_eq!(args.base_url.as_deref(), Some("http://localhost:8080"));
                assert!(args.fail_fast && args.strict && args.json);
            } else {
                panic!("expected Run command");
            }
        }

        #[test]
        fn test_parse_run_defaults() {
            let cli = Cli::parse_from(["storeprobe", "run"]);
            if let Commands::Run(args) = cli.command {
                assert!(args.suite.is_empty());
                assert!(args.config.is_none());
                assert!(!args.headed);
            } else {
                panic!("expected Run command");
            }
        }

        #[test]
        fn test_parse_config_path() {
            let cli = Cli::parse_from(["storeprobe", "config", "-c", "probe.yaml"]);
            if let Commands::Config(args) = cli.command {
                assert_eq!(args.config, Some(PathBuf::from("probe.yaml")));
            } else {
                panic!("expected Config command");
            }
        }

        #[test]
        fn test_global_flags() {
            let cli = Cli::parse_from(["storeprobe", "-vv", "list", "--color", "never"]);
            assert_eq!(cli.verbose, 2);
            assert!(matches!(cli.color, ColorArg::Never));
        }

        #[test]
        fn test_subcommand_required() {
            assert!(Cli::try_parse_from(["storeprobe"]).is_err());
        }
    }
}
