//! CLI configuration

use crate::commands::RunArgs;
use crate::error::CliResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use storeprobe::ProbeConfig;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures and summary only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// From the `-q` flag and `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default `tracing` filter when `RUST_LOG` is unset
    #[must_use]
    pub const fn log_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "storeprobe=info,warn",
            Self::Debug => "storeprobe=debug,info",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::Term::stderr().features().colors_supported(),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }
}

/// Defaults, then the YAML file if given, then the environment
pub fn load_probe_config(path: Option<&Path>) -> CliResult<ProbeConfig> {
    let config = match path {
        Some(path) => ProbeConfig::load(path)?,
        None => ProbeConfig::default(),
    };
    Ok(config.with_env())
}

/// Apply `run` flags on top of a loaded configuration
pub fn apply_run_args(mut config: ProbeConfig, args: &RunArgs) -> CliResult<ProbeConfig> {
    if let Some(base_url) = &args.base_url {
        config.base_url.clone_from(base_url);
    }
    if args.headed {
        config.driver.headless = false;
    }
    config.fail_fast |= args.fail_fast;
    config.strict |= args.strict;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(true, 3), Verbosity::Quiet);
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Debug);
        }

        #[test]
        fn test_predicates() {
            assert!(Verbosity::Quiet.is_quiet());
            assert!(!Verbosity::Normal.is_verbose());
            assert!(Verbosity::Debug.is_verbose());
        }

        #[test]
        fn test_log_directive() {
            assert_eq!(Verbosity::Normal.log_directive(), "warn");
            assert!(Verbosity::Debug.log_directive().contains("storeprobe=debug"));
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_explicit_choices() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }
    }

    mod layering_tests {
        use super::*;

        #[test]
        fn test_flags_override_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "base_url: https://staging.shop.test\nfail_fast: false").unwrap();

            let loaded = ProbeConfig::load(file.path()).unwrap();
            assert_eq!(loaded.base_url, "https://staging.shop.test");

            let args = RunArgs {
                base_url: Some("http://localhost:8080".to_string()),
                headed: true,
                fail_fast: true,
                ..RunArgs::default()
            };
            let config = apply_run_args(loaded, &args).unwrap();
            assert_eq!(config.base_url, "http://localhost:8080");
            assert!(!config.driver.headless);
            assert!(config.fail_fast);
            assert!(!config.strict);
        }

        #[test]
        fn test_unset_flags_keep_file_values() {
            let loaded = ProbeConfig::from_yaml("strict: true").unwrap();
            let config = apply_run_args(loaded, &RunArgs::default()).unwrap();
            assert!(config.strict);
            assert!(config.driver.headless);
        }

        #[test]
        fn test_invalid_base_url_rejected() {
            let args = RunArgs {
                base_url: Some(String::new()),
                ..RunArgs::default()
            };
            assert!(apply_run_args(ProbeConfig::default(), &args).is_err());
        }

        #[test]
        fn test_missing_file_is_error() {
            assert!(load_probe_config(Some(Path::new("/no/such/probe.yaml"))).is_err());
        }
    }
}
