//! Subcommand implementations

use crate::commands::{ConfigArgs, ListArgs, RunArgs};
use crate::config::{apply_run_args, load_probe_config, CliConfig};
use crate::error::{CliError, CliResult};
use crate::output::{render_listing, ProgressReporter};
use std::sync::Arc;
use storeprobe::{catalog, CaseFilter, DriverFactory, ProbeConfig, Suite, SuiteRunner};
use tracing::info;

fn build_filter(suites: &[String], pattern: Option<&str>, known_defects: bool) -> CaseFilter {
    let mut filter = suites
        .iter()
        .fold(CaseFilter::new(), |filter, name| filter.suite(name.as_str()))
        .known_defects(known_defects);
    if let Some(pattern) = pattern {
        filter = filter.pattern(pattern);
    }
    filter
}

fn check_suites(filter: &CaseFilter, suites: &[Suite]) -> CliResult<()> {
    let unknown = filter.unknown_suites(suites);
    if unknown.is_empty() {
        return Ok(());
    }
    let known: Vec<&str> = suites.iter().map(|s| s.name).collect();
    Err(CliError::invalid_argument(format!(
        "unknown suite(s): {} (available: {})",
        unknown.join(", "),
        known.join(", ")
    )))
}

/// `storeprobe list`
pub fn list(args: &ListArgs) -> CliResult<String> {
    let suites = catalog();
    let filter = build_filter(&args.suite, None, args.known_defects);
    check_suites(&filter, &suites)?;
    Ok(render_listing(&suites, &filter))
}

/// `storeprobe config`
pub fn config(args: &ConfigArgs) -> CliResult<String> {
    let config = load_probe_config(args.config.as_deref())?;
    config.validate()?;
    Ok(config.to_yaml()?)
}

/// `storeprobe run`
pub async fn run(cli: CliConfig, args: &RunArgs) -> CliResult<()> {
    let config = apply_run_args(load_probe_config(args.config.as_deref())?, args)?;
    let suites = catalog();
    let filter = build_filter(&args.suite, args.filter.as_deref(), args.known_defects);
    check_suites(&filter, &suites)?;
    let factory = browser_factory(&config)?;
    execute(factory, &config, &suites, &filter, cli, args.json).await
}

#[cfg(feature = "browser")]
fn browser_factory(config: &ProbeConfig) -> CliResult<Arc<dyn DriverFactory>> {
    Ok(Arc::new(storeprobe::ChromiumFactory::new(config.driver.clone())))
}

#[cfg(not(feature = "browser"))]
fn browser_factory(_config: &ProbeConfig) -> CliResult<Arc<dyn DriverFactory>> {
    Err(CliError::config(
        "browser support not enabled. Rebuild with --features browser",
    ))
}

/// Run the selected cases with any driver factory and report them
pub async fn execute(
    factory: Arc<dyn DriverFactory>,
    config: &ProbeConfig,
    suites: &[Suite],
    filter: &CaseFilter,
    cli: CliConfig,
    json: bool,
) -> CliResult<()> {
    let reporter = ProgressReporter::new(cli.color.should_color(), cli.verbosity.is_quiet());
    if filter.apply(suites).is_empty() {
        reporter.warning("no cases selected");
    }
    info!(base_url = %config.base_url, headless = config.driver.headless, "starting run");

    let runner = SuiteRunner::from_config(factory, config);
    let summary = runner
        .run_with_progress(suites, filter, |result| reporter.case_finished(result))
        .await;
    reporter.summary(&summary, config.strict);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    if summary.succeeded(config.strict) {
        Ok(())
    } else {
        Err(CliError::RunFailed {
            failed: summary.failures(config.strict).len(),
        })
    }
}
