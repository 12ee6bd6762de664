//! Swagcheck CLI: end-to-end checks for the Swag Labs store
//!
//! ## Usage
//!
//! ```bash
//! swagcheck run                           # Every suite against the sim driver
//! swagcheck run --suite login             # One suite
//! swagcheck run --driver chromium --headed
//! swagcheck run --format json > report.json
//! swagcheck list --elements               # Suites, cases and page selectors
//! ```

use clap::Parser;
use std::process::ExitCode;
use swagcheck::logging;
use swagcheck_cli::{
    catalog_lines, select_suites, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands,
    ListArgs, OutputFormat, RunArgs, ScenarioRunner, Verbosity,
};

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run() -> CliResult<bool> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    let _ = logging::init(verbosity.log_level(), cli.log_format.into());

    match cli.command {
        Commands::Run(args) => run_suites(build_config(verbosity, color, &args), &args),
        Commands::List(args) => {
            list(&args)?;
            Ok(true)
        }
    }
}

fn build_config(verbosity: Verbosity, color: ColorChoice, args: &RunArgs) -> CliConfig {
    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_format(args.format.into())
        .with_driver(args.driver.into())
        .with_headless(!args.headed)
        .with_sandbox(!args.no_sandbox)
        .with_chromium_path(args.chromium_path.clone())
        .with_fixtures_dir(args.fixtures.clone())
        .with_base_url(args.base_url.clone())
        .with_api_url(args.api_url.clone())
        .with_fail_fast(args.fail_fast)
        .with_timeout_ms(args.timeout)
}

fn run_suites(config: CliConfig, args: &RunArgs) -> CliResult<bool> {
    let suites = select_suites(args.suite, &config)?;
    let format = config.format;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::test_execution(format!("Failed to create runtime: {e}")))?;
    let mut runner = ScenarioRunner::new(config);
    let report = rt.block_on(runner.run(&suites))?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(report.all_passed())
}

fn list(args: &ListArgs) -> CliResult<()> {
    for line in catalog_lines(args.elements)? {
        println!("{line}");
    }
    Ok(())
}
