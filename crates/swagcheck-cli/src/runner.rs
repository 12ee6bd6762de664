//! Suite selection and execution

use crate::commands::SuiteArg;
use crate::config::{CliConfig, DriverKind};
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use swagcheck::scenarios::{suite_by_name, API_SUITE, SUITE_NAMES};
use swagcheck::{
    register_swag_labs, DriverConfig, Fixtures, PageRegistry, PageResult, Session, SimDriver,
    SuiteResults, TestContext, TestHarness, TestSuite,
};

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Cases that passed
    pub passed: usize,
    /// Cases that failed
    pub failed: usize,
    /// Wall time of the run
    pub duration: Duration,
    /// Per-suite results, in run order
    pub suites: Vec<SuiteResults>,
}

impl RunReport {
    /// Aggregate suite results
    #[must_use]
    pub fn new(suites: Vec<SuiteResults>, duration: Duration) -> Self {
        Self {
            passed: suites.iter().map(SuiteResults::passed_count).sum(),
            failed: suites.iter().map(SuiteResults::failed_count).sum(),
            duration,
            suites,
        }
    }

    /// True when no case failed
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Suites named by `suite`, with the configured per-case timeout applied
///
/// # Errors
///
/// `Config` when the API suite is requested without the `api` feature,
/// `InvalidArgument` for a zero timeout.
pub fn select_suites(suite: SuiteArg, config: &CliConfig) -> CliResult<Vec<TestSuite>> {
    if config.timeout_ms == 0 {
        return Err(CliError::invalid_argument("--timeout must be greater than 0"));
    }

    let mut suites = match suite.suite_name() {
        Some(API_SUITE) => vec![api_suite(config)?],
        Some(name) => vec![suite_by_name(name)
            .ok_or_else(|| CliError::invalid_argument(format!("unknown suite: {name}")))?],
        None => {
            let mut all: Vec<TestSuite> = SUITE_NAMES
                .iter()
                .filter(|name| **name != API_SUITE)
                .filter_map(|name| suite_by_name(name))
                .collect();
            if cfg!(feature = "api") {
                all.push(api_suite(config)?);
            }
            all
        }
    };

    for suite in &mut suites {
        for case in &mut suite.tests {
            case.timeout_ms = config.timeout_ms;
        }
    }
    Ok(suites)
}

#[cfg(feature = "api")]
fn api_suite(config: &CliConfig) -> CliResult<TestSuite> {
    let base = config
        .api_url
        .as_deref()
        .unwrap_or(swagcheck::AIRPORT_GAP_URL);
    Ok(swagcheck::scenarios::api_suite(base.trim_end_matches('/')))
}

#[cfg(not(feature = "api"))]
fn api_suite(_config: &CliConfig) -> CliResult<TestSuite> {
    Err(CliError::config(
        "the api suite is not available; rebuild with --features api",
    ))
}

/// Suite, case and (optionally) page listing for `swagcheck list`
///
/// # Errors
///
/// Propagates page registration failures.
pub fn catalog_lines(elements: bool) -> CliResult<Vec<String>> {
    let config = CliConfig::new();
    let mut lines = Vec::new();
    for suite in select_suites(SuiteArg::All, &config)? {
        lines.push(format!("{} ({} cases)", suite.name, suite.test_count()));
        lines.extend(suite.test_names().into_iter().map(|name| format!("  {name}")));
    }

    if elements {
        let mut pages = PageRegistry::new();
        register_swag_labs(&mut pages, config.store_url())?;
        for name in pages.names() {
            let page = pages.get(name)?;
            lines.push(String::new());
            lines.push(format!("page {} ({})", page.name(), page.url()));
            for element in page.elements().names() {
                let selector = page.resolve(element)?;
                lines.push(format!("  {:<18} {}", selector.name, selector.query));
            }
        }
    }
    Ok(lines)
}

async fn open_context(
    driver: DriverKind,
    driver_config: DriverConfig,
    base_url: String,
    fixtures: Arc<Fixtures>,
) -> PageResult<TestContext> {
    let session = open_session(driver, driver_config).await?;
    TestContext::with_base_url(session, fixtures, &base_url)
}

async fn open_session(driver: DriverKind, driver_config: DriverConfig) -> PageResult<Session> {
    match driver {
        DriverKind::Sim => Ok(Session::new(SimDriver::new())),
        #[cfg(feature = "browser")]
        DriverKind::Chromium => {
            let chromium = swagcheck::ChromiumDriver::launch(driver_config).await?;
            Ok(Session::new(chromium))
        }
        #[cfg(not(feature = "browser"))]
        DriverKind::Chromium => {
            drop(driver_config);
            Err(swagcheck::PageError::driver("chromium support not compiled in"))
        }
    }
}

/// Runs suites and reports as it goes
#[derive(Debug)]
pub struct ScenarioRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl ScenarioRunner {
    /// Create a runner; text output goes to stderr
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        let reporter = ProgressReporter::new(
            config.color.should_color(),
            config.verbosity.is_quiet(),
        );
        Self { config, reporter }
    }

    /// Runner configuration
    #[must_use]
    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Fixtures from the configured directory, or the embedded defaults
    ///
    /// # Errors
    ///
    /// Propagates fixture loading failures.
    pub fn load_fixtures(&self) -> CliResult<Fixtures> {
        let fixtures = match self.config.fixtures_dir {
            Some(ref dir) => Fixtures::load_dir(dir)?,
            None => Fixtures::embedded()?,
        };
        Ok(fixtures)
    }

    fn check_driver(&self) -> CliResult<()> {
        if self.config.driver == DriverKind::Chromium && !cfg!(feature = "browser") {
            return Err(CliError::config(
                "the chromium driver is not available; rebuild with --features browser",
            ));
        }
        Ok(())
    }

    fn base_url(&self) -> String {
        match self.config.driver {
            DriverKind::Sim => {
                if self.config.base_url.is_some() {
                    self.reporter
                        .warning("--base-url is ignored by the sim driver");
                }
                swagcheck::sim::BASE_URL.to_string()
            }
            DriverKind::Chromium => self.config.store_url().to_string(),
        }
    }

    /// Run `suites` in order, one fresh context per case
    ///
    /// # Errors
    ///
    /// Returns an error when the driver or fixtures are unusable. Failing
    /// cases are reported in the returned [`RunReport`], not as errors.
    pub async fn run(&mut self, suites: &[TestSuite]) -> CliResult<RunReport> {
        self.check_driver()?;
        let fixtures = Arc::new(self.load_fixtures()?);
        let base_url = self.base_url();
        let driver = self.config.driver;
        let driver_config = self.config.driver_config();
        let harness = if self.config.fail_fast {
            TestHarness::new().with_fail_fast()
        } else {
            TestHarness::new()
        };

        let total: usize = suites.iter().map(TestSuite::test_count).sum();
        tracing::info!(suites = suites.len(), cases = total, ?driver, "run started");
        if self.config.verbosity.is_verbose() {
            self.reporter
                .info(&format!("{total} cases against {base_url} ({driver:?} driver)"));
        }
        self.reporter.start_progress(total as u64, "running");

        let start = Instant::now();
        let mut finished = Vec::with_capacity(suites.len());
        for suite in suites {
            self.reporter.set_message(&suite.name);
            let results = harness
                .run(suite, || {
                    open_context(
                        driver,
                        driver_config.clone(),
                        base_url.clone(),
                        Arc::clone(&fixtures),
                    )
                })
                .await;
            self.reporter.increment(suite.test_count() as u64);
            self.reporter.suite(&results);

            let stop = self.config.fail_fast && !results.all_passed();
            finished.push(results);
            if stop {
                self.reporter.warning("fail-fast: remaining suites skipped");
                break;
            }
        }
        self.reporter.finish();

        let report = RunReport::new(finished, start.elapsed());
        self.reporter
            .summary(report.passed, report.failed, report.duration);
        tracing::info!(
            passed = report.passed,
            failed = report.failed,
            "run finished"
        );
        Ok(report)
    }
}
