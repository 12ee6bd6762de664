//! Test harness for running scenario suites.
//!
//! Every case gets a fresh [`TestContext`] from the caller's factory and
//! runs on its own tokio task, so a panicking case is reported as a
//! failure instead of taking the run down. `after_each` and the session's
//! `end()` run whether the body passed, failed, panicked or timed out.

use crate::catalog::TestContext;
use crate::result::{PageError, PageResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Future returned by a case body or hook
pub type CaseFuture<'a> = BoxFuture<'a, PageResult<()>>;

type CaseFn = Arc<dyn for<'a> Fn(&'a TestContext) -> CaseFuture<'a> + Send + Sync>;

/// A test suite containing multiple tests
#[derive(Clone, Default)]
pub struct TestSuite {
    /// Suite name
    pub name: String,
    /// Tests in this suite
    pub tests: Vec<TestCase>,
    before_each: Option<CaseFn>,
    after_each: Option<CaseFn>,
}

impl std::fmt::Debug for TestSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSuite")
            .field("name", &self.name)
            .field("tests", &self.tests)
            .field("before_each", &self.before_each.is_some())
            .field("after_each", &self.after_each.is_some())
            .finish()
    }
}

impl TestSuite {
    /// Create a new test suite
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a test case
    pub fn add_test(&mut self, test: TestCase) {
        self.tests.push(test);
    }

    /// Add a test case, builder style
    #[must_use]
    pub fn with_test(mut self, test: TestCase) -> Self {
        self.tests.push(test);
        self
    }

    /// Hook run before every case; its failure fails the case
    #[must_use]
    pub fn before_each<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(&'a TestContext) -> CaseFuture<'a> + Send + Sync + 'static,
    {
        self.before_each = Some(Arc::new(hook));
        self
    }

    /// Hook run after every case, pass or fail
    #[must_use]
    pub fn after_each<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(&'a TestContext) -> CaseFuture<'a> + Send + Sync + 'static,
    {
        self.after_each = Some(Arc::new(hook));
        self
    }

    /// Get the number of tests
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Names of the tests, in order
    #[must_use]
    pub fn test_names(&self) -> Vec<&str> {
        self.tests.iter().map(|t| t.name.as_str()).collect()
    }
}

/// A single test case
#[derive(Clone)]
pub struct TestCase {
    /// Test name
    pub name: String,
    /// Test timeout in milliseconds
    pub timeout_ms: u64,
    body: CaseFn,
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl TestCase {
    /// Create a new test case
    #[must_use]
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: for<'a> Fn(&'a TestContext) -> CaseFuture<'a> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            timeout_ms: 30000, // 30 second default
            body: Arc::new(body),
        }
    }

    /// Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }
}

/// Result of running a single test
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Test name
    pub name: String,
    /// Whether test passed
    pub passed: bool,
    /// Error message if failed
    pub error: Option<String>,
    /// Whether the failure was an assertion rather than a fault
    pub assertion: bool,
    /// Test duration
    pub duration: Duration,
}

impl TestResult {
    /// Create a passing test result
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            assertion: false,
            duration: Duration::ZERO,
        }
    }

    /// Create a failing test result
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            assertion: false,
            duration: Duration::ZERO,
        }
    }

    /// Failing result for a page error
    #[must_use]
    pub fn from_error(name: impl Into<String>, error: &PageError) -> Self {
        Self {
            assertion: error.is_assertion(),
            ..Self::fail(name, error.to_string())
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Results from running a test suite
#[derive(Debug, Clone, Serialize)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Individual test results
    pub results: Vec<TestResult>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteResults {
    /// Check if all tests passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Count passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Count failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.passed).count()
    }

    /// Get total test count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Get failed tests
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.passed).collect()
    }
}

/// Test harness for running suites
#[derive(Debug, Default)]
pub struct TestHarness {
    /// Whether to stop on first failure
    pub fail_fast: bool,
}

impl TestHarness {
    /// Create a new test harness
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Run a test suite, building one context per case with `make_context`
    pub async fn run<F, Fut>(&self, suite: &TestSuite, make_context: F) -> SuiteResults
    where
        F: Fn() -> Fut,
        Fut: Future<Output = PageResult<TestContext>>,
    {
        let start = Instant::now();
        let mut results = Vec::with_capacity(suite.tests.len());
        tracing::info!(suite = %suite.name, tests = suite.tests.len(), "suite started");

        for case in &suite.tests {
            let case_start = Instant::now();
            let result = match make_context().await {
                Ok(ctx) => run_case(suite, case, ctx).await,
                Err(e) => TestResult::from_error(&case.name, &e),
            }
            .with_duration(case_start.elapsed());

            if result.passed {
                tracing::info!(suite = %suite.name, case = %case.name, "passed");
            } else {
                tracing::warn!(
                    suite = %suite.name,
                    case = %case.name,
                    error = result.error.as_deref().unwrap_or_default(),
                    "failed"
                );
            }

            let stop = self.fail_fast && !result.passed;
            results.push(result);
            if stop {
                tracing::info!(suite = %suite.name, "fail-fast: skipping remaining cases");
                break;
            }
        }

        SuiteResults {
            suite_name: suite.name.clone(),
            results,
            duration: start.elapsed(),
        }
    }
}

async fn run_case(suite: &TestSuite, case: &TestCase, ctx: TestContext) -> TestResult {
    let before = suite.before_each.clone();
    let after = suite.after_each.clone();
    let body = Arc::clone(&case.body);
    let timeout = Duration::from_millis(case.timeout_ms);

    let task = tokio::spawn(async move {
        let setup_and_body = async {
            let ready = match &before {
                Some(hook) => hook(&ctx).await,
                None => Ok(()),
            };
            match ready {
                Ok(()) => body(&ctx).await,
                Err(e) => Err(e),
            }
        };
        let run = AssertUnwindSafe(setup_and_body).catch_unwind();
        let mut outcome = match tokio::time::timeout(timeout, run).await {
            Ok(Ok(run)) => run,
            Ok(Err(panic)) => Err(PageError::driver(format!(
                "case panicked: {}",
                panic_message(panic.as_ref())
            ))),
            Err(_) => Err(PageError::driver(format!(
                "timed out after {}ms",
                timeout.as_millis()
            ))),
        };
        if let Some(hook) = &after {
            let cleanup = hook(&ctx).await;
            if outcome.is_ok() {
                outcome = cleanup;
            }
        }
        let ended = ctx.end().await;
        if outcome.is_ok() {
            outcome = ended;
        }
        outcome
    });

    match task.await {
        Ok(Ok(())) => TestResult::pass(&case.name),
        Ok(Err(e)) => TestResult::from_error(&case.name, &e),
        Err(join) => TestResult::fail(&case.name, format!("case panicked: {join}")),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload")
}
