//! Page loader: open a test page, run its entry point, report failures.

use crate::config::RunnerConfig;
use crate::error::RunError;
use crate::page::{HeadlessPage, LoadStatus};
use crate::relay::ConsoleRelay;
use crate::script::{js_truthy, run_entry_point};
use log::{debug, info};
use serde_json::Value;
use std::io::Write;
use url::Url;

/// Exit code when the suite ran and reported no failures.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code when the page never reached a loaded state.
pub const EXIT_LOAD_FAILED: u8 = 1;
/// Exit code when the suite ran and reported failures.
pub const EXIT_TESTS_FAILED: u8 = 100;

/// Failure count returned by the suite entry point, kept as the raw page value.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureCount(pub Value);

impl FailureCount {
    /// True only for the number zero.
    pub fn is_zero(&self) -> bool {
        self.0.as_f64().is_some_and(|val| val == 0.0)
    }

    /// Whether the count signals failure to the exit code.
    pub fn is_failing(&self) -> bool {
        js_truthy(&self.0)
    }
}

/// How a `pageloader` run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LoaderOutcome {
    /// The page did not load; the entry point was never evaluated.
    LoadFailed(String),
    /// The suite ran and returned this count.
    Completed(FailureCount),
}

impl LoaderOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::LoadFailed(_) => EXIT_LOAD_FAILED,
            Self::Completed(count) if count.is_failing() => EXIT_TESTS_FAILED,
            Self::Completed(_) => EXIT_SUCCESS,
        }
    }
}

/// Open `url`, run the configured entry point and report the result.
///
/// Every page console message is printed verbatim through `relay`, interleaved
/// in order with the status lines below.
///
/// # Errors
/// Returns an error if the browser transport fails, the entry point throws,
/// or stdout cannot be written.
pub async fn run<P, W>(
    page: &mut P,
    url: &Url,
    config: &RunnerConfig,
    relay: &mut ConsoleRelay<W>,
) -> Result<LoaderOutcome, RunError>
where
    P: HeadlessPage,
    W: Write,
{
    relay.status(&format!("Loading URL: {url}"))?;

    let status = page.open(url).await?;
    if let LoadStatus::Failed(reason) = status {
        info!("load of {url} failed: {reason}");
        match page.drain_console().await {
            Ok(messages) => relay.relay_all(&messages)?,
            Err(err) => debug!("console unavailable after failed load: {err:#}"),
        }
        relay.status(&format!("Failed to open {url}"))?;
        return Ok(LoaderOutcome::LoadFailed(reason));
    }
    relay.relay_all(&page.drain_console().await?)?;

    relay.status("Running tests ...")?;
    let expression = run_entry_point(&config.entry_point, &config.failures_global);
    debug!("evaluating entry point: {expression}");
    let evaluated = page.evaluate(&expression).await;
    relay.relay_all(&page.drain_console().await?)?;
    let failures = FailureCount(
        evaluated.map_err(|err| RunError::evaluation(config.entry_point.as_str(), &err))?,
    );

    if failures.is_zero() {
        relay.status("Tests succeeded.")?;
    } else {
        relay.status("*** Tests failed! ***")?;
    }
    info!("entry point returned {}", failures.0);
    Ok(LoaderOutcome::Completed(failures))
}
