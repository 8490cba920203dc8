//! Runner configuration.
//!
//! In-page hook names are read from the environment so a CI job can point the
//! runners at a different test namespace without changing its command line;
//! flags on the command line take precedence over the environment.

use clap::Args;
use std::env;
use std::path::PathBuf;

/// Default zero-argument suite entry point for `pageloader`.
pub const DEFAULT_ENTRY_POINT: &str = "sablono.test.main";
/// Default page global holding the failure count.
pub const DEFAULT_FAILURES_GLOBAL: &str = "test-failures";
/// Default namespace providing the print hook, runner and predicate.
pub const DEFAULT_SUITE_NAMESPACE: &str = "cemerick.cljs.test";

/// Names of the in-page collaborators the runners call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Dotted path of the `pageloader` entry point.
    pub entry_point: String,
    /// `window` key read when the entry point does not return a count.
    pub failures_global: String,
    /// Dotted namespace holding `set_print_fn_BANG_`, `run_all_tests` and
    /// `successful_QMARK_`.
    pub suite_namespace: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            entry_point: DEFAULT_ENTRY_POINT.to_owned(),
            failures_global: DEFAULT_FAILURES_GLOBAL.to_owned(),
            suite_namespace: DEFAULT_SUITE_NAMESPACE.to_owned(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `PAGE_RUNNER_ENTRY`: entry point (default: `sablono.test.main`)
    /// - `PAGE_RUNNER_FAILURES_GLOBAL`: failure counter global (default: `test-failures`)
    /// - `PAGE_RUNNER_SUITE_NS`: suite namespace (default: `cemerick.cljs.test`)
    ///
    /// Empty values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            entry_point: non_empty_var("PAGE_RUNNER_ENTRY").unwrap_or(defaults.entry_point),
            failures_global: non_empty_var("PAGE_RUNNER_FAILURES_GLOBAL")
                .unwrap_or(defaults.failures_global),
            suite_namespace: non_empty_var("PAGE_RUNNER_SUITE_NS")
                .unwrap_or(defaults.suite_namespace),
        }
    }

    /// Apply command line overrides on top of this configuration.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &HookArgs) -> Self {
        if let Some(entry) = &overrides.entry_point {
            self.entry_point.clone_from(entry);
        }
        if let Some(global) = &overrides.failures_global {
            self.failures_global.clone_from(global);
        }
        if let Some(namespace) = &overrides.suite_namespace {
            self.suite_namespace.clone_from(namespace);
        }
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|val| !val.trim().is_empty())
}

/// Command line overrides for [`RunnerConfig`].
#[derive(Args, Debug, Clone, Default)]
pub struct HookArgs {
    /// Suite entry point invoked by `pageloader` (e.g. `sablono.test.main`)
    #[arg(long = "entry", value_name = "PATH")]
    pub entry_point: Option<String>,

    /// Page global holding the failure count
    #[arg(long = "failures-global", value_name = "NAME")]
    pub failures_global: Option<String>,

    /// Namespace of the print hook, runner and success predicate
    #[arg(long = "suite-ns", value_name = "NAMESPACE")]
    pub suite_namespace: Option<String>,
}

/// Headless Chrome launch options shared by both runners.
#[derive(Args, Debug, Clone)]
pub struct BrowserArgs {
    /// Chrome or Chromium executable; auto-detected when omitted
    #[arg(long = "chrome", env = "CHROME_BIN", value_name = "PATH")]
    pub chrome: Option<PathBuf>,

    /// Viewport size as WIDTHxHEIGHT
    #[arg(long = "window-size", value_name = "WxH", default_value = "800x600", value_parser = parse_window_size)]
    pub window_size: (u32, u32),

    /// Keep Chrome's sandbox enabled (disabled by default for CI containers)
    #[arg(long = "sandbox")]
    pub sandbox: bool,

    /// Extra argument passed to Chrome; repeatable
    #[arg(long = "chrome-arg", value_name = "ARG")]
    pub extra_args: Vec<String>,
}

impl Default for BrowserArgs {
    fn default() -> Self {
        Self {
            chrome: None,
            window_size: (800, 600),
            sandbox: false,
            extra_args: Vec::new(),
        }
    }
}

/// Parse `WIDTHxHEIGHT`.
///
/// # Errors
/// Returns a message when either side is missing or not a positive integer.
pub fn parse_window_size(raw: &str) -> Result<(u32, u32), String> {
    let (width, height) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let parse_side = |side: &str| {
        side.trim()
            .parse::<u32>()
            .ok()
            .filter(|val| *val > 0)
            .ok_or_else(|| format!("invalid window dimension '{side}' in '{raw}'"))
    };
    Ok((parse_side(width)?, parse_side(height)?))
}
