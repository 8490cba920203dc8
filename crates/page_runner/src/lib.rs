//! Headless-browser test runners.
//!
//! Two CI entry points share this crate: `pageloader` opens a test page and
//! turns the suite's failure count into an exit code, and `scriptinjector`
//! loads compiled bundles into a blank page, runs the suite and reports its
//! success flag. Both drive the page through [`page::HeadlessPage`], with the
//! Chrome backend in [`chrome`].

/// Chrome backend for [`page::HeadlessPage`].
pub mod chrome;
pub mod config;
pub mod error;
pub mod injector;
pub mod loader;
pub mod page;
pub mod relay;
/// In-page expressions evaluated by the runners
pub mod script;

use env_logger::{Builder, Env};

/// Initialise `env_logger` with a `warn` default, overridable through `RUST_LOG`.
pub fn init_logging() {
    let _log_init: Result<(), _> = Builder::from_env(Env::default().filter_or("RUST_LOG", "warn"))
        .is_test(false)
        .try_init();
}
