//! Open a test page in headless Chrome and exit with its test status.
//!
//! Exit codes: 0 tests passed, 1 page failed to load (or a fatal runner
//! error such as a throwing entry point), 100 tests failed.

use clap::Parser;
use log::error;
use page_runner::chrome::ChromeSession;
use page_runner::config::{BrowserArgs, HookArgs, RunnerConfig};
use page_runner::error::RunError;
use page_runner::loader::{LoaderOutcome, run};
use page_runner::relay::{ConsoleRelay, RelayMode};
use page_runner::init_logging;
use std::io::stdout;
use std::process::ExitCode;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "pageloader")]
#[command(about = "Run a browser test page headlessly and report its failures", long_about = None)]
struct Cli {
    /// Page hosting the compiled test suite
    #[arg(value_name = "URL")]
    url: Url,

    #[command(flatten)]
    hooks: HookArgs,

    #[command(flatten)]
    browser: BrowserArgs,
}

async fn run_page(cli: &Cli) -> Result<LoaderOutcome, RunError> {
    let config = RunnerConfig::from_env().with_overrides(&cli.hooks);
    let session = ChromeSession::launch(&cli.browser).await?;
    let mut page = session.new_page().await?;
    let mut relay = ConsoleRelay::new(stdout().lock(), RelayMode::Verbatim);
    let outcome = run(&mut page, &cli.url, &config, &mut relay).await;
    drop(page);
    if let Err(err) = session.close().await {
        log::warn!("browser shutdown: {err:#}");
    }
    outcome
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run_page(&cli).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
