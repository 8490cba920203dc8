//! Load compiled test bundles into a blank headless page and run the suite.
//!
//! Each argument is injected as a file when it names an existing path and
//! evaluated as literal source otherwise. Exit code 0 when the suite's
//! success predicate holds, 1 otherwise or on any fatal error.

use clap::Parser;
use log::error;
use page_runner::chrome::ChromeSession;
use page_runner::config::{BrowserArgs, HookArgs, RunnerConfig};
use page_runner::error::RunError;
use page_runner::init_logging;
use page_runner::injector::{InjectorOutcome, ScriptSource, run};
use page_runner::relay::{ConsoleRelay, RelayMode};
use std::io::stdout;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "scriptinjector")]
#[command(about = "Inject scripts into a headless page and run all tests", long_about = None)]
struct Cli {
    /// Script files or literal source statements, loaded in order
    #[arg(value_name = "SCRIPT", required = true)]
    scripts: Vec<String>,

    /// Relay multi-line print output as is instead of the [NEWLINE] escape
    #[arg(long = "native-newlines")]
    native_newlines: bool,

    #[command(flatten)]
    hooks: HookArgs,

    #[command(flatten)]
    browser: BrowserArgs,
}

async fn run_scripts(cli: &Cli) -> Result<InjectorOutcome, RunError> {
    let config = RunnerConfig::from_env().with_overrides(&cli.hooks);
    let sources: Vec<ScriptSource> = cli
        .scripts
        .iter()
        .map(|arg| ScriptSource::classify(arg))
        .collect();

    let session = ChromeSession::launch(&cli.browser).await?;
    let mut page = session.new_page().await?;
    let mut relay = ConsoleRelay::new(stdout().lock(), RelayMode::Verbatim);
    let outcome = run(&mut page, &sources, &config, !cli.native_newlines, &mut relay).await;
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
    match run_scripts(&cli).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
