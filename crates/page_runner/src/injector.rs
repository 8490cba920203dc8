//! Script injector: load bundles into a blank page and run the whole suite.

use crate::config::RunnerConfig;
use crate::error::RunError;
use crate::page::HeadlessPage;
use crate::relay::{ConsoleRelay, RelayMode};
use crate::script::{inline_source, install_print_fn, js_truthy, run_all_tests, with_source_url};
use log::debug;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// One positional argument of `scriptinjector`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// An existing file, injected as a global script.
    File(PathBuf),
    /// Literal source, evaluated inside an immediately invoked function.
    Inline(String),
}

impl ScriptSource {
    /// Classify an argument: an existing path wins over literal source.
    pub fn classify(arg: &str) -> Self {
        let path = Path::new(arg);
        if path.exists() {
            Self::File(path.to_path_buf())
        } else {
            Self::Inline(arg.to_owned())
        }
    }
}

/// How a `scriptinjector` run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct InjectorOutcome {
    /// Raw value of the success predicate.
    pub successful: Value,
}

impl InjectorOutcome {
    pub fn passed(&self) -> bool {
        js_truthy(&self.successful)
    }

    pub fn exit_code(&self) -> u8 {
        u8::from(!self.passed())
    }
}

/// Load `sources` in order, then run the suite.
///
/// Console output emitted while loading is dropped; the relay only starts
/// printing once every source is in the page. `escape_newlines` selects the
/// `[NEWLINE]` transport for the print hook and the relay.
///
/// # Errors
/// Returns [`RunError::Injection`] for a file that cannot be read or throws,
/// [`RunError::Evaluation`] when literal source or a suite hook throws.
pub async fn run<P, W>(
    page: &mut P,
    sources: &[ScriptSource],
    config: &RunnerConfig,
    escape_newlines: bool,
    relay: &mut ConsoleRelay<W>,
) -> Result<InjectorOutcome, RunError>
where
    P: HeadlessPage,
    W: Write,
{
    for source in sources {
        load_source(page, source).await?;
    }
    for dropped in page.drain_console().await? {
        debug!("console before relay: {dropped}");
    }

    relay.set_mode(if escape_newlines {
        RelayMode::Escaped
    } else {
        RelayMode::Verbatim
    });

    let hook = install_print_fn(&config.suite_namespace, escape_newlines);
    let installed = page.evaluate(&hook).await;
    relay.relay_all(&page.drain_console().await?)?;
    installed.map_err(|err| RunError::evaluation("print hook installation", &err))?;

    let evaluated = page.evaluate(&run_all_tests(&config.suite_namespace)).await;
    relay.relay_all(&page.drain_console().await?)?;
    let successful = evaluated.map_err(|err| RunError::evaluation("run_all_tests", &err))?;

    Ok(InjectorOutcome { successful })
}

async fn load_source<P: HeadlessPage>(page: &mut P, source: &ScriptSource) -> Result<(), RunError> {
    match source {
        ScriptSource::File(path) => {
            debug!("injecting {}", path.display());
            let contents = fs::read_to_string(path).map_err(|err| RunError::Injection {
                path: path.clone(),
                reason: err.to_string(),
            })?;
            let name = path.display().to_string();
            page.inject_script(&name, &with_source_url(&contents, &name))
                .await
                .map_err(|err| RunError::Injection {
                    path: path.clone(),
                    reason: format!("{err:#}"),
                })
        }
        ScriptSource::Inline(code) => {
            debug!("evaluating inline source: {code}");
            page.evaluate(&inline_source(code))
                .await
                .map(drop)
                .map_err(|err| RunError::evaluation(format!("inline source `{code}`"), &err))
        }
    }
}
