//! Fatal errors raised while driving a test page.
//!
//! A page that fails to load and a suite that reports failures are not
//! errors: they are outcomes mapped to exit codes by the runners. Everything
//! here aborts the run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal runner failure.
#[derive(Debug, Error)]
pub enum RunError {
    /// The headless browser could not be started.
    #[error("failed to launch headless browser: {0}")]
    Launch(String),
    /// A script file named on the command line could not be injected.
    #[error("Failed to inject {}: {reason}", path.display())]
    Injection {
        /// File that was being injected.
        path: PathBuf,
        /// Read or evaluation failure reported for it.
        reason: String,
    },
    /// An in-page evaluation threw or could not be delivered.
    #[error("evaluation of {context} failed: {message}")]
    Evaluation {
        /// Which step was evaluating.
        context: String,
        /// Exception text reported by the page.
        message: String,
    },
    /// Browser transport failure outside any evaluation.
    #[error(transparent)]
    Browser(#[from] anyhow::Error),
    /// Writing relayed output failed.
    #[error("failed to write runner output: {0}")]
    Output(#[from] io::Error),
}

impl RunError {
    /// Wrap an evaluation failure with the step that caused it.
    pub fn evaluation(context: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::Evaluation {
            context: context.into(),
            message: format!("{err:#}"),
        }
    }
}
