//! The headless page the runners drive.
//!
//! [`HeadlessPage`] is the only seam between the runner algorithms and the
//! browser. Every call is a single suspension point; the runners never issue
//! a second call before the first completes.

use anyhow::Result;
use core::fmt;
use serde_json::Value;
use url::Url;

/// Result of asking the page to open a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The document reached a loaded state.
    Success,
    /// Navigation failed; carries the browser's reason.
    Failed(String),
}

/// Console API level of a relayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleLevel {
    #[default]
    Log,
    Debug,
    Info,
    Warning,
    Error,
    Other,
}

/// One console call made by page code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    /// Arguments rendered and joined by single spaces.
    pub text: String,
}

impl ConsoleMessage {
    pub fn log(text: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Log,
            text: text.into(),
        }
    }
}

impl fmt::Display for ConsoleMessage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.text)
    }
}

/// A single browser page context owned by one runner invocation.
#[expect(async_fn_in_trait, reason = "only used through generics, never as dyn")]
pub trait HeadlessPage {
    /// Navigate to `url` and wait for the load to settle.
    ///
    /// # Errors
    /// Returns an error only when the browser transport itself fails; a page
    /// that does not load is reported as [`LoadStatus::Failed`].
    async fn open(&mut self, url: &Url) -> Result<LoadStatus>;

    /// Run `source` as a classic global script, like a `<script>` tag.
    ///
    /// # Errors
    /// Returns an error if the script throws or cannot be delivered.
    async fn inject_script(&mut self, name: &str, source: &str) -> Result<()>;

    /// Evaluate `expression` and return its value serialised as JSON.
    ///
    /// # Errors
    /// Returns an error if the expression throws or cannot be delivered.
    async fn evaluate(&mut self, expression: &str) -> Result<Value>;

    /// Take every console message emitted since the previous drain.
    ///
    /// Implementations must include every message the page emitted before this
    /// call started.
    ///
    /// # Errors
    /// Returns an error if the console channel closed unexpectedly.
    async fn drain_console(&mut self) -> Result<Vec<ConsoleMessage>>;
}
