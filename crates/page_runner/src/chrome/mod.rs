mod console;

use crate::config::BrowserArgs;
use crate::error::RunError;
use crate::page::{ConsoleLevel, ConsoleMessage, HeadlessPage, LoadStatus};
use crate::script::unserializable_value;
use anyhow::{Result, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::Page;
use console::{spawn_console_listener, spawn_exception_listener};
use futures::StreamExt as _;
use serde_json::Value;
use tokio::spawn;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::task::JoinHandle;
use url::Url;

/// Flags that keep headless Chrome quiet and deterministic in CI containers.
const CHROME_FLAGS: &[&str] = &[
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--disable-extensions",
    "--disable-background-networking",
    "--disable-sync",
    "--allow-file-access-from-files",
    "--no-first-run",
    "--no-default-browser-check",
    "--mute-audio",
];

const BARRIER_PREFIX: &str = "__page_runner_barrier_";

/// Headless Chrome with its background CDP handler.
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// Launch headless Chrome.
    ///
    /// # Errors
    /// Returns [`RunError::Launch`] if the config is invalid or Chrome fails to start.
    pub async fn launch(args: &BrowserArgs) -> Result<Self, RunError> {
        let (width, height) = args.window_size;
        let mut builder = BrowserConfig::builder().window_size(width, height);
        if let Some(chrome) = &args.chrome {
            builder = builder.chrome_executable(chrome);
        }
        if !args.sandbox {
            builder = builder.no_sandbox();
        }
        for flag in CHROME_FLAGS {
            builder = builder.arg(*flag);
        }
        for extra in &args.extra_args {
            builder = builder.arg(extra.as_str());
        }
        let config = builder
            .build()
            .map_err(|err| RunError::Launch(format!("browser config error: {err}")))?;

        log::info!("launching headless chrome ({width}x{height})");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| RunError::Launch(err.to_string()))?;

        let handler_task = spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    log::debug!("Browser handler error: {err}");
                }
            }
            log::debug!("Browser handler stream ended");
        });

        Ok(Self {
            browser,
            handler: handler_task,
        })
    }

    /// Open a fresh `about:blank` page with console relaying wired up.
    ///
    /// # Errors
    /// Returns an error if the page or its listeners cannot be created.
    pub async fn new_page(&self) -> Result<ChromePage> {
        let page = self.browser.new_page("about:blank").await?;
        let (sink, console) = unbounded_channel();
        let listeners = vec![
            spawn_console_listener(&page, sink).await?,
            spawn_exception_listener(&page).await?,
        ];
        Ok(ChromePage {
            page,
            console,
            listeners,
            barrier_seq: 0,
        })
    }

    /// Close the browser and stop the handler.
    ///
    /// # Errors
    /// Returns an error if Chrome does not acknowledge the close request.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        let _exit_status = self.browser.wait().await?;
        self.handler.abort();
        Ok(())
    }
}

/// A single Chrome tab implementing [`HeadlessPage`].
pub struct ChromePage {
    page: Page,
    console: UnboundedReceiver<ConsoleMessage>,
    listeners: Vec<JoinHandle<()>>,
    barrier_seq: u64,
}

impl Drop for ChromePage {
    fn drop(&mut self) {
        for listener in &self.listeners {
            listener.abort();
        }
    }
}

impl ChromePage {
    async fn evaluate_params(&self, expression: &str, by_value: bool) -> Result<Option<Value>> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .return_by_value(by_value)
            .await_promise(true)
            .build()
            .map_err(|err| anyhow!("failed to build evaluate params: {err}"))?;
        let result = self.page.evaluate_expression(params).await?;
        if let Some(value) = result.value() {
            return Ok(Some(value.clone()));
        }
        Ok(result
            .object()
            .unserializable_value
            .as_ref()
            .map(|raw| unserializable_value(raw.inner())))
    }
}

impl HeadlessPage for ChromePage {
    async fn open(&mut self, url: &Url) -> Result<LoadStatus> {
        log::debug!("navigating to {url}");
        if let Err(err) = self.page.goto(url.as_str()).await {
            return Ok(LoadStatus::Failed(err.to_string()));
        }
        match self.page.wait_for_navigation().await {
            Ok(_) => Ok(LoadStatus::Success),
            Err(err) => Ok(LoadStatus::Failed(err.to_string())),
        }
    }

    async fn inject_script(&mut self, name: &str, source: &str) -> Result<()> {
        log::debug!("injecting {name} ({} bytes)", source.len());
        self.evaluate_params(source, false).await?;
        Ok(())
    }

    async fn evaluate(&mut self, expression: &str) -> Result<Value> {
        Ok(self.evaluate_params(expression, true).await?.unwrap_or(Value::Null))
    }

    async fn drain_console(&mut self) -> Result<Vec<ConsoleMessage>> {
        self.barrier_seq += 1;
        let marker = format!("{BARRIER_PREFIX}{}", self.barrier_seq);
        self.evaluate_params(&format!("console.debug(\"{marker}\")"), true)
            .await?;

        let mut drained = Vec::new();
        while let Some(message) = self.console.recv().await {
            if message.level == ConsoleLevel::Debug && message.text == marker {
                return Ok(drained);
            }
            drained.push(message);
        }
        Err(anyhow!("console channel closed before barrier {marker}"))
    }
}
