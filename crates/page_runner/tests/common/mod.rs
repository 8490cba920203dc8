#![allow(dead_code, reason = "each test binary uses a different subset")]

use anyhow::{Result, anyhow};
use page_runner::page::{ConsoleMessage, HeadlessPage, LoadStatus};
use page_runner::relay::{ConsoleRelay, RelayMode};
use serde_json::Value;
use std::collections::VecDeque;
use std::mem::take;
use url::Url;

/// A call observed by [`ScriptedPage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open(String),
    Inject { name: String, source: String },
    Evaluate(String),
}

/// Scripted stand-in for a browser page.
///
/// Each open/inject/evaluate call pops the next console batch from `console`
/// and the evaluate calls pop their value from `values` (`Null` once empty).
#[derive(Default)]
pub struct ScriptedPage {
    pub load: Option<LoadStatus>,
    pub values: VecDeque<Result<Value>>,
    pub console: VecDeque<Vec<&'static str>>,
    pub fail_injection: bool,
    pub fail_drain: bool,
    pub calls: Vec<Call>,
    pending: Vec<ConsoleMessage>,
}

impl ScriptedPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(mut self, status: LoadStatus) -> Self {
        self.load = Some(status);
        self
    }

    pub fn returning(mut self, value: Value) -> Self {
        self.values.push_back(Ok(value));
        self
    }

    pub fn throwing(mut self, message: &str) -> Self {
        self.values.push_back(Err(anyhow!("Uncaught {message}")));
        self
    }

    pub fn failing_injection(mut self) -> Self {
        self.fail_injection = true;
        self
    }

    pub fn failing_drain(mut self) -> Self {
        self.fail_drain = true;
        self
    }

    pub fn printing(mut self, lines: Vec<&'static str>) -> Self {
        self.console.push_back(lines);
        self
    }

    pub fn evaluations(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Evaluate(expression) => Some(expression.as_str()),
                _ => None,
            })
            .collect()
    }

    fn emit(&mut self) {
        if let Some(lines) = self.console.pop_front() {
            self.pending
                .extend(lines.into_iter().map(ConsoleMessage::log));
        }
    }
}

impl HeadlessPage for ScriptedPage {
    async fn open(&mut self, url: &Url) -> Result<LoadStatus> {
        self.calls.push(Call::Open(url.to_string()));
        self.emit();
        Ok(self.load.clone().unwrap_or(LoadStatus::Success))
    }

    async fn inject_script(&mut self, name: &str, source: &str) -> Result<()> {
        self.calls.push(Call::Inject {
            name: name.to_owned(),
            source: source.to_owned(),
        });
        self.emit();
        if self.fail_injection {
            return Err(anyhow!("SyntaxError: Unexpected token"));
        }
        Ok(())
    }

    async fn evaluate(&mut self, expression: &str) -> Result<Value> {
        self.calls.push(Call::Evaluate(expression.to_owned()));
        self.emit();
        self.values.pop_front().unwrap_or(Ok(Value::Null))
    }

    async fn drain_console(&mut self) -> Result<Vec<ConsoleMessage>> {
        if self.fail_drain {
            return Err(anyhow!("Execution context was destroyed"));
        }
        Ok(take(&mut self.pending))
    }
}

pub fn relay() -> ConsoleRelay<Vec<u8>> {
    ConsoleRelay::new(Vec::new(), RelayMode::Verbatim)
}

pub fn output(relay: ConsoleRelay<Vec<u8>>) -> String {
    String::from_utf8_lossy(&relay.into_inner()).into_owned()
}
