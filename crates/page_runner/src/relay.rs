//! Console relay from the page to process stdout.
//!
//! The relay is also where the runners print their own status lines, so
//! everything reaching stdout goes through one writer that flushes per line.
//! Exit is only requested after the last write returned.

use crate::page::ConsoleMessage;
use serde_json::Value;
use std::io::{self, Write};

/// Escape token standing in for `\n` on a single-line console transport.
pub const NEWLINE_TOKEN: &str = "[NEWLINE]";

/// Page-side encoder: stringify `expression` and replace every newline with
/// [`NEWLINE_TOKEN`], so one print call stays one console line.
pub fn encode_newlines_js(expression: &str) -> String {
    let token = Value::String(NEWLINE_TOKEN.to_owned());
    format!("String({expression}).replace(/\\n/g, {token})")
}

/// Inverse of [`encode_newlines_js`] for one transported line.
///
/// A line consisting solely of the token is suppressed and yields `None`.
pub fn decode_line(line: &str) -> Option<String> {
    if line == NEWLINE_TOKEN {
        return None;
    }
    Some(line.replace(NEWLINE_TOKEN, "\n"))
}

/// How page console lines are translated before printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayMode {
    /// Print every line as received.
    #[default]
    Verbatim,
    /// Decode the newline escape convention and drop bare sentinel lines.
    Escaped,
}

/// Line-oriented, flush-per-line writer shared by the page and the runner.
pub struct ConsoleRelay<W: Write> {
    out: W,
    mode: RelayMode,
}

impl<W: Write> ConsoleRelay<W> {
    pub const fn new(out: W, mode: RelayMode) -> Self {
        Self { out, mode }
    }

    pub const fn mode(&self) -> RelayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RelayMode) {
        self.mode = mode;
    }

    /// Print a runner status line.
    ///
    /// # Errors
    /// Returns an error if the underlying writer fails.
    pub fn status(&mut self, line: &str) -> io::Result<()> {
        self.write_line(line)
    }

    /// Relay one page console message according to the current mode.
    ///
    /// # Errors
    /// Returns an error if the underlying writer fails.
    pub fn relay(&mut self, message: &ConsoleMessage) -> io::Result<()> {
        match self.mode {
            RelayMode::Verbatim => self.write_line(&message.text),
            RelayMode::Escaped => {
                decode_line(&message.text).map_or(Ok(()), |line| self.write_line(&line))
            }
        }
    }

    /// Relay a batch of messages in order.
    ///
    /// # Errors
    /// Returns an error if the underlying writer fails.
    pub fn relay_all(&mut self, messages: &[ConsoleMessage]) -> io::Result<()> {
        for message in messages {
            self.relay(message)?;
        }
        Ok(())
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}
