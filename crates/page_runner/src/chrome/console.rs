//! Runtime domain listeners feeding the relay channel.

use crate::page::{ConsoleLevel, ConsoleMessage};
use chromiumoxide::cdp::js_protocol::runtime::{
    ConsoleApiCalledType, EventConsoleApiCalled, EventExceptionThrown, RemoteObject,
    RemoteObjectType,
};
use chromiumoxide::page::Page;
use futures::StreamExt as _;
use serde_json::Value;
use tokio::spawn;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Render one console argument the way a terminal console would.
fn render_remote_object(object: &RemoteObject) -> String {
    match &object.value {
        Some(Value::String(text)) => text.clone(),
        Some(value) => value.to_string(),
        None => object.description.clone().unwrap_or_else(|| {
            if matches!(object.r#type, RemoteObjectType::Undefined) {
                "undefined".to_owned()
            } else {
                "null".to_owned()
            }
        }),
    }
}

const fn level_of(kind: &ConsoleApiCalledType) -> ConsoleLevel {
    match kind {
        ConsoleApiCalledType::Log => ConsoleLevel::Log,
        ConsoleApiCalledType::Debug => ConsoleLevel::Debug,
        ConsoleApiCalledType::Info => ConsoleLevel::Info,
        ConsoleApiCalledType::Warning => ConsoleLevel::Warning,
        ConsoleApiCalledType::Error | ConsoleApiCalledType::Assert => ConsoleLevel::Error,
        _ => ConsoleLevel::Other,
    }
}

fn to_message(event: &EventConsoleApiCalled) -> ConsoleMessage {
    let text = event
        .args
        .iter()
        .map(render_remote_object)
        .collect::<Vec<_>>()
        .join(" ");
    ConsoleMessage {
        level: level_of(&event.r#type),
        text,
    }
}

/// Forward every `Runtime.consoleAPICalled` event of `page` into `sink`.
///
/// # Errors
/// Returns an error if the listener cannot be registered.
pub async fn spawn_console_listener(
    page: &Page,
    sink: UnboundedSender<ConsoleMessage>,
) -> anyhow::Result<JoinHandle<()>> {
    let mut events = page.event_listener::<EventConsoleApiCalled>().await?;
    Ok(spawn(async move {
        while let Some(event) = events.next().await {
            if sink.send(to_message(&event)).is_err() {
                break;
            }
        }
        log::debug!("console event stream ended");
    }))
}

/// Log uncaught page exceptions; they never change the exit code directly.
///
/// # Errors
/// Returns an error if the listener cannot be registered.
pub async fn spawn_exception_listener(page: &Page) -> anyhow::Result<JoinHandle<()>> {
    let mut events = page.event_listener::<EventExceptionThrown>().await?;
    Ok(spawn(async move {
        while let Some(event) = events.next().await {
            let details = &event.exception_details;
            let description = details
                .exception
                .as_ref()
                .and_then(|exception| exception.description.clone())
                .unwrap_or_else(|| details.text.clone());
            log::error!(
                "uncaught page exception at {}:{}: {description}",
                details.line_number,
                details.column_number
            );
        }
    }))
}
