mod common;

use anyhow::Result;
use common::{ScriptedPage, output, relay};
use page_runner::config::RunnerConfig;
use page_runner::error::RunError;
use page_runner::loader::{LoaderOutcome, run};
use page_runner::page::LoadStatus;
use serde_json::json;
use url::Url;

fn suite_url() -> Result<Url> {
    Ok(Url::parse("http://example.test/suite")?)
}

#[tokio::test]
async fn zero_failures_exit_zero() -> Result<()> {
    let mut page = ScriptedPage::new().returning(json!(0));
    let mut out = relay();
    let outcome = run(&mut page, &suite_url()?, &RunnerConfig::default(), &mut out).await?;

    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(
        output(out),
        "Loading URL: http://example.test/suite\nRunning tests ...\nTests succeeded.\n"
    );
    Ok(())
}

#[tokio::test]
async fn reported_failures_exit_hundred() -> Result<()> {
    let mut page = ScriptedPage::new().returning(json!(3));
    let mut out = relay();
    let outcome = run(&mut page, &suite_url()?, &RunnerConfig::default(), &mut out).await?;

    assert_eq!(outcome.exit_code(), 100);
    assert!(output(out).ends_with("*** Tests failed! ***\n"));
    Ok(())
}

#[tokio::test]
async fn load_failure_skips_entry_point() -> Result<()> {
    let mut page = ScriptedPage::new().loading(LoadStatus::Failed("net::ERR_NAME_NOT_RESOLVED".into()));
    let mut out = relay();
    let outcome = run(&mut page, &suite_url()?, &RunnerConfig::default(), &mut out).await?;

    assert_eq!(outcome.exit_code(), 1);
    assert!(matches!(outcome, LoaderOutcome::LoadFailed(_)));
    assert!(page.evaluations().is_empty());
    let text = output(out);
    assert!(text.contains("Failed to open http://example.test/suite"));
    assert!(!text.contains("Running tests"));
    Ok(())
}

#[tokio::test]
async fn load_failure_reports_even_without_a_console() -> Result<()> {
    let mut page = ScriptedPage::new()
        .loading(LoadStatus::Failed("net::ERR_CONNECTION_REFUSED".into()))
        .failing_drain();
    let mut out = relay();
    let outcome = run(&mut page, &suite_url()?, &RunnerConfig::default(), &mut out).await?;

    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(
        output(out),
        "Loading URL: http://example.test/suite
Failed to open http://example.test/suite
"
    );
    Ok(())
}

#[tokio::test]
async fn console_lines_are_relayed_verbatim_in_order() -> Result<()> {
    let mut page = ScriptedPage::new()
        .printing(vec!["page booted"])
        .printing(vec!["Testing sablono.core-test", "a[NEWLINE]b", "[NEWLINE]"])
        .returning(json!(0));
    let mut out = relay();
    run(&mut page, &suite_url()?, &RunnerConfig::default(), &mut out).await?;

    let lines: Vec<String> = output(out).lines().map(str::to_owned).collect();
    assert_eq!(
        lines,
        [
            "Loading URL: http://example.test/suite",
            "page booted",
            "Running tests ...",
            "Testing sablono.core-test",
            "a[NEWLINE]b",
            "[NEWLINE]",
            "Tests succeeded.",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn entry_point_and_global_come_from_config() -> Result<()> {
    let config = RunnerConfig {
        entry_point: "my.app.test.main".to_owned(),
        failures_global: "failed-count".to_owned(),
        ..RunnerConfig::default()
    };
    let mut page = ScriptedPage::new().returning(json!(0));
    run(&mut page, &suite_url()?, &config, &mut relay()).await?;

    let evaluations = page.evaluations();
    assert_eq!(evaluations.len(), 1);
    assert!(evaluations[0].contains("my.app.test.main()"));
    assert!(evaluations[0].contains("window[\"failed-count\"]"));
    Ok(())
}

#[tokio::test]
async fn missing_counter_logs_failure_but_exits_zero() -> Result<()> {
    let mut page = ScriptedPage::new().returning(json!(null));
    let mut out = relay();
    let outcome = run(&mut page, &suite_url()?, &RunnerConfig::default(), &mut out).await?;

    assert_eq!(outcome.exit_code(), 0);
    assert!(output(out).contains("*** Tests failed! ***"));
    Ok(())
}

#[tokio::test]
async fn throwing_entry_point_is_fatal() -> Result<()> {
    let mut page = ScriptedPage::new()
        .printing(vec![])
        .printing(vec!["before the throw"])
        .throwing("ReferenceError: sablono is not defined");
    let mut out = relay();
    let result = run(&mut page, &suite_url()?, &RunnerConfig::default(), &mut out).await;

    assert!(matches!(result, Err(RunError::Evaluation { .. })));
    assert!(output(out).contains("before the throw"));
    Ok(())
}
