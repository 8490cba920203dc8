use page_runner::config::{HookArgs, RunnerConfig, parse_window_size};
use page_runner::loader::{FailureCount, LoaderOutcome};
use page_runner::script::{
    inline_source, install_print_fn, js_string, js_truthy, run_all_tests, run_entry_point,
    unserializable_value, with_source_url,
};
use serde_json::json;

#[test]
fn truthiness_follows_javascript() {
    for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
        assert!(!js_truthy(&falsy), "{falsy} should be falsy");
    }
    for truthy in [json!(true), json!(1), json!(-2.5), json!("0"), json!([]), json!({})] {
        assert!(js_truthy(&truthy), "{truthy} should be truthy");
    }
}

#[test]
fn only_numeric_zero_counts_as_success_message() {
    assert!(FailureCount(json!(0)).is_zero());
    assert!(!FailureCount(json!(null)).is_zero());
    assert!(!FailureCount(json!("0")).is_zero());
    assert_eq!(LoaderOutcome::Completed(FailureCount(json!(0))).exit_code(), 0);
    assert_eq!(LoaderOutcome::Completed(FailureCount(json!(7))).exit_code(), 100);
    assert_eq!(LoaderOutcome::LoadFailed("timeout".to_owned()).exit_code(), 1);
}

#[test]
fn expressions_embed_hooks() {
    assert_eq!(inline_source("x = 1"), "(function () { x = 1; })()");
    assert!(with_source_url("var a;", "out/test.js").ends_with("//# sourceURL=out/test.js\n"));
    assert_eq!(js_string("test-failures"), "\"test-failures\"");

    let entry = run_entry_point("sablono.test.main", "test-failures");
    assert!(entry.contains("var failures = sablono.test.main();"));
    assert!(entry.contains("return window[\"test-failures\"];"));

    let escaped = install_print_fn("cemerick.cljs.test", true);
    assert!(escaped.starts_with("cemerick.cljs.test.set_print_fn_BANG_(function (x)"));
    assert!(escaped.contains("replace(/\\n/g, \"[NEWLINE]\")"));
    assert!(!install_print_fn("cemerick.cljs.test", false).contains("replace"));

    let run = run_all_tests("cemerick.cljs.test");
    assert!(run.contains("console.log(String(results));"));
    assert!(run.contains("return cemerick.cljs.test.successful_QMARK_(results);"));
}

#[test]
fn unserializable_counts_keep_their_javascript_meaning() {
    let infinite = FailureCount(unserializable_value("Infinity"));
    assert!(!infinite.is_zero());
    assert_eq!(LoaderOutcome::Completed(infinite).exit_code(), 100);
    assert_eq!(
        LoaderOutcome::Completed(FailureCount(unserializable_value("-Infinity"))).exit_code(),
        100
    );

    let negative_zero = FailureCount(unserializable_value("-0"));
    assert!(negative_zero.is_zero());
    assert_eq!(LoaderOutcome::Completed(negative_zero).exit_code(), 0);

    let nan = FailureCount(unserializable_value("NaN"));
    assert!(!nan.is_zero());
    assert_eq!(LoaderOutcome::Completed(nan).exit_code(), 0);

    assert_eq!(unserializable_value("3n"), json!(3));
    assert_eq!(LoaderOutcome::Completed(FailureCount(unserializable_value("0n"))).exit_code(), 0);
}

#[test]
fn window_size_parsing() {
    assert_eq!(parse_window_size("1024x768"), Ok((1024, 768)));
    assert_eq!(parse_window_size("800X600"), Ok((800, 600)));
    assert!(parse_window_size("800").is_err());
    assert!(parse_window_size("0x600").is_err());
    assert!(parse_window_size("wide x tall").is_err());
}

#[test]
fn command_line_overrides_configuration() {
    let overrides = HookArgs {
        entry_point: Some("app.test.main".to_owned()),
        failures_global: None,
        suite_namespace: Some("cljs.test".to_owned()),
    };
    let config = RunnerConfig::default().with_overrides(&overrides);

    assert_eq!(config.entry_point, "app.test.main");
    assert_eq!(config.failures_global, "test-failures");
    assert_eq!(config.suite_namespace, "cljs.test");
}
