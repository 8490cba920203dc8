use crate::relay::encode_newlines_js;
use serde_json::Value;

/// JavaScript truthiness of a value returned by the page.
pub fn js_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(num) => num.as_f64().is_some_and(|val| val != 0.0 && !val.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Map a `unserializableValue` from the page onto the JSON the runners reason about.
///
/// `-0` becomes `0` and `NaN` becomes `null`, keeping their falsiness. The
/// infinities stay as their non-empty names, so they are truthy and never zero.
/// `BigInt` literals (`12n`) become the number when it fits.
pub fn unserializable_value(raw: &str) -> Value {
    match raw {
        "-0" => Value::from(0),
        "NaN" => Value::Null,
        _ => raw
            .strip_suffix('n')
            .and_then(|digits| {
                digits
                    .parse::<i64>()
                    .map(Value::from)
                    .or_else(|_| digits.parse::<u64>().map(Value::from))
                    .ok()
            })
            .unwrap_or_else(|| Value::String(raw.to_owned())),
    }
}

/// Wrap literal command line source so its declarations stay local.
pub fn inline_source(source: &str) -> String {
    format!("(function () {{ {source}; }})()")
}

/// Append a `sourceURL` so page stack traces name the injected file.
pub fn with_source_url(source: &str, name: &str) -> String {
    format!("{source}\n//# sourceURL={name}\n")
}

/// Invoke the suite entry point and hand back the failure count.
///
/// Entry points that return a number report it directly; older bundles only
/// set the page global, which is read as the fallback.
pub fn run_entry_point(entry_point: &str, failures_global: &str) -> String {
    let global = js_string(failures_global);
    format!(
        "(function () {{ var failures = {entry_point}(); \
         if (typeof failures === \"number\") {{ return failures; }} \
         return window[{global}]; }})()"
    )
}

/// Install a print function on the suite that logs one console line per call.
///
/// With `escape_newlines` the function encodes embedded newlines as the relay
/// token; otherwise text is logged as is.
pub fn install_print_fn(suite_namespace: &str, escape_newlines: bool) -> String {
    let body = if escape_newlines {
        format!("console.log({});", encode_newlines_js("x"))
    } else {
        "console.log(String(x));".to_owned()
    };
    format!("{suite_namespace}.set_print_fn_BANG_(function (x) {{ {body} }}); undefined")
}

/// Run every test, log the results' printed form and return the success predicate.
pub fn run_all_tests(suite_namespace: &str) -> String {
    format!(
        "(function () {{ var results = {suite_namespace}.run_all_tests(); \
         console.log(String(results)); \
         return {suite_namespace}.successful_QMARK_(results); }})()"
    )
}

/// Quote `text` as a JavaScript string literal.
pub fn js_string(text: &str) -> String {
    Value::String(text.to_owned()).to_string()
}
