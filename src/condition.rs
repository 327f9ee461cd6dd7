use {
    crate::{
        serutil::{canonical_json, scalar_or_list},
        DecodeError,
    },
    log::trace,
    serde_json::Value,
};

/// Normalize a `Condition` value into a list of strings.
///
/// Strings and arrays of strings follow the usual scalar-or-list rule. A condition block (a JSON object mapping
/// operators to key/value maps) is not parsed structurally; it becomes a single element holding its canonical JSON
/// rendering, with keys sorted at every depth.
pub(crate) fn condition_list(field: &str, value: &Value) -> Result<Vec<String>, DecodeError> {
    match value {
        Value::Object(_) => {
            let rendered = canonical_json(value);
            trace!("{} block rendered as {}", field, rendered);
            Ok(vec![rendered])
        }
        _ => scalar_or_list(field, value),
    }
}
