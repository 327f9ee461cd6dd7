use {
    crate::DecodeError,
    log::debug,
    serde_json::{Map, Value},
};

/// Implement Display for a given class by formatting it as pretty-printed JSON.
#[macro_export]
macro_rules! display_json {
    ($cls:ident) => {
        impl std::fmt::Display for $cls {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                let buf = Vec::new();
                let serde_formatter = ::serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut ser = ::serde_json::Serializer::with_formatter(buf, serde_formatter);
                match ::serde::Serialize::serialize(self, &mut ser) {
                    Ok(()) => (),
                    Err(e) => {
                        ::log::error!("Failed to serialize: {}", e);
                        return Err(::std::fmt::Error {});
                    }
                };
                match std::str::from_utf8(&ser.into_inner()) {
                    Ok(s) => write!(f, "{}", s),
                    Err(e) => {
                        ::log::error!("JSON serialization contained non-UTF-8 characters: {}", e);
                        Err(::std::fmt::Error {})
                    }
                }
            }
        }
    };
}

/// Implement FromStr for a given class by running its JSON decoder (`from_json_slice`) over the string.
#[macro_export]
macro_rules! from_str_json {
    ($cls:ident) => {
        impl ::std::str::FromStr for $cls {
            type Err = $crate::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match Self::from_json_slice(s.as_bytes()) {
                    Ok(result) => Ok(result),
                    Err(e) => {
                        ::log::debug!("Failed to parse: {}: {:?}", s, e);
                        Err(e)
                    }
                }
            }
        }
    };
}

/// A type that can appear as one element of a scalar-or-list field.
pub(crate) trait ListElement: Sized {
    /// Convert a single JSON value into an element, or `None` if the value has the wrong shape.
    fn from_json(value: &Value) -> Option<Self>;
}

impl ListElement for String {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Normalize a field that may be written as a single element or as a JSON array of elements.
///
/// A scalar becomes a one-element vector; an array keeps its element order with no deduplication. Anything else,
/// including `null` and nested arrays, is an [`DecodeError::InvalidFieldShape`] naming `field`.
pub(crate) fn scalar_or_list<T: ListElement>(field: &str, value: &Value) -> Result<Vec<T>, DecodeError> {
    match value {
        Value::Array(elements) => {
            let mut result = Vec::with_capacity(elements.len());
            for element in elements {
                match T::from_json(element) {
                    Some(e) => result.push(e),
                    None => return Err(invalid_shape(field, element)),
                }
            }
            Ok(result)
        }
        _ => match T::from_json(value) {
            Some(e) => Ok(vec![e]),
            None => Err(invalid_shape(field, value)),
        },
    }
}

/// Extract a field that must be a JSON string.
pub(crate) fn string_field(field: &str, value: &Value) -> Result<String, DecodeError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(invalid_shape(field, value)),
    }
}

pub(crate) fn invalid_shape(field: &str, value: &Value) -> DecodeError {
    debug!("Rejected {} value for field {}", json_kind(value), field);
    DecodeError::InvalidFieldShape(field.to_string())
}

/// Short name of a JSON value's type, for diagnostics.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a JSON value compactly with object keys sorted at every depth.
///
/// The output depends only on the value's contents, never on the key order of the source document.
pub(crate) fn canonical_json(value: &Value) -> String {
    sort_keys(value).to_string()
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k.clone(), sort_keys(v))).collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{canonical_json, json_kind, scalar_or_list, string_field},
        crate::DecodeError,
        pretty_assertions::assert_eq,
        serde::Serialize,
        serde_json::json,
        std::panic::catch_unwind,
    };

    #[test_log::test]
    fn test_scalar_or_list() {
        let single: Vec<String> = scalar_or_list("Action", &json!("s3:GetObject")).unwrap();
        let list: Vec<String> = scalar_or_list("Action", &json!(["s3:GetObject"])).unwrap();
        assert_eq!(single, vec!["s3:GetObject".to_string()]);
        assert_eq!(single, list);

        let ordered: Vec<String> = scalar_or_list("Resource", &json!(["c", "a", "b", "a"])).unwrap();
        assert_eq!(ordered, vec!["c", "a", "b", "a"]);

        let empty: Vec<String> = scalar_or_list("Resource", &json!([])).unwrap();
        assert!(empty.is_empty());
    }

    #[test_log::test]
    fn test_scalar_or_list_bad_shapes() {
        for bad in [json!(42), json!(null), json!(true), json!({"a": "b"}), json!(["a", 1]), json!([["a"]])] {
            let e = scalar_or_list::<String>("NotAction", &bad).unwrap_err();
            assert_eq!(e, DecodeError::InvalidFieldShape("NotAction".to_string()));
        }
    }

    #[test_log::test]
    fn test_string_field() {
        assert_eq!(string_field("Effect", &json!("Allow")).unwrap(), "Allow");
        assert_eq!(
            string_field("Effect", &json!(["Allow"])).unwrap_err(),
            DecodeError::InvalidFieldShape("Effect".to_string())
        );
    }

    #[test_log::test]
    fn test_json_kind() {
        assert_eq!(json_kind(&json!(null)), "null");
        assert_eq!(json_kind(&json!(false)), "boolean");
        assert_eq!(json_kind(&json!(1.5)), "number");
        assert_eq!(json_kind(&json!("x")), "string");
        assert_eq!(json_kind(&json!([])), "array");
        assert_eq!(json_kind(&json!({})), "object");
    }

    #[test_log::test]
    fn test_canonical_json() {
        let a: serde_json::Value = serde_json::from_str(
            r#"{"StringEquals": {"aws:username": "bob", "aws:PrincipalTag/team": ["b", "a"]}, "Bool": {"aws:SecureTransport": "true"}}"#,
        )
        .unwrap();
        let b: serde_json::Value = serde_json::from_str(
            r#"{"Bool": {"aws:SecureTransport": "true"}, "StringEquals": {"aws:PrincipalTag/team": ["b", "a"], "aws:username": "bob"}}"#,
        )
        .unwrap();

        let rendered = canonical_json(&a);
        assert_eq!(rendered, canonical_json(&b));
        assert_eq!(
            rendered,
            r#"{"Bool":{"aws:SecureTransport":"true"},"StringEquals":{"aws:PrincipalTag/team":["b","a"],"aws:username":"bob"}}"#
        );
    }

    #[derive(Clone, Debug)]
    struct SerFail {}
    display_json!(SerFail);

    impl Serialize for SerFail {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("Serialization failed"))
        }
    }

    #[test_log::test]
    fn test_ser_fail() {
        let e = catch_unwind(|| SerFail {}.to_string()).unwrap_err();
        let e2 = e.downcast::<String>().unwrap();
        assert!((*e2).contains("a Display implementation returned an error"));
    }
}
