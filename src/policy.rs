use {
    crate::{
        display_json, from_str_json,
        serutil::{json_kind, string_field},
        DecodeError, Statement,
    },
    derive_builder::Builder,
    log::{debug, trace},
    serde::{
        de::{self, Deserializer},
        ser::{SerializeMap, Serializer},
        Deserialize, Serialize,
    },
    serde_json::Value,
};

/// The top-level structure for holding a decoded policy document.
///
/// Statements are always held as a list, in document order, even when the source wrote a single statement object
/// directly under `Statement`.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
pub struct Policy {
    /// The `Version` string, copied verbatim. Not checked against the known IAM policy versions.
    #[builder(setter(into))]
    version: String,

    /// The optional `ID` string, copied verbatim.
    #[builder(setter(into, strip_option), default)]
    id: Option<String>,

    /// Zero or more statements. An absent `Statement` key yields an empty list.
    #[builder(setter(into), default)]
    statements: Vec<Statement>,
}

impl Policy {
    #[inline]
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[inline]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Decode a policy from raw JSON bytes. See [`decode_policy`].
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            debug!("Failed to parse policy JSON: {}", e);
            DecodeError::MalformedJson(e.to_string())
        })?;
        Self::from_json_value(&value)
    }

    /// Decode a policy from an already-parsed JSON value.
    ///
    /// Only `Version`, `ID`, and `Statement` are recognized (exact, case-sensitive match); other keys are ignored.
    pub fn from_json_value(value: &Value) -> Result<Self, DecodeError> {
        let map = match value {
            Value::Object(map) => map,
            _ => {
                return Err(DecodeError::MalformedJson(format!(
                    "expected an object at top level, found {}",
                    json_kind(value)
                )))
            }
        };

        let mut version = None;
        let mut id = None;
        let mut statements = Vec::new();

        for (key, value) in map {
            match key.as_str() {
                "Version" => version = Some(string_field(key, value)?),
                "ID" => id = Some(string_field(key, value)?),
                "Statement" => statements = statement_list(value)?,
                _ => trace!("Ignoring unrecognized policy key {}", key),
            }
        }

        let version = match version {
            Some(version) => version,
            None => {
                debug!("Policy has no Version");
                return Err(DecodeError::MissingField("Version".to_string()));
            }
        };

        Ok(Self {
            version,
            id,
            statements,
        })
    }
}

/// Decode a policy document from raw UTF-8 JSON bytes.
///
/// The input is parsed into a generic JSON value before any field is inspected, since `Statement` may be either a
/// single object or an array of objects. Decoding is pure and all-or-nothing.
pub fn decode_policy(bytes: &[u8]) -> Result<Policy, DecodeError> {
    Policy::from_json_slice(bytes)
}

fn statement_list(value: &Value) -> Result<Vec<Statement>, DecodeError> {
    match value {
        Value::Array(elements) => {
            let mut result = Vec::with_capacity(elements.len());
            for (index, element) in elements.iter().enumerate() {
                match element {
                    Value::Object(map) => {
                        trace!("Decoding statement {}", index);
                        result.push(Statement::from_json_map(map)?);
                    }
                    _ => {
                        debug!("Statement {} is a {}, not an object", index, json_kind(element));
                        return Err(DecodeError::MalformedStatement(format!(
                            "element {} is a {}, not an object",
                            index,
                            json_kind(element)
                        )));
                    }
                }
            }
            Ok(result)
        }
        Value::Object(map) => Ok(vec![Statement::from_json_map(map)?]),
        _ => {
            debug!("Statement is a {}", json_kind(value));
            Err(DecodeError::MalformedStatement(format!(
                "expected an object or an array of objects, found {}",
                json_kind(value)
            )))
        }
    }
}

display_json!(Policy);
from_str_json!(Policy);

impl<'de> Deserialize<'de> for Policy {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Policy, D::Error> {
        let value = Value::deserialize(d)?;
        Self::from_json_value(&value).map_err(de::Error::custom)
    }
}

impl Serialize for Policy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(None)?;
        state.serialize_entry("Version", &self.version)?;
        if let Some(id) = &self.id {
            state.serialize_entry("ID", id)?;
        }
        state.serialize_entry("Statement", &self.statements)?;
        state.end()
    }
}
