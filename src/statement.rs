use {
    crate::{
        condition::condition_list,
        display_json, from_str_json,
        principal::principal_map,
        serutil::{json_kind, scalar_or_list, string_field},
        DecodeError, Effect, PrincipalMap,
    },
    derive_builder::Builder,
    log::{debug, trace},
    serde::{
        de::{self, Deserializer},
        Deserialize, Serialize,
    },
    serde_json::{Map, Value},
    std::str::FromStr,
};

/// One access-control rule within a policy.
///
/// Every list-valued field is held in normalized form: a source scalar becomes a one-element list. A field whose key
/// is absent from the source is `None`; a key present with an empty array is `Some` of an empty list.
#[derive(Builder, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Statement {
    #[builder(setter(into, strip_option), default)]
    #[serde(rename = "StatementID", skip_serializing_if = "Option::is_none")]
    statement_id: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(rename = "Effect", skip_serializing_if = "Option::is_none")]
    effect: Option<String>,

    #[builder(setter(into, strip_option), default)]
    #[serde(rename = "Principal", skip_serializing_if = "Option::is_none")]
    principal: Option<PrincipalMap>,

    #[builder(setter(into, strip_option), default)]
    #[serde(rename = "NotPrincipal", skip_serializing_if = "Option::is_none")]
    not_principal: Option<PrincipalMap>,

    #[builder(setter(into, strip_option), default)]
    #[serde(rename = "Action", skip_serializing_if = "Option::is_none")]
    action: Option<Vec<String>>,

    #[builder(setter(into, strip_option), default)]
    #[serde(rename = "NotAction", skip_serializing_if = "Option::is_none")]
    not_action: Option<Vec<String>>,

    #[builder(setter(into, strip_option), default)]
    #[serde(rename = "Resource", skip_serializing_if = "Option::is_none")]
    resource: Option<Vec<String>>,

    #[builder(setter(into, strip_option), default)]
    #[serde(rename = "NotResource", skip_serializing_if = "Option::is_none")]
    not_resource: Option<Vec<String>>,

    #[builder(setter(into, strip_option), default)]
    #[serde(rename = "Condition", skip_serializing_if = "Option::is_none")]
    condition: Option<Vec<String>>,
}

impl Statement {
    pub fn builder() -> StatementBuilder {
        StatementBuilder::default()
    }

    #[inline]
    pub fn statement_id(&self) -> Option<&str> {
        self.statement_id.as_deref()
    }

    /// The effect exactly as written in the source; not validated.
    #[inline]
    pub fn effect(&self) -> Option<&str> {
        self.effect.as_deref()
    }

    /// The effect as an [`Effect`], if it is exactly `Allow` or `Deny`.
    pub fn effect_kind(&self) -> Option<Effect> {
        self.effect().and_then(|e| Effect::from_str(e).ok())
    }

    #[inline]
    pub fn principal(&self) -> Option<&PrincipalMap> {
        self.principal.as_ref()
    }

    #[inline]
    pub fn not_principal(&self) -> Option<&PrincipalMap> {
        self.not_principal.as_ref()
    }

    #[inline]
    pub fn action(&self) -> Option<&[String]> {
        self.action.as_deref()
    }

    #[inline]
    pub fn not_action(&self) -> Option<&[String]> {
        self.not_action.as_deref()
    }

    #[inline]
    pub fn resource(&self) -> Option<&[String]> {
        self.resource.as_deref()
    }

    #[inline]
    pub fn not_resource(&self) -> Option<&[String]> {
        self.not_resource.as_deref()
    }

    #[inline]
    pub fn condition(&self) -> Option<&[String]> {
        self.condition.as_deref()
    }

    /// Decode a single statement from raw JSON bytes. The top level must be a JSON object.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            debug!("Failed to parse statement JSON: {}", e);
            DecodeError::MalformedJson(e.to_string())
        })?;

        match value {
            Value::Object(ref map) => Self::from_json_map(map),
            _ => Err(DecodeError::MalformedJson(format!(
                "expected an object at top level, found {}",
                json_kind(&value)
            ))),
        }
    }

    /// Decode a single statement from an already-parsed JSON value, which must be an object.
    pub fn from_json_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(map) => Self::from_json_map(map),
            _ => {
                debug!("Statement is a {}, not an object", json_kind(value));
                Err(DecodeError::MalformedStatement(format!("expected an object, found {}", json_kind(value))))
            }
        }
    }

    pub(crate) fn from_json_map(map: &Map<String, Value>) -> Result<Self, DecodeError> {
        let mut statement = Statement::default();

        for (key, value) in map {
            match key.as_str() {
                "StatementID" => statement.statement_id = Some(string_field(key, value)?),
                "Effect" => statement.effect = Some(string_field(key, value)?),
                "Principal" => statement.principal = Some(principal_map(key, value)?),
                "NotPrincipal" => statement.not_principal = Some(principal_map(key, value)?),
                "Action" => statement.action = Some(scalar_or_list(key, value)?),
                "NotAction" => statement.not_action = Some(scalar_or_list(key, value)?),
                "Resource" => statement.resource = Some(scalar_or_list(key, value)?),
                "NotResource" => statement.not_resource = Some(scalar_or_list(key, value)?),
                "Condition" => statement.condition = Some(condition_list(key, value)?),
                _ => trace!("Ignoring unrecognized statement key {}", key),
            }
        }

        Ok(statement)
    }
}

/// Decode a single statement object from raw JSON bytes.
pub fn decode_statement(bytes: &[u8]) -> Result<Statement, DecodeError> {
    Statement::from_json_slice(bytes)
}

display_json!(Statement);
from_str_json!(Statement);

impl<'de> Deserialize<'de> for Statement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json_value(&value).map_err(de::Error::custom)
    }
}
