use {
    crate::{
        serutil::{invalid_shape, scalar_or_list},
        DecodeError,
    },
    log::debug,
    serde_json::Value,
    std::collections::BTreeMap,
};

/// Principal type (`AWS`, `Service`, `Federated`, `CanonicalUser`, or the wildcard `*`) mapped to the ordered
/// principal identifiers given for that type.
///
/// Source key order carries no meaning, so the map is kept sorted by principal type.
pub type PrincipalMap = BTreeMap<String, Vec<String>>;

/// The principal type and identifier used for the bare `"*"` shorthand.
pub const ANY_PRINCIPAL: &str = "*";

/// Normalize a `Principal` or `NotPrincipal` value.
///
/// Each inner value may be a string or an array of strings; both become a vector. The bare string `"*"` is the
/// IAM shorthand for every principal and is expanded to `{"*": ["*"]}`.
pub(crate) fn principal_map(field: &str, value: &Value) -> Result<PrincipalMap, DecodeError> {
    match value {
        Value::Object(entries) => {
            let mut result = PrincipalMap::new();
            for (principal_type, ids) in entries {
                result.insert(principal_type.clone(), scalar_or_list(field, ids)?);
            }
            Ok(result)
        }
        Value::String(s) if s == ANY_PRINCIPAL => {
            let mut result = PrincipalMap::new();
            result.insert(ANY_PRINCIPAL.to_string(), vec![ANY_PRINCIPAL.to_string()]);
            Ok(result)
        }
        Value::String(s) => {
            debug!("{} given as bare string other than \"*\": {}", field, s);
            Err(DecodeError::InvalidFieldShape(field.to_string()))
        }
        _ => Err(invalid_shape(field, value)),
    }
}
