use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Failures produced while decoding a policy document.
///
/// Decoding is all-or-nothing: the first offending value aborts the decode and no partial policy is returned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodeError {
    /// The input is not valid JSON, or its top level is not an object.
    MalformedJson(String),

    /// The `Statement` value (or one of its array elements) is not a statement object.
    MalformedStatement(String),

    /// A recognized field holds a JSON value of a shape its normalization rule does not accept.
    InvalidFieldShape(String),

    /// A required field is absent.
    MissingField(String),

    /// An effect string is neither `Allow` nor `Deny`. Only produced by [`crate::Effect`] parsing; decoding itself
    /// does not validate effects.
    InvalidEffect(String),
}

impl DecodeError {
    /// The name of the source key responsible for this error, if there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidFieldShape(field) | Self::MissingField(field) => Some(field.as_str()),
            _ => None,
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::MalformedJson(msg) => write!(f, "Malformed JSON: {}", msg),
            Self::MalformedStatement(msg) => write!(f, "Malformed statement: {}", msg),
            Self::InvalidFieldShape(field) => write!(f, "Invalid shape for field: {}", field),
            Self::MissingField(field) => write!(f, "Missing field: {}", field),
            Self::InvalidEffect(effect) => write!(f, "Invalid effect: {}", effect),
        }
    }
}

impl Error for DecodeError {}

#[cfg(test)]
mod tests {
    use {
        crate::DecodeError,
        pretty_assertions::{assert_eq, assert_ne},
    };

    #[test_log::test]
    fn test_display() {
        let _ = format!("{:?}", DecodeError::MalformedJson("EOF".to_string()));
        assert_eq!(DecodeError::MalformedJson("EOF".to_string()).to_string(), "Malformed JSON: EOF");
        assert_eq!(
            DecodeError::MalformedStatement("expected an object".to_string()).to_string(),
            "Malformed statement: expected an object"
        );
        assert_eq!(
            DecodeError::InvalidFieldShape("Action".to_string()).to_string(),
            "Invalid shape for field: Action"
        );
        assert_eq!(DecodeError::MissingField("Version".to_string()).to_string(), "Missing field: Version");
        assert_eq!(DecodeError::InvalidEffect("Maybe".to_string()).to_string(), "Invalid effect: Maybe");
    }

    #[test_log::test]
    fn test_field() {
        assert_eq!(DecodeError::InvalidFieldShape("Resource".to_string()).field(), Some("Resource"));
        assert_eq!(DecodeError::MissingField("Version".to_string()).field(), Some("Version"));
        assert_eq!(DecodeError::MalformedJson("x".to_string()).field(), None);
        assert_eq!(DecodeError::MalformedStatement("x".to_string()).field(), None);
    }

    #[test_log::test]
    fn test_eq() {
        let e1a = DecodeError::InvalidFieldShape("Action".to_string());
        let e1b = DecodeError::InvalidFieldShape("Action".to_string());
        let e2 = DecodeError::InvalidFieldShape("NotAction".to_string());
        let e3 = DecodeError::MissingField("Action".to_string());

        assert_eq!(e1a, e1b);
        assert_ne!(e1a, e2);
        assert_ne!(e1a, e3);
        assert_ne!(e2, e3);
    }
}
