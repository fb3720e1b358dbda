//! Error types for binding environment variables into records

/// Errors that can occur while binding environment variables into a record.
///
/// The first error met anywhere in the field walk aborts the whole bind.
/// Fields written before the failing one keep their new values.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// The bind target is not a record.
    ///
    /// Occurs when [`bind`](crate::bind) is handed a value whose type is not
    /// a `#[derive(EnvBind)]` struct, e.g. a plain `bool`.
    #[error("bind target is not a mutable reference to a record")]
    NotARecord,

    /// A field declares `#[env(name = "")]`.
    ///
    /// Reported whether or not any environment variable is set.
    #[error("field '{field}' declares an empty environment variable name")]
    EmptyVarName {
        /// Name of the offending field
        field: String,
    },

    /// An environment value could not be converted into the field's type.
    ///
    /// Also wraps a failure inside an un-annotated nested record, tagged with
    /// the outer field's name.
    #[error("failed to parse environment variable '{variable}' into field '{field}': {message}")]
    Parse {
        /// Name of the field being bound
        field: String,
        /// Name of the environment variable, empty when unknown
        variable: String,
        /// Message from the literal parser or custom decoder
        message: String,
    },

    /// The field's type has no decoding strategy.
    ///
    /// Annotated records, maps and nested collections end up here.
    #[error("field '{field}' has a type that cannot be parsed from an environment variable")]
    UnparsableType {
        /// Name of the offending field
        field: String,
    },
}

impl BindError {
    /// Create a parse error
    pub fn parse_error(
        field: impl Into<String>,
        variable: impl Into<String>,
        message: impl std::fmt::Display,
    ) -> Self {
        Self::Parse {
            field: field.into(),
            variable: variable.into(),
            message: message.to_string(),
        }
    }

    /// Create an empty variable name error
    pub fn empty_var_name(field: impl Into<String>) -> Self {
        Self::EmptyVarName {
            field: field.into(),
        }
    }

    /// Create an unparsable type error
    pub fn unparsable_type(field: impl Into<String>) -> Self {
        Self::UnparsableType {
            field: field.into(),
        }
    }

    /// Re-tag an error raised inside a nested record with the outer field.
    pub(crate) fn nested(self, field: &str) -> Self {
        let variable = match &self {
            Self::Parse { variable, .. } => variable.clone(),
            _ => String::new(),
        };
        Self::parse_error(field, variable, self)
    }

    /// Name of the field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotARecord => None,
            Self::EmptyVarName { field }
            | Self::Parse { field, .. }
            | Self::UnparsableType { field } => Some(field),
        }
    }
}
