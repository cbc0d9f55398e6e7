use thiserror::Error;

/// Errors raised by the argument-checking mapping entry points.
///
/// The plain operations on [`Mapper`](crate::Mapper) return the rule's own
/// error untouched. Only the [`Checked`](crate::Checked) view, which accepts
/// optional arguments, needs to tell a missing argument apart from a rule
/// failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError<E> {
    /// A required argument was absent. Raised before any element is mapped.
    #[error("argument `{parameter}` must not be null")]
    NullArgument {
        /// Name of the offending parameter, e.g. `"source"`.
        parameter: &'static str,
    },
    /// The conversion rule failed while mapping an element.
    #[error("conversion rule failed")]
    Conversion(#[source] E),
}

impl<E> MappingError<E> {
    /// Returns the parameter name if this is an argument violation.
    pub fn null_parameter(&self) -> Option<&'static str> {
        match self {
            MappingError::NullArgument { parameter } => Some(*parameter),
            MappingError::Conversion(_) => None,
        }
    }

    /// Unwraps the rule error, if any.
    pub fn into_conversion(self) -> Option<E> {
        match self {
            MappingError::Conversion(error) => Some(error),
            MappingError::NullArgument { .. } => None,
        }
    }
}

/// Errors that can occur when using [`MapperRegistry`](crate::MapperRegistry)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Failed to acquire the registry lock
    #[error("failed to acquire registry lock")]
    LockError,
    /// No rule is registered for the requested source/destination pair
    #[error("no mapping rule registered from `{source_type}` to `{destination_type}`")]
    RuleNotRegistered {
        source_type: &'static str,
        destination_type: &'static str,
    },
    /// A rule exists for the pair but was registered with a different error type
    #[error("mapping rule from `{source_type}` to `{destination_type}` has a different error type")]
    ErrorTypeMismatch {
        source_type: &'static str,
        destination_type: &'static str,
    },
}
