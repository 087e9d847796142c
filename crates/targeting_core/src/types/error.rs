//! Error types for the domain kernel.

use thiserror::Error;

/// Errors raised while translating wire values into domain types.
///
/// # Examples
/// ```
/// use targeting_core::types::CoreError;
///
/// let err = CoreError::UnknownCode { kind: "damage", code: "XX".to_string() };
/// assert_eq!(err.to_string(), "Unknown damage code: XX");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A wire code does not map onto any known variant
    #[error("Unknown {kind} code: {code}")]
    UnknownCode {
        /// Which enum was being parsed
        kind: &'static str,
        /// The rejected code
        code: String,
    },

    /// A value is outside its permitted range
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },
}

impl CoreError {
    /// Create an unknown code error
    pub fn unknown(kind: &'static str, code: impl Into<String>) -> Self {
        Self::UnknownCode {
            kind,
            code: code.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        let err = CoreError::invalid("readiness", "must be <= 100");
        assert_eq!(err.to_string(), "Invalid value for readiness: must be <= 100");
    }
}
