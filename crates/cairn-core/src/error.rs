use thiserror::Error;

/// Dynamic (user-visible) errors. These travel through the normal call-result
/// channel as Error-tagged values; they never unwind out of the core.
///
/// Internal invariant violations (unregistered type tags, tag mismatches on
/// assignment, inconsistent signature trees) are defects in core construction
/// and panic instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("no matching overload for ({symbol}{args})")]
    NoMatch { symbol: String, args: String },

    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("arity mismatch: {0}")]
    Arity(String),

    #[error("{0}")]
    Message(String),
}

impl CoreError {
    pub fn no_match(symbol: impl Into<String>, args: impl Into<String>) -> Self {
        let args = args.into();
        let args = if args.is_empty() {
            args
        } else {
            format!(" {}", args)
        };
        CoreError::NoMatch {
            symbol: symbol.into(),
            args,
        }
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        CoreError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn arity(message: impl Into<String>) -> Self {
        CoreError::Arity(message.into())
    }

    pub fn message(message: impl Into<String>) -> Self {
        CoreError::Message(message.into())
    }

    /// True only for resolution failure, which is produced before any native
    /// overload runs. Errors raised by a matched overload report false here.
    pub fn is_no_match(&self) -> bool {
        matches!(self, CoreError::NoMatch { .. })
    }
}

/// Payload stored under the Error type tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorValue(pub CoreError);

impl Default for ErrorValue {
    fn default() -> Self {
        ErrorValue(CoreError::message("error"))
    }
}
