//! Input bound violation types.

/// Security error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SecurityErrorKind {
    /// An argument exceeded the maximum accepted input length
    #[display("input '{}' exceeds the {}-character bound ({} characters)", what, max, len)]
    InputBound {
        /// Name of the offending argument
        what: String,
        /// Number of characters received
        len: usize,
        /// Maximum number of characters accepted
        max: usize,
    },
}

/// Security error with source location tracking.
///
/// Raised when user-supplied input violates a storage bound; the offending
/// operation performs no store access.
///
/// # Examples
///
/// ```
/// use larder_error::{SecurityError, SecurityErrorKind};
///
/// let err = SecurityError::new(SecurityErrorKind::InputBound {
///     what: "response".to_string(),
///     len: 2000,
///     max: 1100,
/// });
/// assert!(format!("{}", err).contains("1100"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Security Error: {} at line {} in {}", kind, line, file)]
pub struct SecurityError {
    /// The kind of error that occurred
    pub kind: SecurityErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SecurityError {
    /// Create a new SecurityError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SecurityErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
