//! Unknown configuration field types.

/// Field lookup error conditions.
///
/// These indicate a programming error in the caller (a name outside the
/// recognized set), not a runtime store condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FieldErrorKind {
    /// Name is not a recognized moderation setting or synonym
    #[display("unknown moderation setting '{}'", _0)]
    ModerationSetting(String),
    /// Name is not a recognized channel field
    #[display("unknown channel field '{}'", _0)]
    ChannelField(String),
    /// Name is not a recognized event message field
    #[display("unknown event message field '{}'", _0)]
    EventMessage(String),
}

/// Field lookup error with source location tracking.
///
/// # Examples
///
/// ```
/// use larder_error::{FieldError, FieldErrorKind};
///
/// let err = FieldError::new(FieldErrorKind::ModerationSetting("banhammer".to_string()));
/// assert!(format!("{}", err).contains("banhammer"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Field Error: {} at line {} in {}", kind, line, file)]
pub struct FieldError {
    /// The kind of error that occurred
    pub kind: FieldErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl FieldError {
    /// Create a new FieldError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FieldErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
