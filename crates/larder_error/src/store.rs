//! Key-value store error types.

/// Key-value store error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// Connection to the store failed or was lost
    #[display("Store connection error: {}", _0)]
    Connection(String),
    /// A command was rejected or returned an unexpected reply
    #[display("Store command error: {}", _0)]
    Command(String),
    /// Readiness probing gave up after the configured attempt bound
    #[display("Store unavailable after {} probe attempts", attempts)]
    Unavailable {
        /// Number of probes issued before giving up
        attempts: u32,
    },
}

/// Key-value store error with source location tracking.
///
/// # Examples
///
/// ```
/// use larder_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::Unavailable { attempts: 3 });
/// assert!(format!("{}", err).contains("unavailable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new StoreError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        let transport = err.is_io_error()
            || err.is_timeout()
            || err.is_connection_refusal()
            || err.is_connection_dropped();
        if transport {
            StoreError::new(StoreErrorKind::Connection(err.to_string()))
        } else {
            StoreError::new(StoreErrorKind::Command(err.to_string()))
        }
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(err: r2d2::Error) -> Self {
        StoreError::new(StoreErrorKind::Connection(err.to_string()))
    }
}

/// Result type for raw store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
