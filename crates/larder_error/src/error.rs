//! Top-level error wrapper types.

use crate::{ConfigError, FieldError, SecurityError, StoreError};

/// Union of the error families raised by the larder crates.
///
/// # Examples
///
/// ```
/// use larder_error::{LarderError, StoreError, StoreErrorKind};
///
/// let store_err = StoreError::new(StoreErrorKind::Connection("refused".to_string()));
/// let err: LarderError = store_err.into();
/// assert!(format!("{}", err).contains("Store Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum LarderErrorKind {
    /// Key-value store error
    #[from(StoreError)]
    Store(StoreError),
    /// Input bound violation
    #[from(SecurityError)]
    Security(SecurityError),
    /// Unknown configuration field
    #[from(FieldError)]
    Field(FieldError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Larder error with kind discrimination.
///
/// # Examples
///
/// ```
/// use larder_error::{ConfigError, LarderResult};
///
/// fn might_fail() -> LarderResult<()> {
///     Err(ConfigError::new("missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Larder Error: {}", _0)]
pub struct LarderError(Box<LarderErrorKind>);

impl LarderError {
    /// Create a new error from a kind.
    pub fn new(kind: LarderErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LarderErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to LarderErrorKind
impl<T> From<T> for LarderError
where
    T: Into<LarderErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for larder operations.
///
/// # Examples
///
/// ```
/// use larder_error::{LarderResult, StoreError, StoreErrorKind};
///
/// fn fetch_state() -> LarderResult<String> {
///     Err(StoreError::new(StoreErrorKind::Command("WRONGTYPE".to_string())))?
/// }
/// ```
pub type LarderResult<T> = std::result::Result<T, LarderError>;
