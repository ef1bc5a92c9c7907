//! Error types for the larder library.
//!
//! This crate provides the foundation error types used throughout the larder workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use larder_error::{LarderResult, StoreError, StoreErrorKind};
//!
//! fn read_state() -> LarderResult<String> {
//!     Err(StoreError::new(StoreErrorKind::Connection(
//!         "connection refused".to_string(),
//!     )))?
//! }
//!
//! match read_state() {
//!     Ok(state) => println!("Got: {}", state),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod field;
mod security;
mod store;

pub use config::ConfigError;
pub use error::{LarderError, LarderErrorKind, LarderResult};
pub use field::{FieldError, FieldErrorKind};
pub use security::{SecurityError, SecurityErrorKind};
pub use store::{StoreError, StoreErrorKind, StoreResult};
