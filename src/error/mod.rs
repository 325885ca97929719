//! Error handling module for bridge operations.
//!
//! This module provides comprehensive error handling for conversion and
//! adaptor operations with:
//! - Structured error information extraction from MongoDB driver errors
//! - Consistent JSON error formatting for the script runtime's fault reporting
//! - Application-specific error types
//!
//! Driver faults are translated at exactly one point (`mongo::extract_error_info`
//! feeding the `Display` impl of [`BridgeError::MongoDb`]); the original message
//! is preserved and never retried.
//!
//! # Example
//!
//! ```rust,no_run
//! use mongobridge::error::{Result, BridgeError};
//! use mongobridge::error::mongo::extract_error_info;
//!
//! fn handle_error(err: &mongodb::error::Error) {
//!     let info = extract_error_info(err);
//!     println!("{}", info.to_json().unwrap());
//! }
//! ```

pub mod kinds;
pub mod mongo;

// Re-export commonly used types
pub use kinds::{AdaptorError, BridgeError, ConvertError, Result};
pub use mongo::ErrorInfo;
