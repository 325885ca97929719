use std::fmt;

use crate::error::mongo::format_mongodb_error;

/// Crate-wide `Result` type using [`BridgeError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Top-level error type for bridge operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum BridgeError {
    /// Value conversion errors.
    Convert(ConvertError),

    /// Adaptor and connection errors.
    Adaptor(AdaptorError),

    /// MongoDB driver errors.
    MongoDb(mongodb::error::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Conversion-specific errors.
#[derive(Debug)]
pub enum ConvertError {
    /// A dynamic value's shape has no wire representation, or a wire shape
    /// has no dynamic rendering. Carries the offending shape's name.
    UnsupportedType(String),

    /// An explicit-width integer construction received an out-of-range value.
    Range { target: &'static str, value: String },

    /// Malformed regex flags or malformed binary payload.
    InvalidFormat(String),

    /// The script runtime failed to decompile a function value.
    DecompileFailed(String),
}

/// Adaptor-specific errors.
#[derive(Debug)]
pub enum AdaptorError {
    /// Operation attempted before `connect`.
    NotConnected,

    /// `connect` called on an adaptor that already left the Unconnected state.
    AlreadyConnected,

    /// Failed to establish a connection.
    ConnectionFailed(String),

    /// Namespace string is missing the database/collection separator.
    InvalidNamespace(String),

    /// Invalid operation parameters.
    InvalidParameters(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Convert(e) => write!(f, "Conversion error: {e}"),
            BridgeError::Adaptor(e) => write!(f, "Adaptor error: {e}"),
            BridgeError::MongoDb(e) => format_mongodb_error(f, e),
            BridgeError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::UnsupportedType(class) => {
                write!(f, "no BSON representation for value of class: {class}")
            }
            ConvertError::Range { target, value } => {
                write!(f, "value {value} out of range for {target}")
            }
            ConvertError::InvalidFormat(msg) => write!(f, "invalid format: {msg}"),
            ConvertError::DecompileFailed(msg) => {
                write!(f, "function decompilation failed: {msg}")
            }
        }
    }
}

impl fmt::Display for AdaptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdaptorError::NotConnected => write!(f, "Not connected to MongoDB"),
            AdaptorError::AlreadyConnected => {
                write!(f, "Adaptor already connected; create a fresh adaptor")
            }
            AdaptorError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            AdaptorError::InvalidNamespace(ns) => {
                write!(f, "Invalid namespace (expected db.collection): {ns}")
            }
            AdaptorError::InvalidParameters(msg) => write!(f, "Invalid parameters: {msg}"),
        }
    }
}

impl std::error::Error for BridgeError {}
impl std::error::Error for ConvertError {}
impl std::error::Error for AdaptorError {}

/* ========================= Conversions to BridgeError ========================= */

impl From<ConvertError> for BridgeError {
    fn from(err: ConvertError) -> Self {
        BridgeError::Convert(err)
    }
}

impl From<AdaptorError> for BridgeError {
    fn from(err: AdaptorError) -> Self {
        BridgeError::Adaptor(err)
    }
}

impl From<mongodb::error::Error> for BridgeError {
    fn from(err: mongodb::error::Error) -> Self {
        BridgeError::MongoDb(err)
    }
}

impl From<String> for BridgeError {
    fn from(msg: String) -> Self {
        BridgeError::Generic(msg)
    }
}

impl From<&str> for BridgeError {
    fn from(msg: &str) -> Self {
        BridgeError::Generic(msg.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_error_display() {
        let err = ConvertError::UnsupportedType("XMLHttpRequest".to_string());
        assert!(err.to_string().contains("XMLHttpRequest"));

        let err = ConvertError::Range {
            target: "NumberInt",
            value: "4294967296".to_string(),
        };
        assert!(err.to_string().contains("NumberInt"));
        assert!(err.to_string().contains("4294967296"));
    }

    #[test]
    fn test_adaptor_error_display() {
        let err = AdaptorError::InvalidNamespace("nodot".to_string());
        assert!(err.to_string().contains("nodot"));
    }

    #[test]
    fn test_error_conversion() {
        let bridge: BridgeError = ConvertError::InvalidFormat("bad flags".to_string()).into();
        assert!(matches!(bridge, BridgeError::Convert(_)));

        let bridge: BridgeError = AdaptorError::NotConnected.into();
        assert!(matches!(bridge, BridgeError::Adaptor(_)));

        let bridge: BridgeError = "boom".into();
        assert!(matches!(bridge, BridgeError::Generic(_)));
    }
}
