//! MongoDB Shell Bridge Library
//!
//! This library lets MongoDB-shell-compatible script runtimes operate against
//! a real MongoDB deployment. It converts values between the runtime's dynamic
//! value model and the extended BSON type system, and maps shell-style
//! collection operations (find/insert/remove/update) onto the Rust driver.
//!
//! # Modules
//!
//! - `adaptor`: Shell-style operation adaptor over the MongoDB driver
//! - `config`: Configuration management
//! - `convert`: Bidirectional dynamic-value / BSON converter
//! - `error`: Error types and handling
//! - `runtime`: Script runtime collaborator interface
//! - `types`: Extended BSON type model and timestamp generation
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mongobridge::{adaptor::MongoAdaptor, config::Config, runtime::BasicFactory};
//! use mongobridge::types::DynamicValue;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let mut adaptor = MongoAdaptor::new(
//!         "mongodb://localhost:27017".to_string(),
//!         config.connection,
//!         Arc::new(BasicFactory),
//!     );
//!
//!     adaptor.connect().await?;
//!     let doc = DynamicValue::Object(vec![(
//!         "name".to_string(),
//!         DynamicValue::String("Ada".to_string()),
//!     )]);
//!     adaptor.insert("test.people", &doc).await?;
//!     Ok(())
//! }
//! ```

pub mod adaptor;
pub mod config;
pub mod convert;
pub mod error;
pub mod runtime;
pub mod types;

// Re-export commonly used types
pub use adaptor::{InternalCursor, MongoAdaptor};
pub use config::Config;
pub use convert::Bsonizer;
pub use error::{BridgeError, Result};
pub use runtime::{BasicFactory, ValueFactory};
pub use types::{DynamicValue, ExtendedValue, TimestampGenerator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
