//! Extended BSON type model
//!
//! This module defines the value types the bridge exchanges with the script
//! runtime and the database:
//! - `dynamic`: the tagged dynamic value union mirroring the runtime's model
//! - `extended`: BSON concepts with no native scripting-language equivalent
//!   (ObjectId, explicit-width integers, sentinel keys, binary payloads, ...)
//! - `regex`: regex pattern wrapper with flag-character validation
//! - `timestamp`: UTC timestamps and the monotonic ordinal generator

pub mod dynamic;
pub mod extended;
pub mod regex;
pub mod timestamp;

// Re-export commonly used types
pub use dynamic::{Callable, DynamicValue, FunctionRef};
pub use extended::{BinData, Code, DbRef, ExtendedValue, NumberInt, NumberLong, ObjectId};
pub use regex::{RegexFlags, RegexPattern};
pub use timestamp::{Timestamp, TimestampGenerator};

use mongodb::bson::Bson;

/// Canonical sort bracket of a wire value.
///
/// Mirrors MongoDB's cross-type comparison order: MinKey sorts strictly below
/// every other type and MaxKey strictly above, with the remaining types in
/// their fixed server-defined brackets. Values in the same bracket compare by
/// content on the server; this function only ranks the brackets.
pub fn sort_bracket(value: &Bson) -> i32 {
    match value {
        Bson::MinKey => -1,
        Bson::Null | Bson::Undefined => 0,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 1,
        Bson::String(_) | Bson::Symbol(_) => 2,
        Bson::Document(_) => 3,
        Bson::Array(_) => 4,
        Bson::Binary(_) => 5,
        Bson::ObjectId(_) => 6,
        Bson::Boolean(_) => 7,
        Bson::DateTime(_) => 8,
        Bson::Timestamp(_) => 9,
        Bson::RegularExpression(_) => 10,
        Bson::JavaScriptCode(_) | Bson::JavaScriptCodeWithScope(_) => 11,
        Bson::MaxKey => 12,
        _ => 3,
    }
}
