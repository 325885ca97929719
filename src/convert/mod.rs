//! Bidirectional dynamic-value / BSON converter
//!
//! This module contains the conversion core:
//! - `to_wire`: dynamic script values to extended BSON
//! - `to_dynamic`: extended BSON back to dynamic script values
//!
//! Containers convert recursively; extended type instances unwrap to their
//! wire form; host numbers widen to doubles (explicit width is only available
//! through the `NumberInt`/`NumberLong` wrappers). All dynamic value
//! construction goes through the injected [`ValueFactory`], so the converter
//! carries no concrete runtime dependency.

mod to_dynamic;
mod to_wire;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::runtime::ValueFactory;
use crate::types::timestamp::TimestampGenerator;

/// Bidirectional converter between dynamic values and wire values.
///
/// Cheap to clone; clones share the factory and the timestamp generator.
#[derive(Clone)]
pub struct Bsonizer {
    pub(crate) factory: Arc<dyn ValueFactory>,
    pub(crate) timestamps: Arc<TimestampGenerator>,
}

impl Bsonizer {
    /// Create a converter over the given runtime factory, using the
    /// process-wide timestamp generator.
    pub fn new(factory: Arc<dyn ValueFactory>) -> Self {
        Self {
            factory,
            timestamps: TimestampGenerator::global(),
        }
    }

    /// Create a converter with an isolated timestamp generator.
    pub fn with_generator(factory: Arc<dyn ValueFactory>, timestamps: Arc<TimestampGenerator>) -> Self {
        Self {
            factory,
            timestamps,
        }
    }
}

impl std::fmt::Debug for Bsonizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bsonizer").finish_non_exhaustive()
    }
}
