//! Script runtime collaborator interface
//!
//! The converter never parses or evaluates script source itself. Everything
//! it needs from the host runtime (constructing lists, mappings, dates and
//! regexes, assigning properties with host semantics, decompiling functions)
//! goes through the [`ValueFactory`] capability injected at converter
//! construction time. This keeps the converter free of any concrete runtime
//! dependency and independently testable with a stub factory.

use crate::error::{ConvertError, Result};
use crate::types::dynamic::{DynamicValue, FunctionRef};
use crate::types::regex::RegexPattern;

/// Property key used when populating runtime containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKey {
    /// Document field name
    Name(String),

    /// List element index
    Index(usize),
}

/// Injected factory capability over the host script runtime.
///
/// Implementations wrap a real runtime's object system; [`BasicFactory`]
/// provides plain structural construction for tests and embedders that do
/// not need host property semantics.
pub trait ValueFactory: Send + Sync {
    /// Construct an empty list, sized for `capacity` elements.
    fn new_list(&self, capacity: usize) -> DynamicValue;

    /// Construct an empty keyed mapping.
    fn new_object(&self) -> DynamicValue;

    /// Assign `value` at `key` on `target` through the runtime's ordinary
    /// assignment pathway, so runtime-level property semantics apply.
    fn set_property(
        &self,
        target: &mut DynamicValue,
        key: PropertyKey,
        value: DynamicValue,
    ) -> Result<()>;

    /// Construct a date instance from epoch milliseconds.
    fn new_date(&self, epoch_millis: i64) -> DynamicValue;

    /// Construct a regex instance from source text and a flag string.
    fn new_regex(&self, source: &str, flags: &str) -> Result<DynamicValue>;

    /// Decompile a function value back to source text.
    fn decompile(&self, function: &FunctionRef) -> Result<String>;
}

/// Stub factory with plain structural construction.
///
/// Lists are vectors, mappings are ordered pair lists, and decompilation
/// returns the source the handle already carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicFactory;

impl ValueFactory for BasicFactory {
    fn new_list(&self, capacity: usize) -> DynamicValue {
        DynamicValue::List(Vec::with_capacity(capacity))
    }

    fn new_object(&self) -> DynamicValue {
        DynamicValue::Object(Vec::new())
    }

    fn set_property(
        &self,
        target: &mut DynamicValue,
        key: PropertyKey,
        value: DynamicValue,
    ) -> Result<()> {
        match (target, key) {
            (DynamicValue::List(items), PropertyKey::Index(index)) => {
                if index >= items.len() {
                    items.resize(index + 1, DynamicValue::Undefined);
                }
                items[index] = value;
                Ok(())
            }
            (DynamicValue::Object(pairs), PropertyKey::Name(name)) => {
                if let Some(slot) = pairs.iter_mut().find(|(k, _)| *k == name) {
                    slot.1 = value;
                } else {
                    pairs.push((name, value));
                }
                Ok(())
            }
            (_, key) => Err(ConvertError::InvalidFormat(format!(
                "cannot assign {key:?} on non-container value"
            ))
            .into()),
        }
    }

    fn new_date(&self, epoch_millis: i64) -> DynamicValue {
        DynamicValue::Date(epoch_millis)
    }

    fn new_regex(&self, source: &str, flags: &str) -> Result<DynamicValue> {
        Ok(DynamicValue::Regex(RegexPattern::new(source, flags)?))
    }

    fn decompile(&self, function: &FunctionRef) -> Result<String> {
        Ok(function.source.clone())
    }
}
