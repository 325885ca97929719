//! Dynamic value model
//!
//! Tagged union over the observable shapes of the host script runtime's
//! values. The shape decision is made once, at the boundary where a value
//! enters the core; the converter then dispatches on the variant instead of
//! repeatedly probing an opaque object.

use crate::types::extended::ExtendedValue;
use crate::types::regex::RegexPattern;

/// A value from the embedded script runtime's value model.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicValue {
    /// Script null
    Null,

    /// Script undefined
    Undefined,

    /// Boolean
    Bool(bool),

    /// Host integer kind; widens to double on encode
    Int(i32),

    /// Host long kind; widens to double on encode
    Long(i64),

    /// Host floating-point number
    Double(f64),

    /// String
    String(String),

    /// Ordered list
    List(Vec<DynamicValue>),

    /// Keyed mapping; pairs kept in assignment order
    Object(Vec<(String, DynamicValue)>),

    /// Date instance, epoch milliseconds
    Date(i64),

    /// Host regular expression
    Regex(RegexPattern),

    /// Callable value
    Function(Callable),

    /// Extended type instance
    Extended(ExtendedValue),

    /// Opaque host object recognized only by class name; has no wire
    /// representation
    HostObject {
        /// Host-side class name, reported in the conversion fault
        class: String,
    },
}

/// A callable dynamic value.
///
/// Bare references to the MinKey/MaxKey constructors are recognized as their
/// sentinels before the generic function path; scripts use the constructors
/// without calling them and expect the sentinel semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    /// Unconstructed reference to the MinKey constructor
    MinKeyRef,

    /// Unconstructed reference to the MaxKey constructor
    MaxKeyRef,

    /// Ordinary script function
    Function(FunctionRef),
}

/// Handle to a script function, decompilable through the runtime collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionRef {
    /// Function name, when the runtime knows one
    pub name: Option<String>,

    /// Source text as held by the runtime
    pub source: String,
}

impl FunctionRef {
    /// Handle over the given source text.
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            name: None,
            source: source.into(),
        }
    }
}

impl DynamicValue {
    /// String content, when this value is string-shaped.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Key/value pairs, when this value is mapping-shaped.
    pub fn as_object(&self) -> Option<&[(String, DynamicValue)]> {
        match self {
            DynamicValue::Object(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Lookup of a key in a mapping-shaped value.
    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl From<&str> for DynamicValue {
    fn from(s: &str) -> Self {
        DynamicValue::String(s.to_owned())
    }
}

impl From<String> for DynamicValue {
    fn from(s: String) -> Self {
        DynamicValue::String(s)
    }
}

impl From<f64> for DynamicValue {
    fn from(n: f64) -> Self {
        DynamicValue::Double(n)
    }
}

impl From<bool> for DynamicValue {
    fn from(b: bool) -> Self {
        DynamicValue::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_lookup() {
        let obj = DynamicValue::Object(vec![
            ("a".to_string(), DynamicValue::Int(1)),
            ("b".to_string(), DynamicValue::Bool(true)),
        ]);
        assert_eq!(obj.get("b"), Some(&DynamicValue::Bool(true)));
        assert_eq!(obj.get("c"), None);
        assert_eq!(DynamicValue::Null.get("a"), None);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(DynamicValue::from("hi").as_str(), Some("hi"));
        assert_eq!(DynamicValue::Bool(true).as_str(), None);
    }
}
