//! Encode direction: dynamic values to wire values

use chrono::{DateTime as ChronoDateTime, NaiveDateTime, Utc};
use mongodb::bson::{Binary, Bson, DateTime, Document, Regex, spec::BinarySubtype};
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::types::dynamic::{Callable, DynamicValue};
use crate::types::extended::ExtendedValue;

use super::Bsonizer;

/// Shell-style date layouts accepted for `"$date"` values, tried in order.
const SHELL_DATE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S%.3fZ"];

impl Bsonizer {
    /// Convert a dynamic value to its wire representation.
    ///
    /// The mapping is total for the recognized shapes; an opaque host object
    /// fails with `UnsupportedType` naming the offending class. When
    /// `date_format` is supplied, date values encode as formatted UTC strings
    /// instead of wire dates.
    ///
    /// # Arguments
    /// * `value` - Dynamic value to convert
    /// * `date_format` - Optional strftime-style layout for date values
    ///
    /// # Returns
    /// * `Result<Bson>` - Wire value or conversion error
    pub fn to_wire(&self, value: &DynamicValue, date_format: Option<&str>) -> Result<Bson> {
        let wire = match value {
            DynamicValue::Null => Bson::Null,
            DynamicValue::Undefined => Bson::Undefined,
            DynamicValue::Bool(b) => Bson::Boolean(*b),

            // The host numeric model has no distinct integer representation;
            // integral kinds widen to double on the wire.
            DynamicValue::Int(n) => Bson::Double(f64::from(*n)),
            DynamicValue::Long(n) => Bson::Double(*n as f64),
            DynamicValue::Double(n) => Bson::Double(*n),

            DynamicValue::String(s) => Bson::String(s.clone()),

            DynamicValue::List(items) => {
                let mut array = Vec::with_capacity(items.len());
                for item in items {
                    array.push(self.to_wire(item, date_format)?);
                }
                Bson::Array(array)
            }

            DynamicValue::Object(pairs) => self.object_to_wire(pairs, date_format)?,

            DynamicValue::Regex(pattern) => Bson::RegularExpression(Regex {
                pattern: pattern.source().to_string(),
                options: pattern.flags_string(),
            }),

            // Bare constructor references for the sentinels are recognized
            // before the generic function path.
            DynamicValue::Function(Callable::MinKeyRef) => Bson::MinKey,
            DynamicValue::Function(Callable::MaxKeyRef) => Bson::MaxKey,
            DynamicValue::Function(Callable::Function(function)) => {
                let source = self.factory.decompile(function)?;
                Bson::JavaScriptCode(source)
            }

            DynamicValue::Date(millis) => match date_format {
                Some(layout) => Bson::String(format_utc(*millis, layout)?),
                None => Bson::DateTime(DateTime::from_millis(*millis)),
            },

            DynamicValue::Extended(extended) => self.extended_to_wire(extended, date_format)?,

            DynamicValue::HostObject { class } => {
                return Err(ConvertError::UnsupportedType(class.clone()).into());
            }
        };

        Ok(wire)
    }

    /// Convert a keyed mapping, honoring the `"$date"` special case.
    ///
    /// A key literally named `"$date"` whose string value parses against one
    /// of the shell date layouts replaces the entire enclosing value with the
    /// parsed date. On parse failure the key converts like any other.
    fn object_to_wire(
        &self,
        pairs: &[(String, DynamicValue)],
        date_format: Option<&str>,
    ) -> Result<Bson> {
        let mut document = Document::new();

        for (key, value) in pairs {
            if key == "$date" {
                if let Some(millis) = value.as_str().and_then(parse_shell_date) {
                    return Ok(Bson::DateTime(DateTime::from_millis(millis)));
                }
                debug!("$date value did not parse, converting as ordinary key");
            }
            document.insert(key.clone(), self.to_wire(value, date_format)?);
        }

        Ok(Bson::Document(document))
    }

    /// Unwrap an extended type instance to its wire form.
    fn extended_to_wire(
        &self,
        extended: &ExtendedValue,
        date_format: Option<&str>,
    ) -> Result<Bson> {
        let wire = match extended {
            ExtendedValue::ObjectId(id) => Bson::ObjectId(id.as_oid()),
            ExtendedValue::NumberInt(n) => Bson::Int32(n.value()),
            ExtendedValue::NumberLong(n) => Bson::Int64(n.value()),

            ExtendedValue::Timestamp(requested) => {
                let resolved = self.timestamps.resolve(*requested);
                Bson::Timestamp(mongodb::bson::Timestamp {
                    time: resolved.time,
                    increment: resolved.increment,
                })
            }

            ExtendedValue::MinKey => Bson::MinKey,
            ExtendedValue::MaxKey => Bson::MaxKey,

            ExtendedValue::BinData(bin) => Bson::Binary(Binary {
                subtype: BinarySubtype::from(bin.subtype()),
                bytes: bin.bytes().to_vec(),
            }),

            ExtendedValue::DbRef(dbref) => {
                let mut document = Document::new();
                document.insert("$ref", Bson::String(dbref.namespace.clone()));
                document.insert("$id", self.to_wire(&dbref.id, date_format)?);
                Bson::Document(document)
            }

            ExtendedValue::Code(code) => Bson::JavaScriptCode(code.0.clone()),
        };

        Ok(wire)
    }
}

/// Parse a shell-style `"$date"` string against the fixed layouts.
///
/// Returns epoch milliseconds on success, `None` when neither layout matches
/// (the expected "might not be a date" path).
pub(crate) fn parse_shell_date(text: &str) -> Option<i64> {
    for layout in SHELL_DATE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    None
}

/// Format epoch milliseconds as a UTC string using the supplied layout.
fn format_utc(millis: i64, layout: &str) -> Result<String> {
    let datetime: ChronoDateTime<Utc> = ChronoDateTime::from_timestamp_millis(millis)
        .ok_or_else(|| ConvertError::InvalidFormat(format!("date out of range: {millis}")))?;

    // chrono reports bad layout specifiers through the formatter, not the
    // parse step, so render through write! and surface the failure.
    use std::fmt::Write;
    let mut rendered = String::new();
    write!(rendered, "{}", datetime.format(layout))
        .map_err(|_| ConvertError::InvalidFormat(format!("invalid date layout: {layout}")))?;
    Ok(rendered)
}
