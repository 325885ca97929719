//! Decode direction: wire values to dynamic values

use mongodb::bson::{Bson, Document};

use crate::error::{ConvertError, Result};
use crate::runtime::PropertyKey;
use crate::types::dynamic::DynamicValue;
use crate::types::extended::{BinData, DbRef, ExtendedValue, NumberLong, ObjectId};
use crate::types::regex::RegexFlags;
use crate::types::timestamp::Timestamp;

use super::Bsonizer;

impl Bsonizer {
    /// Convert a wire value to its dynamic representation.
    ///
    /// Containers are rebuilt through the runtime factory in wire order, so
    /// document key ordering survives the trip and property assignment runs
    /// through the runtime's ordinary pathway. Stored timestamps are never
    /// re-resolved. 64-bit integers keep their width as `NumberLong`; 32-bit
    /// integers narrow to the host's single numeric kind.
    ///
    /// Wire shapes with no dynamic rendering (`Decimal128`, deprecated
    /// pointer types) fail with `UnsupportedType` rather than passing
    /// through as opaque values.
    ///
    /// # Arguments
    /// * `value` - Wire value to convert
    ///
    /// # Returns
    /// * `Result<DynamicValue>` - Dynamic value or conversion error
    pub fn to_dynamic(&self, value: &Bson) -> Result<DynamicValue> {
        let dynamic = match value {
            Bson::Array(items) => {
                let mut list = self.factory.new_list(items.len());
                for (index, item) in items.iter().enumerate() {
                    let converted = self.to_dynamic(item)?;
                    self.factory
                        .set_property(&mut list, PropertyKey::Index(index), converted)?;
                }
                list
            }

            Bson::Document(document) => {
                if let Some(dbref) = as_dbref(document) {
                    let id = self.to_dynamic(dbref.1)?;
                    DynamicValue::Extended(ExtendedValue::DbRef(DbRef::new(dbref.0, id)))
                } else {
                    let mut object = self.factory.new_object();
                    for (key, item) in document {
                        let converted = self.to_dynamic(item)?;
                        self.factory.set_property(
                            &mut object,
                            PropertyKey::Name(key.clone()),
                            converted,
                        )?;
                    }
                    object
                }
            }

            Bson::Symbol(text) => DynamicValue::String(text.clone()),
            Bson::String(text) => DynamicValue::String(text.clone()),
            Bson::Boolean(b) => DynamicValue::Bool(*b),
            Bson::Null => DynamicValue::Null,
            Bson::Undefined => DynamicValue::Undefined,
            Bson::Double(n) => DynamicValue::Double(*n),

            Bson::DateTime(datetime) => self.factory.new_date(datetime.timestamp_millis()),

            Bson::RegularExpression(regex) => {
                // Flags are re-derived from the stored option bits so the
                // dynamic instance carries them in canonical form.
                let flags = RegexFlags::parse(&regex.options)?;
                self.factory.new_regex(&regex.pattern, &flags.to_string())?
            }

            Bson::ObjectId(oid) => {
                DynamicValue::Extended(ExtendedValue::ObjectId(ObjectId::from_oid(*oid)))
            }

            Bson::MinKey => DynamicValue::Extended(ExtendedValue::MinKey),
            Bson::MaxKey => DynamicValue::Extended(ExtendedValue::MaxKey),

            Bson::Timestamp(ts) => DynamicValue::Extended(ExtendedValue::Timestamp(
                Timestamp::new(ts.time, ts.increment),
            )),

            // Decode preserves 64-bit width; the encode direction is the
            // lossy one.
            Bson::Int64(n) => {
                DynamicValue::Extended(ExtendedValue::NumberLong(NumberLong::from(*n)))
            }
            Bson::Int32(n) => DynamicValue::Double(f64::from(*n)),

            // Decoded code is not re-wrapped as a callable.
            Bson::JavaScriptCode(source) => DynamicValue::String(source.clone()),
            Bson::JavaScriptCodeWithScope(scoped) => DynamicValue::String(scoped.code.clone()),

            Bson::Binary(binary) => {
                let bin = BinData::new(u8::from(binary.subtype), binary.bytes.clone())?;
                DynamicValue::Extended(ExtendedValue::BinData(bin))
            }

            other => {
                return Err(ConvertError::UnsupportedType(format!(
                    "{:?}",
                    other.element_type()
                ))
                .into());
            }
        };

        Ok(dynamic)
    }
}

/// Recognize the `{"$ref": <ns>, "$id": <id>}` database reference convention.
fn as_dbref(document: &Document) -> Option<(&str, &Bson)> {
    if document.len() != 2 {
        return None;
    }
    let namespace = match document.get("$ref") {
        Some(Bson::String(ns)) => ns.as_str(),
        _ => return None,
    };
    let id = document.get("$id")?;
    Some((namespace, id))
}
