//! Extended type wrappers
//!
//! Pure data holders with construction-time validation. Instances are created
//! either by explicit construction in the script layer or by the converter
//! when decoding a wire value; they are immutable value objects.

use base64::Engine;
use bson::oid;
use std::fmt;
use uuid::Uuid;

use crate::error::ConvertError;
use crate::types::dynamic::DynamicValue;
use crate::types::timestamp::Timestamp;

/// Binary subtype carrying a UUID payload (wire protocol contract value).
pub const UUID_SUBTYPE: u8 = 4;

/// Length in bytes of a UUID binary payload.
pub const UUID_PAYLOAD_LEN: usize = 16;

/// Extended type instance, as seen from the dynamic side.
///
/// Each variant is a BSON concept with no native scripting-language
/// equivalent. The converter dispatches on this enum once at the boundary
/// instead of probing value shapes repeatedly.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtendedValue {
    /// 12-byte document identifier
    ObjectId(ObjectId),

    /// Explicit 32-bit integer
    NumberInt(NumberInt),

    /// Explicit 64-bit integer
    NumberLong(NumberLong),

    /// UTC timestamp with per-second ordinal
    Timestamp(Timestamp),

    /// Sentinel sorting below every other wire value
    MinKey,

    /// Sentinel sorting above every other wire value
    MaxKey,

    /// Binary payload with subtype tag
    BinData(BinData),

    /// Database reference (namespace + id)
    DbRef(DbRef),

    /// Code value holding function source text
    Code(Code),
}

/// Wrapper around a 12-byte BSON ObjectId.
///
/// Equality and string form delegate to the underlying bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(oid::ObjectId);

impl ObjectId {
    /// Generate a fresh ObjectId.
    pub fn new() -> Self {
        Self(oid::ObjectId::new())
    }

    /// Wrap an existing driver ObjectId.
    pub fn from_oid(id: oid::ObjectId) -> Self {
        Self(id)
    }

    /// Parse a 24-character hex string.
    pub fn parse_str(hex: &str) -> Result<Self, ConvertError> {
        oid::ObjectId::parse_str(hex)
            .map(Self)
            .map_err(|e| ConvertError::InvalidFormat(format!("invalid ObjectId: {e}")))
    }

    /// Underlying driver ObjectId.
    pub fn as_oid(&self) -> oid::ObjectId {
        self.0
    }

    /// Hex string form of the underlying bytes.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId(\"{}\")", self.0.to_hex())
    }
}

/// Explicit 32-bit integer.
///
/// The host numeric model has no distinct integer representation, so explicit
/// width must be requested through this wrapper rather than inferred from a
/// plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumberInt(i32);

impl NumberInt {
    /// Construct from an `i64`, failing when the value does not fit 32 bits.
    pub fn from_i64(value: i64) -> Result<Self, ConvertError> {
        i32::try_from(value).map(Self).map_err(|_| ConvertError::Range {
            target: "NumberInt",
            value: value.to_string(),
        })
    }

    /// Construct from a host number, failing on fractional or out-of-range
    /// values.
    pub fn from_f64(value: f64) -> Result<Self, ConvertError> {
        if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
            return Err(ConvertError::Range {
                target: "NumberInt",
                value: value.to_string(),
            });
        }
        Ok(Self(value as i32))
    }

    /// Wrapped value.
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl From<i32> for NumberInt {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for NumberInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NumberInt({})", self.0)
    }
}

/// Explicit 64-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumberLong(i64);

impl NumberLong {
    /// Construct from a host number, failing on fractional or out-of-range
    /// values.
    pub fn from_f64(value: f64) -> Result<Self, ConvertError> {
        if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return Err(ConvertError::Range {
                target: "NumberLong",
                value: value.to_string(),
            });
        }
        Ok(Self(value as i64))
    }

    /// Wrapped value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for NumberLong {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NumberLong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NumberLong({})", self.0)
    }
}

/// Binary payload with subtype tag.
///
/// Subtype 4 denotes a UUID-carrying payload with a fixed 16-byte length.
/// The wire protocol stores the UUID words little-endian: the low 8 bytes
/// hold the most-significant 64 bits of the UUID, the high 8 bytes the
/// least-significant 64 bits (the reverse of the UUID's natural big-endian
/// reading).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinData {
    subtype: u8,
    bytes: Vec<u8>,
}

impl BinData {
    /// Construct a binary payload, validating the subtype-4 length contract.
    pub fn new(subtype: u8, bytes: Vec<u8>) -> Result<Self, ConvertError> {
        if subtype == UUID_SUBTYPE && bytes.len() != UUID_PAYLOAD_LEN {
            return Err(ConvertError::InvalidFormat(format!(
                "UUID binary payload must be {} bytes, got {}",
                UUID_PAYLOAD_LEN,
                bytes.len()
            )));
        }
        Ok(Self { subtype, bytes })
    }

    /// Encode a UUID into a subtype-4 payload using the wire byte order.
    pub fn from_uuid(uuid: Uuid) -> Self {
        let (hi, lo) = uuid.as_u64_pair();
        let mut bytes = Vec::with_capacity(UUID_PAYLOAD_LEN);
        bytes.extend_from_slice(&hi.to_le_bytes());
        bytes.extend_from_slice(&lo.to_le_bytes());
        Self {
            subtype: UUID_SUBTYPE,
            bytes,
        }
    }

    /// Decode the payload as a UUID.
    ///
    /// Returns `None` unless this is a subtype-4 payload of exactly 16 bytes.
    pub fn to_uuid(&self) -> Option<Uuid> {
        if self.subtype != UUID_SUBTYPE || self.bytes.len() != UUID_PAYLOAD_LEN {
            return None;
        }
        let hi = u64::from_le_bytes(self.bytes[..8].try_into().ok()?);
        let lo = u64::from_le_bytes(self.bytes[8..].try_into().ok()?);
        Some(Uuid::from_u64_pair(hi, lo))
    }

    /// Subtype tag.
    pub fn subtype(&self) -> u8 {
        self.subtype
    }

    /// Raw payload bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into the raw payload bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Hexadecimal form of the payload, for diagnostics.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Display for BinData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        write!(f, "BinData({},\"{}\")", self.subtype, encoded)
    }
}

/// Database reference: a namespace paired with a document id.
///
/// The id is a dynamic value on this side of the boundary; the converter
/// translates it recursively in both directions.
#[derive(Debug, Clone, PartialEq)]
pub struct DbRef {
    /// Referenced namespace (collection name)
    pub namespace: String,

    /// Referenced document id
    pub id: Box<DynamicValue>,
}

impl DbRef {
    /// Construct a reference to `id` within `namespace`.
    pub fn new(namespace: impl Into<String>, id: DynamicValue) -> Self {
        Self {
            namespace: namespace.into(),
            id: Box::new(id),
        }
    }
}

impl fmt::Display for DbRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DBRef(\"{}\", ...)", self.namespace)
    }
}

/// Code value wrapping function source text.
///
/// Constructed from a dynamic function value by asking the script runtime to
/// decompile it; this type never parses or evaluates the source itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code(pub String);

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
