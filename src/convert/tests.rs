//! Round-trip and property tests for the converter

use std::sync::Arc;

use mongodb::bson::{Binary, Bson, Regex, doc, oid, spec::BinarySubtype};
use uuid::Uuid;

use crate::error::BridgeError;
use crate::runtime::BasicFactory;
use crate::types::dynamic::{Callable, DynamicValue, FunctionRef};
use crate::types::extended::{BinData, Code, DbRef, ExtendedValue, NumberInt, NumberLong, ObjectId};
use crate::types::timestamp::{Timestamp, TimestampGenerator};

use super::Bsonizer;

fn bsonizer() -> Bsonizer {
    Bsonizer::with_generator(Arc::new(BasicFactory), Arc::new(TimestampGenerator::new()))
}

#[test]
fn test_primitive_round_trips() {
    let converter = bsonizer();
    let primitives = [
        DynamicValue::Null,
        DynamicValue::Bool(true),
        DynamicValue::Double(2.5),
        DynamicValue::String("hello".to_string()),
    ];

    for value in primitives {
        let wire = converter.to_wire(&value, None).unwrap();
        let back = converter.to_dynamic(&wire).unwrap();
        assert_eq!(back, value, "round trip changed {value:?}");
    }
}

#[test]
fn test_host_integers_widen_to_double() {
    let converter = bsonizer();
    assert_eq!(
        converter.to_wire(&DynamicValue::Int(7), None).unwrap(),
        Bson::Double(7.0)
    );
    assert_eq!(
        converter.to_wire(&DynamicValue::Long(7), None).unwrap(),
        Bson::Double(7.0)
    );
}

#[test]
fn test_object_id_full_round_trip() {
    let converter = bsonizer();
    let original = Bson::ObjectId(oid::ObjectId::new());

    let dynamic = converter.to_dynamic(&original).unwrap();
    assert!(matches!(
        dynamic,
        DynamicValue::Extended(ExtendedValue::ObjectId(_))
    ));

    let wire = converter.to_wire(&dynamic, None).unwrap();
    assert_eq!(wire, original);
}

#[test]
fn test_document_key_order_preserved() {
    let converter = bsonizer();
    let original = Bson::Document(doc! {"zulu": 1, "alpha": 2, "mike": 3});

    let dynamic = converter.to_dynamic(&original).unwrap();
    let keys: Vec<&str> = dynamic
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, _)| k.as_str())
        .collect();
    assert_eq!(keys, vec!["zulu", "alpha", "mike"]);

    let wire = converter.to_wire(&dynamic, None).unwrap();
    let wire_keys: Vec<&str> = wire.as_document().unwrap().keys().map(|k| k.as_str()).collect();
    assert_eq!(wire_keys, vec!["zulu", "alpha", "mike"]);
}

#[test]
fn test_list_element_order_preserved() {
    let converter = bsonizer();
    let original = Bson::Array(vec![
        Bson::String("first".to_string()),
        Bson::Boolean(false),
        Bson::Double(3.0),
    ]);

    let dynamic = converter.to_dynamic(&original).unwrap();
    let wire = converter.to_wire(&dynamic, None).unwrap();
    assert_eq!(wire, original);
}

#[test]
fn test_dollar_date_replaces_enclosing_value() {
    let converter = bsonizer();
    let value = DynamicValue::Object(vec![(
        "$date".to_string(),
        DynamicValue::String("2020-01-01T00:00:00Z".to_string()),
    )]);

    let wire = converter.to_wire(&value, None).unwrap();
    assert_eq!(
        wire,
        Bson::DateTime(mongodb::bson::DateTime::from_millis(1_577_836_800_000)),
        "the enclosing value should become the parsed date, not a document"
    );
}

#[test]
fn test_dollar_date_parse_failure_falls_back() {
    let converter = bsonizer();
    let value = DynamicValue::Object(vec![(
        "$date".to_string(),
        DynamicValue::String("not-a-date".to_string()),
    )]);

    let wire = converter.to_wire(&value, None).unwrap();
    assert_eq!(
        wire,
        Bson::Document(doc! {"$date": "not-a-date"}),
        "an unparseable $date converts as an ordinary key"
    );
}

#[test]
fn test_int32_decode_then_encode_is_lossy() {
    let converter = bsonizer();

    let dynamic = converter.to_dynamic(&Bson::Int32(42)).unwrap();
    assert_eq!(dynamic, DynamicValue::Double(42.0));

    // Re-encoding the plain numeric value loses the 32-bit width by design.
    let wire = converter.to_wire(&dynamic, None).unwrap();
    assert_eq!(wire, Bson::Double(42.0));
    assert_ne!(wire, Bson::Int32(42));
}

#[test]
fn test_int64_decode_preserves_width() {
    let converter = bsonizer();

    let dynamic = converter.to_dynamic(&Bson::Int64(1 << 40)).unwrap();
    assert_eq!(
        dynamic,
        DynamicValue::Extended(ExtendedValue::NumberLong(NumberLong::from(1_i64 << 40)))
    );

    let wire = converter.to_wire(&dynamic, None).unwrap();
    assert_eq!(wire, Bson::Int64(1 << 40));
}

#[test]
fn test_explicit_width_integers_encode() {
    let converter = bsonizer();
    assert_eq!(
        converter
            .to_wire(
                &DynamicValue::Extended(ExtendedValue::NumberInt(NumberInt::from(5))),
                None
            )
            .unwrap(),
        Bson::Int32(5)
    );
}

#[test]
fn test_uuid_binary_round_trip() {
    let converter = bsonizer();
    let uuid = Uuid::new_v4();
    let payload = BinData::from_uuid(uuid);
    let original = Bson::Binary(Binary {
        subtype: BinarySubtype::Uuid,
        bytes: payload.bytes().to_vec(),
    });

    let dynamic = converter.to_dynamic(&original).unwrap();
    let DynamicValue::Extended(ExtendedValue::BinData(bin)) = &dynamic else {
        panic!("expected BinData, got {dynamic:?}");
    };

    // Most-significant 64 bits come from the first 8 bytes read little-endian.
    let first = u64::from_le_bytes(bin.bytes()[..8].try_into().unwrap());
    assert_eq!(first, uuid.as_u64_pair().0);
    assert_eq!(bin.to_uuid(), Some(uuid));

    // Re-encoding reproduces the original payload exactly.
    let wire = converter.to_wire(&dynamic, None).unwrap();
    assert_eq!(wire, original);
}

#[test]
fn test_generic_binary_round_trip() {
    let converter = bsonizer();
    let original = Bson::Binary(Binary {
        subtype: BinarySubtype::Generic,
        bytes: vec![0xde, 0xad, 0xbe, 0xef],
    });

    let dynamic = converter.to_dynamic(&original).unwrap();
    let wire = converter.to_wire(&dynamic, None).unwrap();
    assert_eq!(wire, original);
}

#[test]
fn test_unset_timestamp_resolved_on_encode() {
    let converter = bsonizer();
    let value = DynamicValue::Extended(ExtendedValue::Timestamp(Timestamp::unset()));

    let wire = converter.to_wire(&value, None).unwrap();
    let Bson::Timestamp(ts) = wire else {
        panic!("expected timestamp, got {wire:?}");
    };
    assert_ne!(ts.time, 0, "sentinel time must never reach the wire");
    assert!(ts.increment >= 1);
}

#[test]
fn test_stored_timestamp_not_re_resolved() {
    let converter = bsonizer();
    let original = Bson::Timestamp(mongodb::bson::Timestamp {
        time: 1_500_000_000,
        increment: 9,
    });

    let dynamic = converter.to_dynamic(&original).unwrap();
    assert_eq!(
        dynamic,
        DynamicValue::Extended(ExtendedValue::Timestamp(Timestamp::new(1_500_000_000, 9)))
    );

    let wire = converter.to_wire(&dynamic, None).unwrap();
    assert_eq!(wire, original);
}

#[test]
fn test_sentinel_constructor_references() {
    let converter = bsonizer();
    assert_eq!(
        converter
            .to_wire(&DynamicValue::Function(Callable::MinKeyRef), None)
            .unwrap(),
        Bson::MinKey
    );
    assert_eq!(
        converter
            .to_wire(&DynamicValue::Function(Callable::MaxKeyRef), None)
            .unwrap(),
        Bson::MaxKey
    );
}

#[test]
fn test_function_decompiles_to_code() {
    let converter = bsonizer();
    let function = DynamicValue::Function(Callable::Function(FunctionRef::from_source(
        "function () { return 1; }",
    )));

    let wire = converter.to_wire(&function, None).unwrap();
    assert_eq!(
        wire,
        Bson::JavaScriptCode("function () { return 1; }".to_string())
    );
}

#[test]
fn test_code_decodes_to_plain_string() {
    let converter = bsonizer();
    let wire = Bson::JavaScriptCode("function () {}".to_string());
    assert_eq!(
        converter.to_dynamic(&wire).unwrap(),
        DynamicValue::String("function () {}".to_string())
    );
}

#[test]
fn test_code_value_encodes() {
    let converter = bsonizer();
    let value = DynamicValue::Extended(ExtendedValue::Code(Code("emit(1)".to_string())));
    assert_eq!(
        converter.to_wire(&value, None).unwrap(),
        Bson::JavaScriptCode("emit(1)".to_string())
    );
}

#[test]
fn test_dbref_round_trip() {
    let converter = bsonizer();
    let original = Bson::Document(doc! {"$ref": "people", "$id": "alice"});

    let dynamic = converter.to_dynamic(&original).unwrap();
    let DynamicValue::Extended(ExtendedValue::DbRef(dbref)) = &dynamic else {
        panic!("expected DbRef, got {dynamic:?}");
    };
    assert_eq!(dbref.namespace, "people");
    assert_eq!(*dbref.id, DynamicValue::String("alice".to_string()));

    let wire = converter.to_wire(&dynamic, None).unwrap();
    assert_eq!(wire, original);
}

#[test]
fn test_regex_round_trip_canonicalizes_flags() {
    let converter = bsonizer();
    let original = Bson::RegularExpression(Regex {
        pattern: "^a.*b$".to_string(),
        options: "mi".to_string(),
    });

    let dynamic = converter.to_dynamic(&original).unwrap();
    let wire = converter.to_wire(&dynamic, None).unwrap();
    assert_eq!(
        wire,
        Bson::RegularExpression(Regex {
            pattern: "^a.*b$".to_string(),
            options: "im".to_string(),
        })
    );
}

#[test]
fn test_symbol_decodes_to_string() {
    let converter = bsonizer();
    assert_eq!(
        converter.to_dynamic(&Bson::Symbol("sym".to_string())).unwrap(),
        DynamicValue::String("sym".to_string())
    );
}

#[test]
fn test_date_format_renders_string() {
    let converter = bsonizer();
    let value = DynamicValue::Date(1_577_836_800_000);

    assert_eq!(
        converter.to_wire(&value, Some("%Y-%m-%d")).unwrap(),
        Bson::String("2020-01-01".to_string())
    );
    assert_eq!(
        converter.to_wire(&value, None).unwrap(),
        Bson::DateTime(mongodb::bson::DateTime::from_millis(1_577_836_800_000))
    );
}

#[test]
fn test_host_object_is_unsupported() {
    let converter = bsonizer();
    let value = DynamicValue::HostObject {
        class: "XMLHttpRequest".to_string(),
    };

    let err = converter.to_wire(&value, None).unwrap_err();
    let BridgeError::Convert(inner) = err else {
        panic!("expected conversion error");
    };
    assert!(inner.to_string().contains("XMLHttpRequest"));
}

#[test]
fn test_nested_containers_round_trip() {
    let converter = bsonizer();
    let original = Bson::Document(doc! {
        "items": [{"n": 1.0}, {"n": 2.0}],
        "meta": {"tags": ["a", "b"], "active": true},
    });

    let dynamic = converter.to_dynamic(&original).unwrap();
    let wire = converter.to_wire(&dynamic, None).unwrap();
    assert_eq!(wire, original);
}
