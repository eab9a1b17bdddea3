//! From schema metadata to encoded column values

use chrono::NaiveDate;
use cqlkit::codec::DateIntCodec;
use cqlkit::parser::UserTypeDefinition;
use cqlkit::{CodecRegistry, CqlValue, DataType, ProtocolVersion, TypeCodec, load_user_types, parse};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn keyspace() -> std::sync::Arc<cqlkit::TypeRegistry> {
    load_user_types(
        "shop",
        &[
            UserTypeDefinition::new(
                "order",
                [
                    ("id", "timeuuid"),
                    ("lines", "list<frozen<\"LineItem\">>"),
                    ("placed", "date"),
                ],
            ),
            UserTypeDefinition::new(
                "LineItem",
                [("sku", "text"), ("qty", "smallint"), ("tags", "set<text>")],
            ),
        ],
    )
    .unwrap()
}

const ORDER: &str = "{id:fe2b4360-28c6-11e2-81c1-0800200c9a66,\
lines:[{sku:'A-1',qty:2,tags:{'gift'}},{sku:'B-2',qty:1,tags:NULL}],\
placed:'2024-03-15'}";

#[test]
fn order_column_round_trips() {
    let registry = keyspace();
    let column = parse("frozen<order>", &registry, false).unwrap();
    assert!(column.is_frozen());

    let codec = CodecRegistry::new().codec_for::<CqlValue>(&column).unwrap();
    let value = codec.parse(ORDER).unwrap().unwrap();
    assert_eq!(
        value.field("placed"),
        Some(&CqlValue::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()))
    );
    assert_eq!(codec.format(Some(&value)).unwrap(), ORDER);

    let bytes = codec.serialize(&value).unwrap();
    assert_eq!(codec.deserialize(Some(&bytes)).unwrap(), Some(value));
}

#[test]
fn line_item_fields_follow_declaration_order() {
    let registry = keyspace();
    let line_item = registry.get("\"LineItem\"").unwrap();
    assert_eq!(line_item.field_names().unwrap(), vec!["sku", "qty", "tags"]);
    assert_eq!(
        line_item.as_cql_query().unwrap(),
        "CREATE TYPE shop.\"LineItem\" (sku text, qty smallint, tags set<text>);"
    );
}

#[rstest]
#[case("date", "'2147483648'", 0)]
#[case("date", "'2024-03-15'", 19797)]
fn date_column_as_day_offset(#[case] column: &str, #[case] literal: &str, #[case] days: i32) {
    let column: DataType = parse(column, &keyspace(), false).unwrap();
    let codecs = CodecRegistry::with_protocol_version(ProtocolVersion::V3);
    codecs.register::<i32>(DateIntCodec);

    let codec = codecs.codec_for::<i32>(&column).unwrap();
    assert_eq!(codec.parse(literal).unwrap(), Some(days));

    let native = codecs.codec_for::<NaiveDate>(&column).unwrap();
    let bytes = codec.serialize(&days).unwrap();
    let date = native.deserialize(Some(&bytes)).unwrap().unwrap();
    assert_eq!(codec.parse(&format!("'{date}'")).unwrap(), Some(days));
}
