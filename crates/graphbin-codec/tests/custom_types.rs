//! End-to-end coverage for host-defined types registered by name.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use graphbin_codec::codec::ensure_remaining;
use graphbin_codec::types::BindingSerializer;
use graphbin_codec::{
    downcast, Binding, Capability, ConfigError, Custom, CustomTypeSerializer, CustomValue,
    DataType, GraphBinaryReader, GraphBinaryWriter, RegistryBuilder, Resolved, Result,
    SerializationError, TypeSelector, TypeSerializer, TypeSerializerRegistry, Value, ValueMap,
};

const GEOMETRY: Capability = Capability::new("geometry");

#[derive(Debug, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

impl CustomValue for Point {
    fn capabilities(&self) -> &'static [Capability] {
        &[GEOMETRY]
    }

    fn eq_value(&self, other: &dyn CustomValue) -> bool {
        downcast::<Point>(other) == Some(self)
    }
}

#[derive(Debug, PartialEq)]
struct Polygon(Vec<(i32, i32)>);

impl CustomValue for Polygon {
    fn capabilities(&self) -> &'static [Capability] {
        &[GEOMETRY]
    }

    fn eq_value(&self, other: &dyn CustomValue) -> bool {
        downcast::<Polygon>(other) == Some(self)
    }
}

/// `geo.Point`: two big-endian i32 coordinates.
#[derive(Debug)]
struct PointSerializer;

impl TypeSerializer for PointSerializer {
    fn data_type(&self) -> DataType {
        DataType::Custom
    }

    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        _ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        let point = match value {
            Value::Custom(custom) => custom.downcast_ref::<Point>(),
            _ => None,
        }
        .ok_or_else(|| SerializationError::custom("geo.Point expects a Point"))?;
        dst.put_i32(point.x);
        dst.put_i32(point.y);
        Ok(())
    }

    fn read_payload(&self, buf: &mut Bytes, _ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        ensure_remaining(buf, 8)?;
        let x = buf.get_i32();
        let y = buf.get_i32();
        Ok(Value::Custom(Custom::new(Point { x, y })))
    }
}

impl CustomTypeSerializer for PointSerializer {
    fn type_name(&self) -> &str {
        "geo.Point"
    }
}

fn registry() -> TypeSerializerRegistry {
    TypeSerializerRegistry::builder()
        .add_custom_type(TypeSelector::exact::<Point>(), PointSerializer)
        .expect("register geo.Point")
        .create()
}

fn point(x: i32, y: i32) -> Value {
    Value::Custom(Custom::new(Point { x, y }))
}

#[test]
fn custom_value_wire_layout() {
    let registry = registry();
    let bytes = GraphBinaryWriter::new(&registry).encode(&point(1, -1)).unwrap();

    let mut expected = vec![0x00]; // CUSTOM
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x09]);
    expected.extend_from_slice(b"geo.Point");
    expected.push(0x00); // present
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x01, 0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(bytes.as_ref(), expected.as_slice());

    let decoded = GraphBinaryReader::new(&registry).decode(&bytes).unwrap();
    assert_eq!(decoded, point(1, -1));
}

#[test]
fn registered_custom_type_is_written_with_its_name() {
    let registry = registry();
    assert!(PointSerializer.as_custom().is_none());
    assert!(matches!(
        registry.resolve_value(&point(1, 2)),
        Ok(Resolved::Custom(custom)) if custom.type_name() == "geo.Point"
    ));

    let bytes = GraphBinaryWriter::new(&registry).encode(&point(1, 2)).unwrap();
    assert_eq!(&bytes[..5], &[0x00, 0x00, 0x00, 0x00, 0x09]);
    assert_eq!(&bytes[5..14], b"geo.Point");
}

#[test]
fn custom_type_round_trips_without_built_ins() {
    let registry = RegistryBuilder::empty()
        .add_custom_type(TypeSelector::exact::<Point>(), PointSerializer)
        .unwrap()
        .create();
    assert!(registry.data_types().is_empty());

    let bytes = GraphBinaryWriter::new(&registry).encode(&point(4, 5)).unwrap();
    assert_eq!(bytes.len(), 1 + 4 + 9 + 1 + 8);
    assert_eq!(
        GraphBinaryReader::new(&registry).decode(&bytes).unwrap(),
        point(4, 5)
    );
}

#[test]
fn binding_keys_do_not_need_a_string_serializer() {
    let registry = RegistryBuilder::empty()
        .add(TypeSelector::exact::<Binding>(), BindingSerializer)
        .unwrap()
        .add_custom_type(TypeSelector::exact::<Point>(), PointSerializer)
        .unwrap()
        .create();
    let value = Value::Binding(Binding::new("p", point(0, 1)));

    let bytes = GraphBinaryWriter::new(&registry).encode(&value).unwrap();
    assert_eq!(&bytes[..7], &[0x14, 0x00, 0x00, 0x00, 0x00, 0x01, b'p']);
    assert_eq!(GraphBinaryReader::new(&registry).decode(&bytes).unwrap(), value);
}

#[test]
fn custom_values_nest_inside_built_in_collections() {
    let registry = registry();
    let mut map = ValueMap::new();
    map.insert(point(0, 0), Value::List(vec![point(2, 3), Value::Null]));
    let value = Value::Map(map);

    let bytes = GraphBinaryWriter::new(&registry).encode(&value).unwrap();
    assert_eq!(GraphBinaryReader::new(&registry).decode(&bytes).unwrap(), value);
}

#[test]
fn null_custom_value_decodes_as_null() {
    let registry = registry();
    let bytes = [
        0x00, 0x00, 0x00, 0x00, 0x09, b'g', b'e', b'o', b'.', b'P', b'o', b'i', b'n', b't', 0x01,
    ];
    assert_eq!(
        GraphBinaryReader::new(&registry).decode(&bytes).unwrap(),
        Value::Null
    );
}

#[test]
fn shared_registry_does_not_know_custom_types() {
    let err = graphbin_codec::encode(&point(1, 2)).unwrap_err();
    assert!(matches!(err, SerializationError::SerializerNotFound(_)));

    let bytes = GraphBinaryWriter::new(&registry()).encode(&point(1, 2)).unwrap();
    let err = graphbin_codec::decode(&bytes).unwrap_err();
    assert!(matches!(err, SerializationError::CustomTypeNotFound(name) if name == "geo.Point"));
}

#[test]
fn capability_selector_covers_every_geometry() {
    let registry = TypeSerializerRegistry::builder()
        .add_custom_type(GEOMETRY, PointSerializer)
        .unwrap()
        .create();
    let polygon = Value::Custom(Custom::new(Polygon(vec![(0, 0)])));

    // Resolution succeeds through the capability; the serializer itself
    // then rejects the shape it cannot write.
    let serializer = registry.serializer_for_value(&polygon).unwrap();
    assert_eq!(serializer.data_type(), DataType::Custom);
    assert!(matches!(
        GraphBinaryWriter::new(&registry).encode(&polygon),
        Err(SerializationError::Custom(_))
    ));
}

#[test]
fn custom_serializers_cannot_be_added_as_built_ins() {
    let err = TypeSerializerRegistry::builder()
        .add(TypeSelector::exact::<Point>(), PointSerializer)
        .unwrap_err();
    assert_eq!(err, ConfigError::CustomDataType);
}

#[test]
fn lookup_by_name_only() {
    let registry = registry();
    assert_eq!(
        registry.serializer_for_custom_type("geo.Point").unwrap().type_name(),
        "geo.Point"
    );
    assert!(matches!(
        registry.serializer_for_data_type(DataType::Custom),
        Err(SerializationError::CustomLookupByDataType)
    ));
    assert_eq!(registry.custom_type_names(), vec!["geo.Point"]);
}
