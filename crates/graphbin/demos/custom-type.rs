//! Register a host type under a custom name and round-trip it.
//!
//! Run with: `cargo run -p graphbin --example custom-type`

use bytes::{Buf, BufMut, Bytes, BytesMut};
use graphbin::codec::codec::ensure_remaining;
use graphbin::codec::{
    downcast, Custom, CustomTypeSerializer, CustomValue, DataType, GraphBinaryReader,
    GraphBinaryWriter, Result, SerializationError, TypeSelector, TypeSerializer,
    TypeSerializerRegistry, Value,
};

#[derive(Debug, PartialEq)]
struct Duration {
    seconds: i64,
    nanos: i32,
}

impl CustomValue for Duration {
    fn eq_value(&self, other: &dyn CustomValue) -> bool {
        downcast::<Duration>(other) == Some(self)
    }
}

#[derive(Debug)]
struct DurationSerializer;

impl TypeSerializer for DurationSerializer {
    fn data_type(&self) -> DataType {
        DataType::Custom
    }

    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        _ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        let Value::Custom(custom) = value else {
            return Err(SerializationError::unexpected(DataType::Custom, value));
        };
        let duration = custom
            .downcast_ref::<Duration>()
            .ok_or_else(|| SerializationError::custom("demo.Duration expects a Duration"))?;
        dst.put_i64(duration.seconds);
        dst.put_i32(duration.nanos);
        Ok(())
    }

    fn read_payload(&self, buf: &mut Bytes, _ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        ensure_remaining(buf, 12)?;
        let seconds = buf.get_i64();
        let nanos = buf.get_i32();
        Ok(Value::Custom(Custom::new(Duration { seconds, nanos })))
    }

    fn as_custom(&self) -> Option<&dyn CustomTypeSerializer> {
        Some(self)
    }
}

impl CustomTypeSerializer for DurationSerializer {
    fn type_name(&self) -> &str {
        "demo.Duration"
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let registry = TypeSerializerRegistry::builder()
        .add_custom_type(TypeSelector::exact::<Duration>(), DurationSerializer)?
        .create();

    let value = Value::List(vec![
        Value::Custom(Custom::new(Duration {
            seconds: 90,
            nanos: 500,
        })),
        Value::Null,
    ]);

    let bytes = GraphBinaryWriter::new(&registry).encode(&value)?;
    println!("encoded {} bytes: {:02x?}", bytes.len(), bytes.as_ref());

    let decoded = GraphBinaryReader::new(&registry).decode(&bytes)?;
    println!("decoded: {decoded:?}");
    assert_eq!(decoded, value);
    Ok(())
}
