use bytes::{Bytes, BytesMut};

use crate::data_type::DataType;
use crate::error::{Result, SerializationError};
use crate::reader::GraphBinaryReader;
use crate::serializer::TypeSerializer;
use crate::value::{Binding, Value};
use crate::writer::GraphBinaryWriter;

/// BINDING: the variable as a bare string, then the fully-qualified value.
///
/// The key type is fixed, so it carries no type code or flag; the value can
/// be anything the registry resolves.
#[derive(Debug, Default, Clone, Copy)]
pub struct BindingSerializer;

impl TypeSerializer for BindingSerializer {
    fn data_type(&self) -> DataType {
        DataType::Binding
    }

    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        let Value::Binding(binding) = value else {
            return Err(SerializationError::unexpected(DataType::Binding, value));
        };
        ctx.write_string(binding.variable(), dst)?;
        ctx.write(binding.value(), dst)
    }

    fn read_payload(&self, buf: &mut Bytes, ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        let variable = ctx.read_string(buf)?;
        let value = ctx.read(buf)?;
        Ok(Value::Binding(Binding::new(variable, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeSerializerRegistry;
    use crate::value::ValueMap;

    #[test]
    fn keyed_pair_encoding() {
        let registry = TypeSerializerRegistry::shared();
        let binding = Value::Binding(Binding::new("x", 42));
        let bytes = GraphBinaryWriter::new(registry).encode(&binding).unwrap();

        assert_eq!(
            bytes.as_ref(),
            &[
                0x14, 0x00, // BINDING, present
                0x00, 0x00, 0x00, 0x01, b'x', // string header + "x"
                0x01, 0x00, // INT, present
                0x00, 0x00, 0x00, 0x2A, // 42
            ]
        );
        assert_eq!(
            GraphBinaryReader::new(registry).decode(&bytes).unwrap(),
            binding
        );
    }

    #[test]
    fn bound_value_can_be_composite_or_null() {
        let registry = TypeSerializerRegistry::shared();
        let mut map = ValueMap::new();
        map.insert("a".into(), Value::Binding(Binding::new("inner", Value::Null)));

        for value in [
            Value::Binding(Binding::new("m", Value::Map(map))),
            Value::Binding(Binding::new("", Value::Null)),
        ] {
            let bytes = GraphBinaryWriter::new(registry).encode(&value).unwrap();
            assert_eq!(
                GraphBinaryReader::new(registry).decode(&bytes).unwrap(),
                value
            );
        }
    }

    #[test]
    fn truncated_value_half_rejected() {
        let reader = GraphBinaryReader::new(TypeSerializerRegistry::shared());
        let bytes = [0x14, 0x00, 0x00, 0x00, 0x00, 0x01, b'x', 0x01, 0x00, 0x00];
        assert!(matches!(
            reader.decode(&bytes),
            Err(SerializationError::Truncated { .. })
        ));
    }
}
