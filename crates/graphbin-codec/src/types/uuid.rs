use bytes::{Buf, BufMut, Bytes, BytesMut};
use uuid::Uuid;

use crate::codec::ensure_remaining;
use crate::data_type::DataType;
use crate::error::{Result, SerializationError};
use crate::reader::GraphBinaryReader;
use crate::serializer::TypeSerializer;
use crate::value::Value;
use crate::writer::GraphBinaryWriter;

/// UUID: 16 bytes, most significant first.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSerializer;

impl TypeSerializer for UuidSerializer {
    fn data_type(&self) -> DataType {
        DataType::Uuid
    }

    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        _ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        match value {
            Value::Uuid(id) => {
                dst.put_slice(id.as_bytes());
                Ok(())
            }
            other => Err(SerializationError::unexpected(DataType::Uuid, other)),
        }
    }

    fn read_payload(&self, buf: &mut Bytes, _ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        ensure_remaining(buf, 16)?;
        let mut raw = [0u8; 16];
        buf.copy_to_slice(&mut raw);
        Ok(Value::Uuid(Uuid::from_bytes(raw)))
    }
}
