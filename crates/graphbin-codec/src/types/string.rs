use bytes::{Bytes, BytesMut};

use crate::codec::{get_string, put_string};
use crate::data_type::DataType;
use crate::error::{Result, SerializationError};
use crate::reader::GraphBinaryReader;
use crate::serializer::TypeSerializer;
use crate::value::Value;
use crate::writer::GraphBinaryWriter;

/// STRING: i32 byte length followed by UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringSerializer;

impl TypeSerializer for StringSerializer {
    fn data_type(&self) -> DataType {
        DataType::String
    }

    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        _ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        let Value::String(text) = value else {
            return Err(SerializationError::unexpected(DataType::String, value));
        };
        put_string(dst, text)
    }

    fn read_payload(&self, buf: &mut Bytes, ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        get_string(buf, ctx.config().max_length).map(Value::String)
    }
}
