//! Fixed-width scalar serializers.

use bytes::{BufMut, Bytes, BytesMut};

use crate::codec;
use crate::data_type::DataType;
use crate::error::{Result, SerializationError};
use crate::reader::GraphBinaryReader;
use crate::serializer::TypeSerializer;
use crate::value::Value;
use crate::writer::GraphBinaryWriter;

macro_rules! fixed_width {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $get:ident, $put:ident) => {
        $(#[$doc])*
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $name;

        impl TypeSerializer for $name {
            fn data_type(&self) -> DataType {
                DataType::$variant
            }

            fn write_payload(
                &self,
                value: &Value,
                dst: &mut BytesMut,
                _ctx: &GraphBinaryWriter<'_>,
            ) -> Result<()> {
                match value {
                    Value::$variant(v) => {
                        dst.$put(*v);
                        Ok(())
                    }
                    other => Err(SerializationError::unexpected(DataType::$variant, other)),
                }
            }

            fn read_payload(&self, buf: &mut Bytes, _ctx: &GraphBinaryReader<'_>) -> Result<Value> {
                Ok(Value::$variant(codec::$get(buf)?))
            }
        }
    };
}

fixed_width!(
    /// INT: 4-byte two's complement.
    IntSerializer, Int, get_i32, put_i32
);
fixed_width!(
    /// LONG: 8-byte two's complement.
    LongSerializer, Long, get_i64, put_i64
);
fixed_width!(
    /// SHORT: 2-byte two's complement.
    ShortSerializer, Short, get_i16, put_i16
);
fixed_width!(
    /// BYTE: 1 signed byte.
    ByteSerializer, Byte, get_i8, put_i8
);
fixed_width!(
    /// FLOAT: IEEE-754 single precision.
    FloatSerializer, Float, get_f32, put_f32
);
fixed_width!(
    /// DOUBLE: IEEE-754 double precision.
    DoubleSerializer, Double, get_f64, put_f64
);

/// BOOLEAN: one byte, 0x00 or 0x01.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanSerializer;

impl TypeSerializer for BooleanSerializer {
    fn data_type(&self) -> DataType {
        DataType::Boolean
    }

    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        _ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        match value {
            Value::Boolean(v) => {
                dst.put_u8(u8::from(*v));
                Ok(())
            }
            other => Err(SerializationError::unexpected(DataType::Boolean, other)),
        }
    }

    fn read_payload(&self, buf: &mut Bytes, _ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        match codec::get_u8(buf)? {
            0x00 => Ok(Value::Boolean(false)),
            0x01 => Ok(Value::Boolean(true)),
            other => Err(SerializationError::InvalidBoolean(other)),
        }
    }
}
