//! The serializer contract implemented once per wire type.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{get_null_flag, VALUE_FLAG_NULL, VALUE_FLAG_PRESENT};
use crate::data_type::DataType;
use crate::error::{Result, SerializationError};
use crate::reader::GraphBinaryReader;
use crate::value::Value;
use crate::writer::GraphBinaryWriter;

/// Encodes and decodes the payload of one wire type.
///
/// Implementors supply [`data_type`](Self::data_type),
/// [`write_payload`](Self::write_payload) and
/// [`read_payload`](Self::read_payload). The provided methods add the value
/// flag: `write`/`read` always carry it, `write_value`/`read_value` carry it
/// only when `nullable` is set. The type code itself is owned by the codec
/// contexts.
///
/// Composite serializers recurse through the context passed in, so nested
/// values are dispatched through the same registry.
pub trait TypeSerializer: fmt::Debug + Send + Sync {
    /// The wire type produced by this serializer.
    fn data_type(&self) -> DataType;

    /// Write the payload of a non-null value.
    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()>;

    /// Read the payload of a non-null value, consuming exactly its bytes.
    fn read_payload(&self, buf: &mut Bytes, ctx: &GraphBinaryReader<'_>) -> Result<Value>;

    /// Returns `Some` for custom type serializers.
    ///
    /// Only consulted by [`RegistryBuilder::add`](crate::RegistryBuilder::add)
    /// to turn such serializers away; dispatch does not depend on it.
    fn as_custom(&self) -> Option<&dyn CustomTypeSerializer> {
        None
    }

    /// The value produced when a null flag is read.
    fn null_value(&self) -> Value {
        match self.data_type() {
            DataType::Custom => Value::Null,
            data_type => Value::TypedNull(data_type),
        }
    }

    /// Write `[flag][payload]`.
    fn write(&self, value: &Value, dst: &mut BytesMut, ctx: &GraphBinaryWriter<'_>) -> Result<()> {
        self.write_value(value, dst, ctx, true)
    }

    /// Write the payload, preceded by the value flag when `nullable`.
    fn write_value(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        ctx: &GraphBinaryWriter<'_>,
        nullable: bool,
    ) -> Result<()> {
        if value.is_null() {
            if !nullable {
                return Err(SerializationError::UnexpectedNull);
            }
            dst.put_u8(VALUE_FLAG_NULL);
            return Ok(());
        }
        if nullable {
            dst.put_u8(VALUE_FLAG_PRESENT);
        }
        self.write_payload(value, dst, ctx)
    }

    /// Read `[flag][payload]`.
    fn read(&self, buf: &mut Bytes, ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        self.read_value(buf, ctx, true)
    }

    /// Read the payload, preceded by the value flag when `nullable`.
    fn read_value(
        &self,
        buf: &mut Bytes,
        ctx: &GraphBinaryReader<'_>,
        nullable: bool,
    ) -> Result<Value> {
        if nullable && get_null_flag(buf)? {
            return Ok(self.null_value());
        }
        self.read_payload(buf, ctx)
    }
}

/// Serializer for a host type identified on the wire by name.
///
/// Implementations report [`DataType::Custom`] from `data_type` and are
/// registered with
/// [`RegistryBuilder::add_custom_type`](crate::RegistryBuilder::add_custom_type).
/// Overriding `as_custom` to return `Some(self)` lets the builder reject them
/// when passed to `add` by mistake.
pub trait CustomTypeSerializer: TypeSerializer {
    /// Unique, non-empty wire name of the custom type.
    fn type_name(&self) -> &str;
}
