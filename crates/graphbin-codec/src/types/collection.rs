//! LIST, SET and MAP. Elements are fully-qualified, so each one carries its
//! own type code and the collection needs only an element count.

use bytes::{Buf, Bytes, BytesMut};

use crate::codec::{get_length, put_length};
use crate::data_type::DataType;
use crate::error::{Result, SerializationError};
use crate::reader::GraphBinaryReader;
use crate::serializer::TypeSerializer;
use crate::value::{Value, ValueMap, ValueSet};
use crate::writer::GraphBinaryWriter;

fn read_items(buf: &mut Bytes, ctx: &GraphBinaryReader<'_>) -> Result<Vec<Value>> {
    let count = get_length(buf, ctx.config().max_length)?;
    // Every element takes at least two bytes; never trust the count for allocation.
    let mut items = Vec::with_capacity(count.min(buf.remaining() / 2));
    for _ in 0..count {
        items.push(ctx.read(buf)?);
    }
    Ok(items)
}

fn write_items<'a>(
    items: impl ExactSizeIterator<Item = &'a Value>,
    dst: &mut BytesMut,
    ctx: &GraphBinaryWriter<'_>,
) -> Result<()> {
    put_length(dst, items.len())?;
    for item in items {
        ctx.write(item, dst)?;
    }
    Ok(())
}

/// LIST: i32 count followed by fully-qualified items.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListSerializer;

impl TypeSerializer for ListSerializer {
    fn data_type(&self) -> DataType {
        DataType::List
    }

    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        match value {
            Value::List(items) => write_items(items.iter(), dst, ctx),
            other => Err(SerializationError::unexpected(DataType::List, other)),
        }
    }

    fn read_payload(&self, buf: &mut Bytes, ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        Ok(Value::List(read_items(buf, ctx)?))
    }
}

/// SET: i32 count followed by fully-qualified items.
#[derive(Debug, Default, Clone, Copy)]
pub struct SetSerializer;

impl TypeSerializer for SetSerializer {
    fn data_type(&self) -> DataType {
        DataType::Set
    }

    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        match value {
            Value::Set(items) => write_items(items.iter(), dst, ctx),
            other => Err(SerializationError::unexpected(DataType::Set, other)),
        }
    }

    fn read_payload(&self, buf: &mut Bytes, ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        Ok(Value::Set(read_items(buf, ctx)?.into_iter().collect::<ValueSet>()))
    }
}

/// MAP: i32 entry count followed by fully-qualified key/value pairs.
#[derive(Debug, Default, Clone, Copy)]
pub struct MapSerializer;

impl TypeSerializer for MapSerializer {
    fn data_type(&self) -> DataType {
        DataType::Map
    }

    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        let Value::Map(map) = value else {
            return Err(SerializationError::unexpected(DataType::Map, value));
        };
        put_length(dst, map.len())?;
        for (key, value) in map.iter() {
            ctx.write(key, dst)?;
            ctx.write(value, dst)?;
        }
        Ok(())
    }

    fn read_payload(&self, buf: &mut Bytes, ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        let count = get_length(buf, ctx.config().max_length)?;
        let mut map = ValueMap::new();
        for _ in 0..count {
            let key = ctx.read(buf)?;
            let value = ctx.read(buf)?;
            map.insert(key, value);
        }
        Ok(Value::Map(map))
    }
}
