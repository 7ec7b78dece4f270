use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::get_i64;
use crate::data_type::DataType;
use crate::error::{Result, SerializationError};
use crate::reader::GraphBinaryReader;
use crate::serializer::TypeSerializer;
use crate::value::{Date, Timestamp, Value};
use crate::writer::GraphBinaryWriter;

/// DATE and TIMESTAMP: i64 milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy)]
pub struct DateSerializer {
    data_type: DataType,
}

impl DateSerializer {
    /// Serializer for [`Date`] values.
    pub fn date() -> Self {
        Self {
            data_type: DataType::Date,
        }
    }

    /// Serializer for [`Timestamp`] values.
    pub fn timestamp() -> Self {
        Self {
            data_type: DataType::Timestamp,
        }
    }
}

impl TypeSerializer for DateSerializer {
    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        _ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        let millis = match (self.data_type, value) {
            (DataType::Date, Value::Date(date)) => date.millis(),
            (DataType::Timestamp, Value::Timestamp(ts)) => ts.millis(),
            (expected, other) => return Err(SerializationError::unexpected(expected, other)),
        };
        dst.put_i64(millis);
        Ok(())
    }

    fn read_payload(&self, buf: &mut Bytes, _ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        let millis = get_i64(buf)?;
        Ok(match self.data_type {
            DataType::Timestamp => Value::Timestamp(Timestamp::from_millis(millis)),
            _ => Value::Date(Date::from_millis(millis)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeSerializerRegistry;

    #[test]
    fn date_and_timestamp_use_distinct_codes() {
        let registry = TypeSerializerRegistry::shared();
        let writer = GraphBinaryWriter::new(registry);
        let reader = GraphBinaryReader::new(registry);

        let date = Value::Date(Date::from_millis(86_400_000));
        let ts = Value::Timestamp(Timestamp::from_millis(-1));

        let date_bytes = writer.encode(&date).unwrap();
        let ts_bytes = writer.encode(&ts).unwrap();
        assert_eq!(date_bytes[0], 0x04);
        assert_eq!(ts_bytes[0], 0x05);
        assert_eq!(&ts_bytes[2..], &[0xFF; 8]);

        assert_eq!(reader.decode(&date_bytes).unwrap(), date);
        assert_eq!(reader.decode(&ts_bytes).unwrap(), ts);
    }

    #[test]
    fn date_serializer_rejects_timestamp() {
        let writer = GraphBinaryWriter::new(TypeSerializerRegistry::shared());
        let mut dst = BytesMut::new();
        let err = DateSerializer::date()
            .write_payload(&Value::Timestamp(Timestamp::from_millis(0)), &mut dst, &writer)
            .unwrap_err();
        assert!(matches!(
            err,
            SerializationError::UnexpectedValue {
                expected: DataType::Date,
                ..
            }
        ));
    }
}
