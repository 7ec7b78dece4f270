use bytes::Bytes;
use tracing::debug;

use crate::codec::{get_null_flag, get_string, get_u8, DepthCounter};
use crate::config::CodecConfig;
use crate::data_type::DataType;
use crate::error::{Result, SerializationError};
use crate::registry::TypeSerializerRegistry;
use crate::value::Value;

/// Decodes GraphBinary values, dispatching through a registry.
///
/// Reads are atomic from the caller's point of view: the buffer passed to
/// [`read`](Self::read) only advances when a complete value was decoded.
pub struct GraphBinaryReader<'r> {
    registry: &'r TypeSerializerRegistry,
    config: CodecConfig,
    depth: DepthCounter,
}

impl<'r> GraphBinaryReader<'r> {
    /// Create a reader with default configuration.
    pub fn new(registry: &'r TypeSerializerRegistry) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    /// Create a reader with explicit configuration.
    pub fn with_config(registry: &'r TypeSerializerRegistry, config: CodecConfig) -> Self {
        Self {
            registry,
            config,
            depth: DepthCounter::default(),
        }
    }

    /// Decode exactly one fully-qualified value from `bytes`.
    ///
    /// Trailing bytes are an error.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let mut buf = Bytes::copy_from_slice(bytes);
        let value = self.read(&mut buf)?;
        if !buf.is_empty() {
            return Err(SerializationError::TrailingBytes(buf.len()));
        }
        Ok(value)
    }

    /// Read one `[type][custom name][flag][payload]` unit.
    pub fn read(&self, buf: &mut Bytes) -> Result<Value> {
        let mut cursor = buf.clone();
        let value = self.read_qualified(&mut cursor)?;
        *buf = cursor;
        Ok(value)
    }

    /// Read a value of a known data type that was written without its type
    /// code. The value flag is read only when `nullable`.
    pub fn read_value(
        &self,
        buf: &mut Bytes,
        data_type: DataType,
        nullable: bool,
    ) -> Result<Value> {
        let mut cursor = buf.clone();
        let value = {
            let _depth = self.depth.enter(self.config.max_depth)?;
            self.registry
                .serializer_for_data_type(data_type)?
                .read_value(&mut cursor, self, nullable)?
        };
        *buf = cursor;
        Ok(value)
    }

    /// Read a bare, non-nullable STRING payload.
    ///
    /// Does not consult the registry, so names and keys decode the same way
    /// whatever serializer is registered for STRING.
    pub fn read_string(&self, buf: &mut Bytes) -> Result<String> {
        let mut cursor = buf.clone();
        let value = get_string(&mut cursor, self.config.max_length)?;
        *buf = cursor;
        Ok(value)
    }

    /// The registry used for dispatch.
    pub fn registry(&self) -> &'r TypeSerializerRegistry {
        self.registry
    }

    /// Current reader configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn read_qualified(&self, buf: &mut Bytes) -> Result<Value> {
        let _depth = self.depth.enter(self.config.max_depth)?;

        let code = get_u8(buf)?;
        let data_type = DataType::from_code(code).ok_or(SerializationError::UnknownTypeCode(code))?;

        match data_type {
            DataType::UnspecifiedNull => {
                if !get_null_flag(buf)? {
                    return Err(SerializationError::UnspecifiedNullWithValue);
                }
                Ok(Value::Null)
            }
            DataType::Custom => {
                let name = self.read_string(buf)?;
                let serializer = self
                    .registry
                    .serializer_for_custom_type(&name)
                    .inspect_err(|_| debug!(name = %name, "received unregistered custom type"))?;
                serializer.read(buf, self)
            }
            data_type => self
                .registry
                .serializer_for_data_type(data_type)?
                .read(buf, self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Binding;
    use crate::writer::GraphBinaryWriter;

    fn decode(bytes: &[u8]) -> Result<Value> {
        GraphBinaryReader::new(TypeSerializerRegistry::shared()).decode(bytes)
    }

    #[test]
    fn read_int() {
        let value = decode(&[0x01, 0x00, 0x00, 0x00, 0x00, 0x2A]).unwrap();
        assert_eq!(value, Value::Int(42));
    }

    #[test]
    fn read_typed_null() {
        assert_eq!(
            decode(&[0x01, 0x01]).unwrap(),
            Value::TypedNull(DataType::Int)
        );
        assert_eq!(
            decode(&[0x09, 0x01]).unwrap(),
            Value::TypedNull(DataType::List)
        );
    }

    #[test]
    fn read_unspecified_null() {
        assert_eq!(decode(&[0xFE, 0x01]).unwrap(), Value::Null);
        assert!(matches!(
            decode(&[0xFE, 0x00]),
            Err(SerializationError::UnspecifiedNullWithValue)
        ));
    }

    #[test]
    fn unknown_type_code_rejected() {
        assert!(matches!(
            decode(&[0x7F, 0x00]),
            Err(SerializationError::UnknownTypeCode(0x7F))
        ));
    }

    #[test]
    fn known_code_without_serializer_rejected() {
        assert!(matches!(
            decode(&[0x11, 0x00]),
            Err(SerializationError::DataTypeNotFound(DataType::Vertex))
        ));
    }

    #[test]
    fn unknown_custom_name_rejected() {
        let bytes = [0x00, 0x00, 0x00, 0x00, 0x03, b'g', b'e', b'o', 0x00];
        assert!(matches!(
            decode(&bytes),
            Err(SerializationError::CustomTypeNotFound(name)) if name == "geo"
        ));
    }

    #[test]
    fn truncated_payload_rejected() {
        assert!(matches!(
            decode(&[0x02, 0x00, 0x00, 0x00]),
            Err(SerializationError::Truncated { .. })
        ));
    }

    #[test]
    fn trailing_bytes_rejected() {
        assert!(matches!(
            decode(&[0x27, 0x00, 0x01, 0xFF]),
            Err(SerializationError::TrailingBytes(1))
        ));
    }

    #[test]
    fn failed_read_does_not_advance_buffer() {
        let reader = GraphBinaryReader::new(TypeSerializerRegistry::shared());
        // LIST of two INTs with the second one cut short.
        let mut buf = Bytes::from_static(&[
            0x09, 0x00, 0x00, 0x00, 0x00, 0x02, 0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x00,
        ]);
        let before = buf.clone();
        assert!(reader.read(&mut buf).is_err());
        assert_eq!(buf, before);
    }

    #[test]
    fn sequential_units_from_one_buffer() {
        let writer = GraphBinaryWriter::new(TypeSerializerRegistry::shared());
        let mut dst = bytes::BytesMut::new();
        writer.write(&Value::Int(1), &mut dst).unwrap();
        writer.write(&Value::from("two"), &mut dst).unwrap();
        writer.write(&Value::Null, &mut dst).unwrap();

        let reader = GraphBinaryReader::new(TypeSerializerRegistry::shared());
        let mut buf = dst.freeze();
        assert_eq!(reader.read(&mut buf).unwrap(), Value::Int(1));
        assert_eq!(reader.read(&mut buf).unwrap(), Value::from("two"));
        assert_eq!(reader.read(&mut buf).unwrap(), Value::Null);
        assert!(buf.is_empty());
    }

    #[test]
    fn keyed_pair_scenario() {
        let bytes = [
            0x14, 0x00, // BINDING, present
            0x00, 0x00, 0x00, 0x01, b'x', // bare key
            0x01, 0x00, 0x00, 0x00, 0x00, 0x2A, // INT 42
        ];
        assert_eq!(decode(&bytes).unwrap(), Value::Binding(Binding::new("x", 42)));
    }

    #[test]
    fn depth_limit_applies_on_read() {
        // LIST[LIST[LIST[]]]
        let bytes = [
            0x09, 0x00, 0x00, 0x00, 0x00, 0x01, 0x09, 0x00, 0x00, 0x00, 0x00, 0x01, 0x09, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];
        let shallow = CodecConfig {
            max_depth: 2,
            ..CodecConfig::default()
        };
        let reader = GraphBinaryReader::with_config(TypeSerializerRegistry::shared(), shallow);
        assert!(matches!(
            reader.decode(&bytes),
            Err(SerializationError::DepthExceeded { max: 2 })
        ));
        assert!(decode(&bytes).is_ok());
    }

    #[test]
    fn declared_length_above_limit_rejected() {
        let config = CodecConfig {
            max_length: 2,
            ..CodecConfig::default()
        };
        let reader = GraphBinaryReader::with_config(TypeSerializerRegistry::shared(), config);
        let bytes = [0x03, 0x00, 0x00, 0x00, 0x00, 0x03, b'a', b'b', b'c'];
        assert!(matches!(
            reader.decode(&bytes),
            Err(SerializationError::LengthTooLarge { len: 3, max: 2 })
        ));
    }
}
