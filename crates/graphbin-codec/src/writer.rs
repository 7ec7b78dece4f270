use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::{put_string, DepthCounter, UNSPECIFIED_NULL_BYTES, VALUE_FLAG_NULL};
use crate::config::CodecConfig;
use crate::data_type::DataType;
use crate::error::Result;
use crate::registry::{Resolved, TypeSerializerRegistry};
use crate::value::Value;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Encodes values into GraphBinary, dispatching through a registry.
///
/// A writer is cheap to create and meant for one thread; nested values are
/// written by serializers calling back into the same writer.
pub struct GraphBinaryWriter<'r> {
    registry: &'r TypeSerializerRegistry,
    config: CodecConfig,
    depth: DepthCounter,
}

impl<'r> GraphBinaryWriter<'r> {
    /// Create a writer with default configuration.
    pub fn new(registry: &'r TypeSerializerRegistry) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    /// Create a writer with explicit configuration.
    pub fn with_config(registry: &'r TypeSerializerRegistry, config: CodecConfig) -> Self {
        Self {
            registry,
            config,
            depth: DepthCounter::default(),
        }
    }

    /// Encode a value as one fully-qualified unit.
    pub fn encode(&self, value: &Value) -> Result<Bytes> {
        let mut dst = BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY);
        self.write(value, &mut dst)?;
        Ok(dst.freeze())
    }

    /// Append `[type][custom name][flag][payload]` for `value`.
    ///
    /// On error `dst` is truncated back to its original length.
    pub fn write(&self, value: &Value, dst: &mut BytesMut) -> Result<()> {
        let start = dst.len();
        self.write_qualified(value, dst)
            .inspect_err(|_| dst.truncate(start))
    }

    /// Append a value of a known data type without its type code. The value
    /// flag is written only when `nullable`.
    ///
    /// Used for fields whose type is fixed by the enclosing format.
    pub fn write_value(
        &self,
        value: &Value,
        data_type: DataType,
        dst: &mut BytesMut,
        nullable: bool,
    ) -> Result<()> {
        let start = dst.len();
        self.write_bare(value, data_type, dst, nullable)
            .inspect_err(|_| dst.truncate(start))
    }

    /// Append a string as a bare, non-nullable STRING payload.
    ///
    /// Does not consult the registry, so names and keys encode the same way
    /// whatever serializer is registered for STRING.
    pub fn write_string(&self, value: &str, dst: &mut BytesMut) -> Result<()> {
        let start = dst.len();
        put_string(dst, value).inspect_err(|_| dst.truncate(start))
    }

    /// The registry used for dispatch.
    pub fn registry(&self) -> &'r TypeSerializerRegistry {
        self.registry
    }

    /// Current writer configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn write_qualified(&self, value: &Value, dst: &mut BytesMut) -> Result<()> {
        let _depth = self.depth.enter(self.config.max_depth)?;

        match value {
            Value::Null | Value::TypedNull(DataType::UnspecifiedNull) => {
                dst.put_slice(&UNSPECIFIED_NULL_BYTES);
                Ok(())
            }
            Value::TypedNull(data_type) => {
                let serializer = self.registry.serializer_for_data_type(*data_type)?;
                dst.put_u8(serializer.data_type().code());
                dst.put_u8(VALUE_FLAG_NULL);
                Ok(())
            }
            _ => {
                match self.registry.resolve_value(value)? {
                    Resolved::Custom(custom) => {
                        dst.put_u8(DataType::Custom.code());
                        self.write_string(custom.type_name(), dst)?;
                        custom.write(value, dst, self)
                    }
                    Resolved::BuiltIn(serializer) => {
                        dst.put_u8(serializer.data_type().code());
                        serializer.write(value, dst, self)
                    }
                }
            }
        }
    }

    fn write_bare(
        &self,
        value: &Value,
        data_type: DataType,
        dst: &mut BytesMut,
        nullable: bool,
    ) -> Result<()> {
        let _depth = self.depth.enter(self.config.max_depth)?;
        self.registry
            .serializer_for_data_type(data_type)?
            .write_value(value, dst, self, nullable)
    }
}
