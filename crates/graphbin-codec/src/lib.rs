//! GraphBinary value codec with an extensible type serializer registry.
//!
//! Every value on the wire is a fully-qualified unit:
//! - a 1-byte type code (`0x00` for custom types, followed by the type name)
//! - a 1-byte value flag (`0x00` present, anything else null)
//! - the type-specific payload, big-endian throughout
//!
//! Encoding dispatches on a value's runtime type; decoding dispatches on the
//! type code. Both go through a [`TypeSerializerRegistry`], which is immutable
//! once built and safe to share between threads.
//!
//! ```
//! use graphbin_codec::{decode, encode, Binding, Value};
//!
//! let value = Value::Binding(Binding::new("x", 42));
//! let bytes = encode(&value).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```

pub mod codec;
pub mod config;
pub mod data_type;
pub mod error;
pub mod reader;
pub mod registry;
pub mod serializer;
pub mod types;
pub mod value;
pub mod writer;


use bytes::Bytes;

pub use config::{CodecConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LENGTH};
pub use data_type::DataType;
pub use error::{ConfigError, Result, SerializationError};
pub use reader::GraphBinaryReader;
pub use registry::{RegistryBuilder, Resolved, TypeSelector, TypeSerializerRegistry};
pub use serializer::{CustomTypeSerializer, TypeSerializer};
pub use value::{
    downcast, Binding, Bytecode, Capability, Custom, CustomValue, Date, Instruction,
    RuntimeType, Timestamp, TypeKey, Value, ValueMap, ValueSet,
};
pub use writer::GraphBinaryWriter;

/// Encode `value` with the shared default registry.
pub fn encode(value: &Value) -> Result<Bytes> {
    GraphBinaryWriter::new(TypeSerializerRegistry::shared()).encode(value)
}

/// Decode exactly one value from `bytes` with the shared default registry.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    GraphBinaryReader::new(TypeSerializerRegistry::shared()).decode(bytes)
}
