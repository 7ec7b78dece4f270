use crate::data_type::DataType;
use crate::value::Value;

/// Errors raised while assembling a [`TypeSerializerRegistry`](crate::TypeSerializerRegistry).
///
/// These are programmer errors: they surface at startup, never during lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A built-in registration used the CUSTOM data type.
    #[error("data type can not be CUSTOM, use add_custom_type() instead")]
    CustomDataType,

    /// A registration targeted the reserved UNSPECIFIED_NULL data type.
    #[error("adding a serializer for UNSPECIFIED_NULL is not permitted")]
    UnspecifiedNull,

    /// A custom type serializer was passed to the built-in registration path.
    #[error("custom type serializers are reserved for custom types")]
    CustomSerializerNotAllowed,

    /// A custom registration used a data type other than CUSTOM.
    #[error("custom serializer must use CUSTOM data type, got {0}")]
    NotCustomDataType(DataType),

    /// A custom serializer reported an empty type name.
    #[error("custom type name can not be empty")]
    EmptyCustomTypeName,
}

/// Errors raised while encoding or decoding values.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// No serializer matches the runtime type, exactly or by capability.
    #[error("serializer for type {0} not found")]
    SerializerNotFound(String),

    /// No serializer is registered for the data type.
    #[error("serializer for data type {0} not found")]
    DataTypeNotFound(DataType),

    /// No custom serializer is registered under the name.
    #[error("serializer for custom type '{0}' not found")]
    CustomTypeNotFound(String),

    /// CUSTOM was passed to the data type lookup.
    #[error("custom type serializers must be resolved by name")]
    CustomLookupByDataType,

    /// The type code byte is not a known data type.
    #[error("unknown type code 0x{0:02x}")]
    UnknownTypeCode(u8),

    /// The buffer ended before the value was complete.
    #[error("buffer truncated (needed {needed} bytes, {remaining} remaining)")]
    Truncated { needed: usize, remaining: usize },

    /// A length or count prefix was negative.
    #[error("negative length {0}")]
    NegativeLength(i32),

    /// A length or count prefix exceeds the configured maximum.
    #[error("length too large ({len}, max {max})")]
    LengthTooLarge { len: usize, max: usize },

    /// A string payload is not valid UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A boolean payload byte was neither 0 nor 1.
    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBoolean(u8),

    /// An UNSPECIFIED_NULL code was not followed by the null flag.
    #[error("UNSPECIFIED_NULL must be followed by the null flag")]
    UnspecifiedNullWithValue,

    /// A null value was found where the value is not nullable.
    #[error("unexpected null value when nullable is false")]
    UnexpectedNull,

    /// A serializer was handed a value of a different kind.
    #[error("serializer for {expected} can not handle {found} value")]
    UnexpectedValue {
        expected: DataType,
        found: &'static str,
    },

    /// Nesting exceeded the configured maximum depth.
    #[error("maximum nesting depth {max} exceeded")]
    DepthExceeded { max: usize },

    /// Bytes remained after decoding a complete value.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),

    /// A host-supplied serializer failed.
    #[error("{0}")]
    Custom(String),
}

impl SerializationError {
    /// A serializer for `expected` was handed `value`.
    pub fn unexpected(expected: DataType, value: &Value) -> Self {
        SerializationError::UnexpectedValue {
            expected,
            found: value.kind(),
        }
    }

    /// Failure reported by a host serializer.
    pub fn custom(message: impl Into<String>) -> Self {
        SerializationError::Custom(message.into())
    }
}

pub type Result<T> = std::result::Result<T, SerializationError>;
