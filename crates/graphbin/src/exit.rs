use std::fmt;
use std::io;

use graphbin_codec::SerializationError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(DATA_INVALID, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(FAILURE, format!("{context}: {err}"))
}

/// Every codec failure means the input could not be represented, either as
/// GraphBinary (decode) or as a registered type (encode).
pub fn codec_error(context: &str, err: SerializationError) -> CliError {
    CliError::invalid(format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_errors_are_data_invalid() {
        let err = codec_error("decode failed", SerializationError::UnknownTypeCode(0x7f));
        assert_eq!(err.code, DATA_INVALID);
        assert_eq!(err.to_string(), "decode failed: unknown type code 0x7f");
    }

    #[test]
    fn io_errors_are_failures() {
        let err = io_error("read", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.code, FAILURE);
    }
}
