/// Default maximum nesting depth of fully-qualified values.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default maximum string length in bytes and collection element count: 16 MiB.
pub const DEFAULT_MAX_LENGTH: usize = 16 * 1024 * 1024;

/// Limits applied by the codec contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum nesting of fully-qualified values on read and write.
    pub max_depth: usize,
    /// Maximum declared string byte length or collection count accepted on read.
    pub max_length: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}
