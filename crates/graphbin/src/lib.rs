//! GraphBinary value codec for graph database drivers.
//!
//! # Crate Structure
//!
//! - [`codec`]: values, the type serializer registry, and the reader/writer
//!   contexts that frame values on the wire
//!
//! The `graphbin` binary (behind the `cli` feature) encodes JSON to
//! GraphBinary and decodes GraphBinary back for inspection.

/// Re-export codec types.
pub mod codec {
    pub use graphbin_codec::*;
}

pub use graphbin_codec::{decode, encode, SerializationError, Value};
