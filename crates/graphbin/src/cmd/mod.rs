use clap::{ArgGroup, Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod types;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a JSON document as one GraphBinary value.
    Encode(EncodeArgs),
    /// Decode one GraphBinary value and print it.
    Decode(DecodeArgs),
    /// List the data types and custom types of the default registry.
    Types(TypesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Types(args) => types::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["json", "file"])))]
pub struct EncodeArgs {
    /// JSON document to encode. Use {"@type": T, "@value": V} for non-JSON types.
    #[arg(long)]
    pub json: Option<String>,
    /// Read the JSON document from a file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["hex", "file"])))]
pub struct DecodeArgs {
    /// Hex-encoded bytes (whitespace and a leading 0x are ignored).
    pub hex: Option<String>,
    /// Read raw bytes from a file.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
    /// Maximum nesting depth accepted while decoding.
    #[arg(long, env = "GRAPHBIN_MAX_DEPTH")]
    pub max_depth: Option<usize>,
    /// Maximum length or element count accepted for one field.
    #[arg(long, env = "GRAPHBIN_MAX_LENGTH")]
    pub max_length: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct TypesArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
