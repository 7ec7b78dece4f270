use std::fs;

use graphbin_codec::{
    CodecConfig, GraphBinaryReader, TypeSerializerRegistry, Value, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_LENGTH,
};
use tracing::debug;

use crate::cmd::DecodeArgs;
use crate::exit::{codec_error, io_error, CliError, CliResult, SUCCESS};
use crate::json;
use crate::output::{print_json, print_pretty_json, print_table, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let bytes = read_bytes(&args)?;
    let config = CodecConfig {
        max_depth: args.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        max_length: args.max_length.unwrap_or(DEFAULT_MAX_LENGTH),
    };

    let value = GraphBinaryReader::with_config(TypeSerializerRegistry::shared(), config)
        .decode(&bytes)
        .map_err(|err| codec_error("decode failed", err))?;
    debug!(kind = value.kind(), size = bytes.len(), "value decoded");

    match format {
        OutputFormat::Json => print_json(&json::from_value(&value)),
        OutputFormat::Pretty => print_pretty_json(&json::from_value(&value)),
        OutputFormat::Table => print_table(&["#", "KIND", "VALUE"], table_rows(&value)),
        OutputFormat::Raw => println!("{value:?}"),
    }

    Ok(SUCCESS)
}

/// Top-level collections print one row per element, anything else one row.
fn table_rows(value: &Value) -> Vec<Vec<String>> {
    let row = |index: String, value: &Value| {
        vec![index, value.kind().to_string(), json::from_value(value).to_string()]
    };
    match value {
        Value::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| row(i.to_string(), item))
            .collect(),
        Value::Set(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| row(i.to_string(), item))
            .collect(),
        Value::Map(map) => map
            .iter()
            .map(|(key, item)| row(json::from_value(key).to_string(), item))
            .collect(),
        other => vec![row("-".to_string(), other)],
    }
}

fn read_bytes(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    let text = args.hex.as_deref().unwrap_or_default();
    parse_hex(text)
}

fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    hex::decode(digits).map_err(|err| CliError::invalid(format!("input is not valid hex: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_ignores_spacing_and_prefix() {
        assert_eq!(parse_hex("0x01 00\n2a").unwrap(), vec![0x01, 0x00, 0x2a]);
        assert_eq!(parse_hex("FE01").unwrap(), vec![0xfe, 0x01]);
    }

    #[test]
    fn parse_hex_rejects_odd_digits() {
        let err = parse_hex("abc").unwrap_err();
        assert_eq!(err.code, crate::exit::DATA_INVALID);
    }

    #[test]
    fn map_rows_are_keyed() {
        let map = [(Value::from("k"), Value::Int(1))].into_iter().collect();
        let rows = table_rows(&Value::Map(map));
        assert_eq!(rows, vec![vec!["\"k\"".to_string(), "int".to_string(), "1".to_string()]]);
    }
}
