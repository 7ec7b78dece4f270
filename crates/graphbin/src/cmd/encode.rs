use std::fs;

use graphbin_codec::DataType;
use serde::Serialize;
use tracing::debug;

use crate::cmd::EncodeArgs;
use crate::exit::{codec_error, io_error, CliError, CliResult, SUCCESS};
use crate::json;
use crate::output::{print_json, print_raw, print_table, spaced_hex, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput<'a> {
    data_type: &'a str,
    size: usize,
    hex: String,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let text = read_document(&args)?;
    let document: serde_json::Value = serde_json::from_str(&text)
        .map_err(|err| CliError::invalid(format!("input is not valid JSON: {err}")))?;
    let value = json::to_value(&document)?;

    let bytes = graphbin_codec::encode(&value).map_err(|err| codec_error("encode failed", err))?;
    let data_type = bytes
        .first()
        .copied()
        .and_then(DataType::from_code)
        .map_or("UNKNOWN", DataType::name);
    debug!(kind = value.kind(), data_type, size = bytes.len(), "value encoded");

    match format {
        OutputFormat::Json => print_json(&EncodeOutput {
            data_type,
            size: bytes.len(),
            hex: hex::encode(&bytes),
        }),
        OutputFormat::Table => print_table(
            &["TYPE", "SIZE", "BYTES"],
            [vec![
                data_type.to_string(),
                bytes.len().to_string(),
                spaced_hex(&bytes),
            ]],
        ),
        OutputFormat::Pretty => println!("{}", spaced_hex(&bytes)),
        OutputFormat::Raw => print_raw(&bytes),
    }

    Ok(SUCCESS)
}

fn read_document(args: &EncodeArgs) -> CliResult<String> {
    if let Some(json) = &args.json {
        return Ok(json.clone());
    }
    match &args.file {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        None => Ok(String::new()),
    }
}
