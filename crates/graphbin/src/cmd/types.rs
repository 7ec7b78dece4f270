use graphbin_codec::TypeSerializerRegistry;
use serde::Serialize;

use crate::cmd::TypesArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, print_pretty_json, print_table, OutputFormat};

#[derive(Serialize)]
struct DataTypeEntry {
    code: u8,
    name: &'static str,
}

#[derive(Serialize)]
struct TypesOutput<'a> {
    data_types: Vec<DataTypeEntry>,
    custom_types: Vec<&'a str>,
}

pub fn run(_args: TypesArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = TypeSerializerRegistry::shared();
    let out = TypesOutput {
        data_types: registry
            .data_types()
            .into_iter()
            .map(|data_type| DataTypeEntry {
                code: data_type.code(),
                name: data_type.name(),
            })
            .collect(),
        custom_types: registry.custom_type_names(),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Pretty => print_pretty_json(&out),
        OutputFormat::Table => {
            let built_in = out.data_types.iter().map(|entry| {
                vec![
                    format!("0x{:02x}", entry.code),
                    entry.name.to_string(),
                    "built-in".to_string(),
                ]
            });
            let custom = out
                .custom_types
                .iter()
                .map(|name| vec!["0x00".to_string(), name.to_string(), "custom".to_string()]);
            print_table(&["CODE", "NAME", "KIND"], built_in.chain(custom));
        }
        OutputFormat::Raw => {
            for entry in &out.data_types {
                println!("0x{:02x} {}", entry.code, entry.name);
            }
            for name in &out.custom_types {
                println!("0x00 {name}");
            }
        }
    }

    Ok(SUCCESS)
}
