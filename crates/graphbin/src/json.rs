//! Mapping between JSON documents and codec values.
//!
//! Plain JSON maps to the obvious types: integers to INT (or LONG when they
//! do not fit), other numbers to DOUBLE, arrays to LIST and objects to a MAP
//! keyed by strings. Every other type is spelled as a typed object
//! `{"@type": T, "@value": V}`, which is also what decoding prints for it.

use graphbin_codec::{
    Binding, Bytecode, DataType, Date, Instruction, Timestamp, Value, ValueMap, ValueSet,
};
use serde_json::{json, Map, Number, Value as Json};
use uuid::Uuid;

use crate::exit::{CliError, CliResult};

const TYPE_KEY: &str = "@type";
const VALUE_KEY: &str = "@value";

/// Convert a JSON document into a value.
pub fn to_value(json: &Json) -> CliResult<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Boolean(*b)),
        Json::Number(n) => number_to_value(n),
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Array(items) => list(items).map(Value::List),
        Json::Object(object) => match typed_parts(object) {
            Some((type_name, value)) => typed_to_value(type_name, value),
            None => object
                .iter()
                .map(|(key, value)| Ok((Value::String(key.clone()), to_value(value)?)))
                .collect::<CliResult<ValueMap>>()
                .map(Value::Map),
        },
    }
}

/// Convert a value into JSON, using typed objects where plain JSON would lose
/// the wire type.
pub fn from_value(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::TypedNull(data_type) => typed("null", json!(data_type.name())),
        Value::Boolean(b) => json!(b),
        Value::Byte(v) => typed("byte", json!(v)),
        Value::Short(v) => typed("short", json!(v)),
        Value::Int(v) => json!(v),
        Value::Long(v) => typed("long", json!(v)),
        Value::Float(v) => typed("float", float_json(f64::from(*v))),
        Value::Double(v) if v.is_finite() => float_json(*v),
        Value::Double(v) => typed("double", float_json(*v)),
        Value::String(s) => json!(s),
        Value::Uuid(uuid) => typed("uuid", json!(uuid.to_string())),
        Value::Date(date) => typed("date", json!(date.millis())),
        Value::Timestamp(ts) => typed("timestamp", json!(ts.millis())),
        Value::List(items) => Json::Array(items.iter().map(from_value).collect()),
        Value::Set(items) => typed("set", Json::Array(items.iter().map(from_value).collect())),
        Value::Map(map) => map_json(map),
        Value::Binding(binding) => typed(
            "binding",
            json!({ "variable": binding.variable(), "value": from_value(binding.value()) }),
        ),
        Value::Bytecode(bytecode) => typed(
            "bytecode",
            json!({
                "step": instructions_json(bytecode.steps()),
                "source": instructions_json(bytecode.sources()),
            }),
        ),
        Value::Custom(custom) => typed("custom", json!(format!("{custom:?}"))),
    }
}

fn typed(type_name: &str, value: Json) -> Json {
    let mut object = Map::new();
    object.insert(TYPE_KEY.to_string(), json!(type_name));
    object.insert(VALUE_KEY.to_string(), value);
    Json::Object(object)
}

fn typed_parts(object: &Map<String, Json>) -> Option<(&str, &Json)> {
    if object.len() != 2 {
        return None;
    }
    let type_name = object.get(TYPE_KEY)?.as_str()?;
    Some((type_name, object.get(VALUE_KEY)?))
}

fn list(items: &[Json]) -> CliResult<Vec<Value>> {
    items.iter().map(to_value).collect()
}

fn number_to_value(n: &Number) -> CliResult<Value> {
    if let Some(i) = n.as_i64() {
        return Ok(i32::try_from(i).map_or(Value::Long(i), Value::Int));
    }
    if n.is_u64() {
        return Err(CliError::invalid(format!("integer {n} does not fit in a long")));
    }
    n.as_f64()
        .map(Value::Double)
        .ok_or_else(|| CliError::invalid(format!("unsupported number {n}")))
}

fn typed_to_value(type_name: &str, value: &Json) -> CliResult<Value> {
    match type_name {
        "byte" => integer::<i8>(type_name, value).map(Value::Byte),
        "short" => integer::<i16>(type_name, value).map(Value::Short),
        "int" => integer::<i32>(type_name, value).map(Value::Int),
        "long" => integer::<i64>(type_name, value).map(Value::Long),
        "float" => float(type_name, value).map(|f| Value::Float(f as f32)),
        "double" => float(type_name, value).map(Value::Double),
        "uuid" => text(type_name, value)?
            .parse::<Uuid>()
            .map(Value::Uuid)
            .map_err(|err| CliError::invalid(format!("invalid uuid: {err}"))),
        "date" => integer::<i64>(type_name, value).map(|ms| Value::Date(Date::from_millis(ms))),
        "timestamp" => integer::<i64>(type_name, value)
            .map(|ms| Value::Timestamp(Timestamp::from_millis(ms))),
        "set" => array(type_name, value)?
            .iter()
            .map(to_value)
            .collect::<CliResult<ValueSet>>()
            .map(Value::Set),
        "map" => array(type_name, value)?
            .iter()
            .map(|entry| match entry.as_array().map(Vec::as_slice) {
                Some([key, value]) => Ok((to_value(key)?, to_value(value)?)),
                _ => Err(CliError::invalid("map entries must be [key, value] pairs")),
            })
            .collect::<CliResult<ValueMap>>()
            .map(Value::Map),
        "binding" => {
            let variable = value
                .get("variable")
                .and_then(Json::as_str)
                .ok_or_else(|| CliError::invalid("binding requires a string \"variable\""))?;
            let bound = to_value(value.get("value").unwrap_or(&Json::Null))?;
            Ok(Value::Binding(Binding::new(variable, bound)))
        }
        "bytecode" => bytecode(value).map(Value::Bytecode),
        "null" => match value {
            Json::Null => Ok(Value::Null),
            Json::String(name) => data_type_named(name).map(Value::TypedNull),
            _ => Err(CliError::invalid("null @value must be null or a type name")),
        },
        other => Err(CliError::invalid(format!("unknown {TYPE_KEY} '{other}'"))),
    }
}

fn integer<T: TryFrom<i64>>(type_name: &str, value: &Json) -> CliResult<T> {
    value
        .as_i64()
        .and_then(|i| T::try_from(i).ok())
        .ok_or_else(|| {
            CliError::invalid(format!("{VALUE_KEY} for {type_name} must be an integer in range"))
        })
}

fn float(type_name: &str, value: &Json) -> CliResult<f64> {
    let parsed = match value {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => s.parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| CliError::invalid(format!("{VALUE_KEY} for {type_name} must be a number")))
}

fn text<'a>(type_name: &str, value: &'a Json) -> CliResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| CliError::invalid(format!("{VALUE_KEY} for {type_name} must be a string")))
}

fn array<'a>(type_name: &str, value: &'a Json) -> CliResult<&'a [Json]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| CliError::invalid(format!("{VALUE_KEY} for {type_name} must be an array")))
}

fn data_type_named(name: &str) -> CliResult<DataType> {
    DataType::ALL
        .iter()
        .copied()
        .find(|data_type| data_type.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| CliError::invalid(format!("unknown data type '{name}'")))
}

fn bytecode(value: &Json) -> CliResult<Bytecode> {
    let mut bytecode = Bytecode::new();
    for (operator, arguments) in instructions(value.get("source"))? {
        bytecode.add_source(operator, arguments);
    }
    for (operator, arguments) in instructions(value.get("step"))? {
        bytecode.add_step(operator, arguments);
    }
    Ok(bytecode)
}

// Each instruction is `[operator, arg...]`.
fn instructions(value: Option<&Json>) -> CliResult<Vec<(String, Vec<Value>)>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    array("bytecode", value)?
        .iter()
        .map(|instruction| match instruction.as_array().map(Vec::as_slice) {
            Some([Json::String(operator), arguments @ ..]) => {
                Ok((operator.clone(), list(arguments)?))
            }
            _ => Err(CliError::invalid(
                "bytecode instructions must be [operator, args...] arrays",
            )),
        })
        .collect()
}

fn instructions_json(instructions: &[Instruction]) -> Json {
    instructions
        .iter()
        .map(|instruction| {
            let mut parts = vec![json!(instruction.operator())];
            parts.extend(instruction.arguments().iter().map(from_value));
            Json::Array(parts)
        })
        .collect()
}

fn map_json(map: &ValueMap) -> Json {
    let string_keys = map.iter().all(|(key, _)| key.as_str().is_some());
    let looks_typed = map.len() == 2
        && map.get(&Value::from(TYPE_KEY)).is_some()
        && map.get(&Value::from(VALUE_KEY)).is_some();

    if string_keys && !looks_typed {
        let object = map
            .iter()
            .filter_map(|(key, value)| Some((key.as_str()?.to_string(), from_value(value))))
            .collect();
        return Json::Object(object);
    }

    let entries = map
        .iter()
        .map(|(key, value)| json!([from_value(key), from_value(value)]))
        .collect();
    typed("map", Json::Array(entries))
}

fn float_json(value: f64) -> Json {
    Number::from_f64(value)
        .map(Json::Number)
        .unwrap_or_else(|| Json::String(value.to_string()))
}
