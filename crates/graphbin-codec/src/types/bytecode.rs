use bytes::{Bytes, BytesMut};

use crate::codec::{get_length, put_length};
use crate::data_type::DataType;
use crate::error::{Result, SerializationError};
use crate::reader::GraphBinaryReader;
use crate::serializer::TypeSerializer;
use crate::value::{Bytecode, Instruction, Value};
use crate::writer::GraphBinaryWriter;

/// BYTECODE: steps, then sources.
///
/// ```text
/// {steps_length}{step_0}…{sources_length}{source_0}…
/// step/source: {operator: bare string}{args_length}{arg_0 fully-qualified}…
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct BytecodeSerializer;

impl BytecodeSerializer {
    fn write_instructions(
        instructions: &[Instruction],
        dst: &mut BytesMut,
        ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        put_length(dst, instructions.len())?;
        for instruction in instructions {
            ctx.write_string(instruction.operator(), dst)?;
            put_length(dst, instruction.arguments().len())?;
            for argument in instruction.arguments() {
                ctx.write(argument, dst)?;
            }
        }
        Ok(())
    }

    fn read_instructions(
        buf: &mut Bytes,
        ctx: &GraphBinaryReader<'_>,
    ) -> Result<Vec<Instruction>> {
        let max = ctx.config().max_length;
        let count = get_length(buf, max)?;
        let mut instructions = Vec::new();
        for _ in 0..count {
            let operator = ctx.read_string(buf)?;
            let arg_count = get_length(buf, max)?;
            let mut arguments = Vec::new();
            for _ in 0..arg_count {
                arguments.push(ctx.read(buf)?);
            }
            instructions.push(Instruction::new(operator, arguments));
        }
        Ok(instructions)
    }
}

impl TypeSerializer for BytecodeSerializer {
    fn data_type(&self) -> DataType {
        DataType::Bytecode
    }

    fn write_payload(
        &self,
        value: &Value,
        dst: &mut BytesMut,
        ctx: &GraphBinaryWriter<'_>,
    ) -> Result<()> {
        let Value::Bytecode(bytecode) = value else {
            return Err(SerializationError::unexpected(DataType::Bytecode, value));
        };
        Self::write_instructions(bytecode.steps(), dst, ctx)?;
        Self::write_instructions(bytecode.sources(), dst, ctx)
    }

    fn read_payload(&self, buf: &mut Bytes, ctx: &GraphBinaryReader<'_>) -> Result<Value> {
        let steps = Self::read_instructions(buf, ctx)?;
        let sources = Self::read_instructions(buf, ctx)?;
        Ok(Value::Bytecode(Bytecode::from_parts(sources, steps)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeSerializerRegistry;
    use crate::value::Binding;

    #[test]
    fn traversal_with_bindings_round_trip() {
        let mut bytecode = Bytecode::new();
        bytecode.add_source("withStrategies", vec![]);
        bytecode.add_step("V", vec![]);
        bytecode.add_step("has", vec!["name".into(), Binding::new("n", "marko").into()]);
        bytecode.add_step("limit", vec![Value::Long(10)]);

        let registry = TypeSerializerRegistry::shared();
        let value = Value::Bytecode(bytecode);
        let bytes = GraphBinaryWriter::new(registry).encode(&value).unwrap();
        assert_eq!(&bytes[..6], &[0x15, 0x00, 0x00, 0x00, 0x00, 0x03]);
        assert_eq!(
            GraphBinaryReader::new(registry).decode(&bytes).unwrap(),
            value
        );
    }

    #[test]
    fn empty_program_layout() {
        let registry = TypeSerializerRegistry::shared();
        let bytes = GraphBinaryWriter::new(registry)
            .encode(&Value::Bytecode(Bytecode::new()))
            .unwrap();
        assert_eq!(
            bytes.as_ref(),
            &[0x15, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn step_layout_has_bare_operator() {
        let mut bytecode = Bytecode::new();
        bytecode.add_step("V", vec![Value::Int(1)]);
        let bytes = GraphBinaryWriter::new(TypeSerializerRegistry::shared())
            .encode(&Value::Bytecode(bytecode))
            .unwrap();

        assert_eq!(
            bytes.as_ref(),
            &[
                0x15, 0x00, // BYTECODE, present
                0x00, 0x00, 0x00, 0x01, // 1 step
                0x00, 0x00, 0x00, 0x01, b'V', // operator
                0x00, 0x00, 0x00, 0x01, // 1 argument
                0x01, 0x00, 0x00, 0x00, 0x00, 0x01, // INT 1
                0x00, 0x00, 0x00, 0x00, // 0 sources
            ]
        );
    }
}
