pub mod collab;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod vm;

use crate::compiler::{ByteCode, Compiler};
use crate::error::Result;
use crate::parser::ast::Program;
use crate::vm::VirtualMachine;

use tracing::debug;

pub fn parse(source: &str) -> Result<Program> {
    let tokens = lexer::tokenize(source)?;
    debug!(tokens = tokens.len(), "lexed");

    let program = parser::parse(tokens)?;
    debug!(statements = program.len(), "parsed");

    Ok(program)
}

pub fn compile(source: &str) -> Result<ByteCode> {
    let program = parse(source)?;
    Ok(Compiler::new().compile(&program))
}

pub fn run(source: &str, vm: &mut VirtualMachine) -> Result<()> {
    let bytecode = compile(source)?;
    vm.run_bytecode(&bytecode.instructions)?;
    Ok(())
}
