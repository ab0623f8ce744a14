mod compiler;
mod op;

pub use compiler::{lower, ByteCode, Compiler};
pub use op::{Instruction, Opcode};
