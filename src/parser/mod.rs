pub mod ast;
mod error;
mod parser;

pub use error::{ParseError, Result};
pub use parser::{parse, Parser};
