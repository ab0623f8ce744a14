use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::vm::RuntimeError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenomeScriptError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenomeScriptError {
    #[error("lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("parser error: {0}")]
    Parse(#[from] ParseError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

impl GenomeScriptError {
    pub fn line(&self) -> Option<usize> {
        match self {
            GenomeScriptError::Lex(err) => Some(err.line()),
            GenomeScriptError::Parse(err) => Some(err.line()),
            GenomeScriptError::Runtime(_) => None,
        }
    }
}
