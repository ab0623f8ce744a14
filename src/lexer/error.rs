use thiserror::Error;

pub type Result<T> = std::result::Result<T, LexError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("line {line}, column {column}: invalid character `{ch}`")]
    InvalidCharacter { ch: char, line: usize, column: usize },

    #[error("line {line}, column {column}: unterminated string literal")]
    UnterminatedString { line: usize, column: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::InvalidCharacter { line, .. } => *line,
            LexError::UnterminatedString { line, .. } => *line,
        }
    }
}
