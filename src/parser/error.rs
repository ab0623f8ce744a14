use crate::lexer::TokenKind;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: expected `{expected}`, got `{found}` instead")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        line: usize,
    },

    #[error("line {line}: expected `{expected}`, got `{found}` instead")]
    ExpectedWord {
        expected: &'static str,
        found: String,
        line: usize,
    },

    #[error("line {line}: invalid number `{literal}`")]
    InvalidNumber { literal: String, line: usize },
}

impl ParseError {
    pub fn unexpected_token<S>(expected: S, found: TokenKind, line: usize) -> ParseError
    where
        S: Into<String>,
    {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found,
            line,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { line, .. } => *line,
            ParseError::ExpectedWord { line, .. } => *line,
            ParseError::InvalidNumber { line, .. } => *line,
        }
    }
}
