mod error;
mod lexer;
mod token;

pub use error::{LexError, Result};
pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};
