use crate::lexer::error::{LexError, Result};
use crate::lexer::token::{lookup_ident, Token, TokenKind};

use std::iter::Iterator;

#[derive(Debug)]
pub struct Lexer {
    input: Vec<char>,
    current: usize,
    ch: Option<char>,
    line: usize,
    column: usize,
    done: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Lexer {
        let input: Vec<char> = input.chars().collect();
        let ch = input.first().copied();

        Lexer {
            input,
            current: 0,
            ch,
            line: 1,
            column: 1,
            done: false,
        }
    }

    fn read_char(&mut self) {
        match self.ch {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => return,
        }

        self.current += 1;
        self.ch = self.input.get(self.current).copied();
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.current + 1).copied()
    }

    fn read_while(&mut self, predicate: fn(char) -> bool) -> String {
        let position = self.current;

        while self.ch.map_or(false, predicate) {
            self.read_char()
        }

        self.input[position..self.current].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.ch {
                Some(ch) if ch.is_whitespace() => self.read_char(),
                Some('#') => {
                    while self.ch.map_or(false, |ch| ch != '\n') {
                        self.read_char()
                    }
                }
                _ => return,
            }
        }
    }

    // <"><char>*<">
    fn read_string(&mut self, line: usize, column: usize) -> Result<Token> {
        self.read_char(); // advance over the opening `"`

        let string = self.read_while(is_string_letter);

        if self.ch.is_none() {
            return Err(LexError::UnterminatedString {
                line: self.line,
                column: self.column,
            });
        }

        self.read_char(); // advance over the closing `"`

        Ok(Token::new(TokenKind::String, string, line, column))
    }

    // <digit>+(<.><digit>+)?
    fn read_number(&mut self, line: usize, column: usize) -> Token {
        let mut number = self.read_while(is_digit);

        if self.ch == Some('.') && self.peek_char().map_or(false, is_digit) {
            self.read_char(); // advance over `.`
            number.push('.');
            number.push_str(&self.read_while(is_digit));
        }

        Token::new(TokenKind::Number, number, line, column)
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let (line, column) = (self.line, self.column);

        let ch = match self.ch {
            Some(ch) => ch,
            None => return Ok(Token::new(TokenKind::Eof, "", line, column)),
        };

        let token = match ch {
            '"' => self.read_string(line, column)?,
            '-' if self.peek_char() == Some('>') => {
                self.read_char();
                self.read_char();
                Token::new(TokenKind::Arrow, "->", line, column)
            }
            ch if is_letter(ch) => {
                let ident = self.read_while(is_ident_letter);
                Token::new(lookup_ident(&ident), ident, line, column)
            }
            ch if is_digit(ch) => self.read_number(line, column),
            ch => return Err(LexError::InvalidCharacter { ch, line, column }),
        };

        Ok(token)
    }
}

fn is_letter(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_ident_letter(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn is_string_letter(ch: char) -> bool {
    ch != '"'
}

impl Iterator for Lexer {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.next_token();

        match &result {
            Ok(token) if token.kind != TokenKind::Eof => {}
            _ => self.done = true,
        }

        Some(result)
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).collect()
}
