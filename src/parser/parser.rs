use crate::lexer::{Token, TokenKind};
use crate::parser::ast::*;
use crate::parser::error::{ParseError, Result};

/*
   Invariant:
   (1) A parsing function is only called if `current` contains a valid
     first token according to the associated grammar rule.

   (2) If a parsing function returns Ok(...), the token `current` contains
     the first token `after` the associated grammar rule.

   E.g. parse_verify_stmt: VERIFY <name> -> <name>
   (1) parse_verify_stmt will only be called if `current` contains `TokenKind::Verify`
   (2) if parse_verify_stmt returns successfully `current` contains the first token
       after the output name

   Contextual words (WHERE, QUALITY, ABOVE, TO, AS, ON, WITH, IMPACT, USING)
   are plain identifiers and are matched by their literal text.
*/
#[derive(Debug)]
pub struct Parser {
    tokens: std::vec::IntoIter<Token>,
    current: Token,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Parser {
        let mut parser = Parser {
            tokens: tokens.into_iter(),
            current: Token::new(TokenKind::Eof, "", 1, 1),
        };

        parser.advance();

        parser
    }

    fn advance(&mut self) -> Token {
        let (line, column) = (self.current.line, self.current.column);
        let next = self
            .tokens
            .next()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, "", line, column));

        std::mem::replace(&mut self.current, next)
    }

    fn advance_if(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.to_string()))
        }
    }

    fn unexpected<S: Into<String>>(&self, expected: S) -> ParseError {
        ParseError::unexpected_token(expected, self.current.kind, self.current.line)
    }

    fn at_word(&self, word: &str) -> bool {
        self.current.kind == TokenKind::Ident && self.current.literal == word
    }

    // <stmt>*<EOF>
    pub fn parse(&mut self) -> Result<Program> {
        let mut stmts = vec![];

        while self.current.kind != TokenKind::Eof {
            stmts.push(self.parse_stmt()?);
        }

        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Statement> {
        match self.current.kind {
            TokenKind::Load => self.parse_load_stmt(),
            TokenKind::Analyze => self.parse_analyze_stmt(),
            TokenKind::Filter => self.parse_filter_stmt(),
            TokenKind::Export => self.parse_export_stmt(),
            TokenKind::Train => self.parse_train_stmt(),
            TokenKind::Predict => self.parse_predict_stmt(),
            TokenKind::Generate => self.parse_generate_stmt(),
            TokenKind::Verify => self.parse_verify_stmt(),
            TokenKind::Submit => self.parse_submit_stmt(),
            _ => Err(self.unexpected("statement")),
        }
    }

    // <LOAD><format><string>[<quality>]<-><name>[<quality>]
    fn parse_load_stmt(&mut self) -> Result<Statement> {
        self.advance(); // advance over `TokenKind::Load`

        let format = self.parse_format()?;
        let path = self.parse_string()?;
        let mut min_phred = self.parse_quality_clause()?;

        self.advance_if(TokenKind::Arrow)?;

        let target = self.parse_name()?;

        if min_phred.is_none() {
            min_phred = self.parse_quality_clause()?;
        }

        Ok(load(format, path, target, min_phred))
    }

    // <ANALYZE><name><name><name>*<-><name>
    fn parse_analyze_stmt(&mut self) -> Result<Statement> {
        self.advance(); // advance over `TokenKind::Analyze`

        let target = self.parse_name()?;
        let operation = self.parse_name()?;
        let parameters = self.parse_many(TokenKind::Ident);

        self.advance_if(TokenKind::Arrow)?;

        let output = self.parse_name()?;

        Ok(analyze(target, operation, parameters, output))
    }

    // <FILTER><name><WHERE><string><-><name>
    fn parse_filter_stmt(&mut self) -> Result<Statement> {
        self.advance(); // advance over `TokenKind::Filter`

        let target = self.parse_name()?;
        self.parse_word("WHERE")?;
        let condition = self.parse_string()?;

        self.advance_if(TokenKind::Arrow)?;

        let output = self.parse_name()?;

        Ok(filter(target, condition, output))
    }

    // <EXPORT><name><TO><string>[<AS><format>]
    fn parse_export_stmt(&mut self) -> Result<Statement> {
        self.advance(); // advance over `TokenKind::Export`

        let source = self.parse_name()?;
        self.parse_word("TO")?;
        let path = self.parse_string()?;

        let format = if self.at_word("AS") {
            self.advance(); // advance over `AS`
            Some(self.parse_format()?)
        } else {
            None
        };

        Ok(export(source, path, format))
    }

    // <TRAIN><MODEL><ON><name><WITH><name><-><name>
    fn parse_train_stmt(&mut self) -> Result<Statement> {
        self.advance(); // advance over `TokenKind::Train`

        self.advance_if(TokenKind::Model)?;
        self.parse_word("ON")?;
        let data = self.parse_name()?;
        self.parse_word("WITH")?;
        let reference = self.parse_name()?;

        self.advance_if(TokenKind::Arrow)?;

        let output = self.parse_name()?;

        Ok(train(data, reference, output))
    }

    // <PREDICT><IMPACT><name>[<USING><name>]<-><name>
    fn parse_predict_stmt(&mut self) -> Result<Statement> {
        self.advance(); // advance over `TokenKind::Predict`

        self.parse_word("IMPACT")?;
        let data = self.parse_name()?;

        let model = if self.at_word("USING") {
            self.advance(); // advance over `USING`
            Some(self.parse_name()?)
        } else {
            None
        };

        self.advance_if(TokenKind::Arrow)?;

        let output = self.parse_name()?;

        Ok(predict(data, model, output))
    }

    // <GENERATE><PROOF><name><string><-><name>
    fn parse_generate_stmt(&mut self) -> Result<Statement> {
        self.advance(); // advance over `TokenKind::Generate`

        self.advance_if(TokenKind::Proof)?;
        let dataset = self.parse_name()?;
        let query = self.parse_string()?;

        self.advance_if(TokenKind::Arrow)?;

        let output = self.parse_name()?;

        Ok(generate_proof(dataset, query, output))
    }

    // <VERIFY><name><-><name>
    fn parse_verify_stmt(&mut self) -> Result<Statement> {
        self.advance(); // advance over `TokenKind::Verify`

        let proof = self.parse_name()?;

        self.advance_if(TokenKind::Arrow)?;

        let output = self.parse_name()?;

        Ok(verify_proof(proof, output))
    }

    // <SUBMIT><name><TO><name>[<-><name>]
    fn parse_submit_stmt(&mut self) -> Result<Statement> {
        self.advance(); // advance over `TokenKind::Submit`

        let proof = self.parse_name()?;
        self.parse_word("TO")?;
        let network = self.parse_name()?;

        let output = if self.current.kind == TokenKind::Arrow {
            self.advance(); // advance over `TokenKind::Arrow`
            Some(self.parse_name()?)
        } else {
            None
        };

        Ok(submit_proof(proof, network, output))
    }

    // <QUALITY><ABOVE><number>
    fn parse_quality_clause(&mut self) -> Result<Option<f64>> {
        if !self.at_word("QUALITY") {
            return Ok(None);
        }

        self.advance(); // advance over `QUALITY`
        self.parse_word("ABOVE")?;

        self.parse_number().map(Some)
    }

    // <format marker> | <name>
    fn parse_format(&mut self) -> Result<String> {
        if self.current.kind.is_format() || self.current.kind == TokenKind::Ident {
            Ok(self.advance().literal)
        } else {
            Err(self.unexpected("file format"))
        }
    }

    // <name>
    fn parse_name(&mut self) -> Result<String> {
        self.advance_if(TokenKind::Ident).map(|token| token.literal)
    }

    // <string>
    fn parse_string(&mut self) -> Result<String> {
        self.advance_if(TokenKind::String).map(|token| token.literal)
    }

    // <number>
    fn parse_number(&mut self) -> Result<f64> {
        let token = self.advance_if(TokenKind::Number)?;

        token
            .literal
            .parse::<f64>()
            .map_err(|_| ParseError::InvalidNumber {
                literal: token.literal.clone(),
                line: token.line,
            })
    }

    fn parse_word(&mut self, word: &'static str) -> Result<()> {
        if self.at_word(word) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::ExpectedWord {
                expected: word,
                found: self.current.to_string(),
                line: self.current.line,
            })
        }
    }

    // <kind>*
    fn parse_many(&mut self, kind: TokenKind) -> Vec<String> {
        let mut xs = vec![];

        while self.current.kind == kind {
            xs.push(self.advance().literal);
        }

        xs
    }
}

pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    Parser::new(tokens).parse()
}
