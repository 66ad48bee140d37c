use crate::lexer::{LexError, Lexer, Token};
use crate::model::*;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),
    #[error("Unexpected token: {0:?}, expected {1}")]
    Unexpected(Token, &'static str),
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        // Line breaks end column declarations; everywhere else they are skipped.
        lexer.set_preserve_newlines(true);
        let tokens = lexer.tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> &Token {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .find(|t| **t != Token::Newline)
            .unwrap_or(&Token::Eof)
    }

    fn skip_newlines(&mut self) {
        while self.tokens.get(self.pos) == Some(&Token::Newline) {
            self.pos += 1;
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(
            self.tokens.get(self.pos),
            Some(Token::Newline) | Some(Token::Eof) | None
        )
    }

    fn advance(&mut self) -> &Token {
        self.skip_newlines();
        let tok = self.tokens.get(self.pos).unwrap_or(&Token::Eof);
        self.pos += 1;
        tok
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.advance().clone() {
            Token::Ident(s) => Ok(s),
            tok => Err(ParseError::Unexpected(tok, "identifier")),
        }
    }

    fn expect_str(&mut self) -> Result<String, ParseError> {
        match self.advance().clone() {
            Token::Str(s) => Ok(s),
            tok => Err(ParseError::Unexpected(tok, "string")),
        }
    }

    fn expect_num(&mut self) -> Result<f64, ParseError> {
        match self.advance().clone() {
            Token::Num(n) => Ok(n),
            tok => Err(ParseError::Unexpected(tok, "number")),
        }
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), ParseError> {
        let tok = self.advance().clone();
        if tok == expected {
            Ok(())
        } else {
            Err(ParseError::Unexpected(tok, what))
        }
    }

    fn check_ident(&self, name: &str) -> bool {
        matches!(self.peek(), Token::Ident(s) if s == name)
    }

    /// Parse the whole document and validate it into a [`Schema`].
    pub fn parse(&mut self) -> Result<Schema, ParseError> {
        let mut tables = Vec::new();
        let mut relationships = Vec::new();

        while *self.peek() != Token::Eof {
            if self.check_ident("table") {
                self.advance();
                tables.push(self.parse_table()?);
            } else if self.check_ident("rel") {
                self.advance();
                relationships.extend(self.parse_rel_block()?);
            } else {
                return Err(ParseError::Unexpected(self.peek().clone(), "table or rel"));
            }
        }

        Ok(Schema::new(tables, relationships)?)
    }

    fn parse_table(&mut self) -> Result<TableSpec, ParseError> {
        let id = self.expect_ident()?;
        let mut label = None;
        let mut subtitle = String::new();
        let mut color = None;

        if let Token::Str(s) = self.peek().clone() {
            self.advance();
            subtitle = s;
        }

        loop {
            if self.check_ident("label") {
                self.advance();
                label = Some(self.expect_str()?);
            } else if self.check_ident("color") {
                self.advance();
                color = Some(self.expect_str()?);
            } else {
                break;
            }
        }

        if !self.check_ident("at") {
            return Err(ParseError::Unexpected(self.peek().clone(), "at <x>, <y>"));
        }
        self.advance();
        let x = self.expect_num()?;
        self.expect(Token::Comma, "comma between coordinates")?;
        let y = self.expect_num()?;

        self.expect(Token::LBrace, "{")?;
        let mut columns = Vec::new();
        while *self.peek() != Token::RBrace {
            columns.push(self.parse_column()?);
        }
        self.expect(Token::RBrace, "}")?;

        Ok(TableSpec {
            label: label.unwrap_or_else(|| id.clone()),
            id,
            subtitle,
            color,
            x,
            y,
            columns,
        })
    }

    fn parse_column(&mut self) -> Result<ColumnSpec, ParseError> {
        let name = self.expect_ident()?;
        let type_name = self.expect_ident()?;
        let mut column = ColumnSpec::new(name, type_name);

        // Modifiers only count on the column's own line, so a following
        // column may be called `pk`, `fk` or `note`.
        while !self.at_line_end() {
            if self.check_ident("pk") {
                self.advance();
                column.pk = true;
            } else if self.check_ident("fk") {
                self.advance();
                self.expect(Token::Arrow, "-> after fk")?;
                column.fk = Some(self.expect_ident()?);
            } else if self.check_ident("note") {
                self.advance();
                column.note = Some(self.expect_str()?);
            } else {
                break;
            }
        }

        Ok(column)
    }

    fn parse_rel_block(&mut self) -> Result<Vec<RelationshipSpec>, ParseError> {
        self.expect(Token::LBrace, "{")?;
        let mut rels = Vec::new();

        while *self.peek() != Token::RBrace {
            rels.push(self.parse_relationship()?);
        }

        self.expect(Token::RBrace, "}")?;
        Ok(rels)
    }

    fn parse_endpoint(&mut self) -> Result<(String, Side), ParseError> {
        let table = self.expect_ident()?;
        let side = if *self.peek() == Token::Dot {
            self.advance();
            Side::parse_lenient(&self.expect_ident()?)
        } else {
            Side::Center
        };
        Ok((table, side))
    }

    fn parse_relationship(&mut self) -> Result<RelationshipSpec, ParseError> {
        let (from, from_side) = self.parse_endpoint()?;
        self.expect(Token::Arrow, "->")?;
        let (to, to_side) = self.parse_endpoint()?;

        let mut label = String::new();
        if *self.peek() == Token::Colon {
            self.advance();
            label = self.expect_str()?;
        }

        Ok(RelationshipSpec {
            from,
            from_side,
            to,
            to_side,
            label,
        })
    }
}

/// Parse `.erd` source into a validated schema.
pub fn parse_schema(input: &str) -> Result<Schema, ParseError> {
    Parser::new(input)?.parse()
}
