use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Num(f64),

    LBrace, // {
    RBrace, // }
    Comma,  // ,
    Colon,  // :
    Dot,    // .
    Arrow,  // ->
    Newline,

    Eof,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LexError {
    #[error("Unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("Unterminated string")]
    UnterminatedString,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    preserve_newlines: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            preserve_newlines: false,
        }
    }

    /// Emit `Token::Newline` at line breaks instead of skipping them.
    pub fn set_preserve_newlines(&mut self, preserve: bool) {
        self.preserve_newlines = preserve;
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek() {
                Some('\n') if self.preserve_newlines => break,
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('#') => {
                    // The line break itself is left for the next token.
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_ident(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        s
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(s),
                Some('\\') => {
                    if let Some(c) = self.chars.next() {
                        match c {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            _ => s.push(c),
                        }
                    }
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString),
            }
        }
    }

    fn read_number(&mut self, first: char) -> Result<f64, LexError> {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        s.parse().map_err(|_| LexError::InvalidNumber(s))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let c = match self.chars.next() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let tok = match c {
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '.' => Token::Dot,
            '\n' => Token::Newline,
            '-' => match self.chars.peek().copied() {
                Some('>') => {
                    self.chars.next();
                    Token::Arrow
                }
                Some(d) if d.is_ascii_digit() => Token::Num(self.read_number(c)?),
                _ => return Err(LexError::UnexpectedChar(c)),
            },
            '"' => Token::Str(self.read_string()?),
            c if c.is_ascii_digit() => Token::Num(self.read_number(c)?),
            c if c.is_alphabetic() || c == '_' => Token::Ident(self.read_ident(c)),
            _ => return Err(LexError::UnexpectedChar(c)),
        };

        Ok(tok)
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            if tok == Token::Eof {
                tokens.push(tok);
                break;
            }
            tokens.push(tok);
        }
        Ok(tokens)
    }
}
