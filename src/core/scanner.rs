use crate::consts::KEYWORDS;
use crate::core::report::Reporter;
use crate::core::value::Value;
use TokenType::*;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType<'a> {
    Keyword(&'a str),
    SingleChar(char),
    DblChar((char, char)),
    Identifier,
    Literal(Value<'a>),
    EoF,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub lexeme: &'a str,
    pub token_type: TokenType<'a>,
    pub line: usize,
}

impl<'a> Token<'a> {
    fn eof(line: usize) -> Self {
        Token {
            lexeme: "",
            token_type: EoF,
            line,
        }
    }
}

#[derive(Debug)]
pub struct Scanner<'a> {
    input: &'a str,
    tokens: Vec<Token<'a>>,
    line: usize,
    start: usize,
    current: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: Vec::with_capacity(128),
            line: 1,
            start: 0,
            current: 0,
        }
    }

    /// single pass over the source; always ends with one EoF token, even
    /// after lexical errors (recovery is per-character)
    pub fn scan_tokens(&mut self, reporter: &mut Reporter) -> &Vec<Token<'a>> {
        while !self.is_eof() {
            self.start = self.current;
            self.consume(reporter);
        }
        self.tokens.push(Token::eof(self.line));
        &self.tokens
    }

    fn consume(&mut self, reporter: &mut Reporter) {
        let c = self.advance();
        match c {
            '(' | ')' | '{' | '}' | ',' | '.' | ';' | '+' | '-' | '*' => self.push(SingleChar(c)),
            '!' | '=' | '<' | '>' => self.handle_operator(c),
            '/' => self.handle_slash(),
            '"' => self.handle_string(reporter),
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            _ if c.is_ascii_digit() => self.handle_number(),
            _ if c.is_ascii_alphabetic() || c == '_' => self.handle_identifier_or_keyword(),
            _ => reporter.error(self.line, "Unexpected character."),
        }
    }

    // one character of lookahead covers `!=`, `==`, `<=` and `>=`
    fn handle_operator(&mut self, c: char) {
        if self.peek() == '=' {
            self.advance();
            self.push(DblChar((c, '=')));
        } else {
            self.push(SingleChar(c));
        }
    }

    fn handle_slash(&mut self) {
        if self.peek() == '/' {
            while self.peek() != '\n' && !self.is_eof() {
                self.advance();
            }
        } else {
            self.push(SingleChar('/'));
        }
    }

    fn handle_string(&mut self, reporter: &mut Reporter) {
        while self.peek() != '"' && !self.is_eof() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }
        if self.is_eof() {
            reporter.error(self.line, "Unterminated string.");
            return;
        }
        // the closing quote
        self.advance();
        let value = self.input[self.start + 1..self.current - 1].to_string();
        self.push(Literal(Value::Str(value)));
    }

    fn handle_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        // a fractional part needs a digit after the dot; `12.` is a number
        // followed by a dot token
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        let lexeme = &self.input[self.start..self.current];
        let value = lexeme.parse::<f64>().unwrap_or(0.0);
        self.push(Literal(Value::Num(value)));
    }

    fn handle_identifier_or_keyword(&mut self) {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }
        let lexeme = &self.input[self.start..self.current];
        let token_type = if KEYWORDS.contains(&lexeme) {
            Keyword(lexeme)
        } else {
            Identifier
        };
        self.push(token_type);
    }

    fn push(&mut self, token_type: TokenType<'a>) {
        let lexeme = &self.input[self.start..self.current];
        self.tokens.push(Token {
            lexeme,
            token_type,
            line: self.line,
        });
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += c.len_utf8();
        c
    }

    fn peek(&self) -> char {
        self.input[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.input[self.current..].chars().nth(1).unwrap_or('\0')
    }

    fn is_eof(&self) -> bool {
        self.current >= self.input.len()
    }
}
