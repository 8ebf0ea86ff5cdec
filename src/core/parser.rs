use crate::core::ast::{Expr, FnDecl, Stmt};
use crate::core::report::Reporter;
use crate::core::scanner::{
    Token,
    TokenType::{self, *},
};
use crate::core::value::Value;
use smallvec::SmallVec;
use std::rc::Rc;

/// marker for panic-mode recovery; the diagnostic has already gone through
/// the reporter by the time this is raised
#[derive(Debug)]
pub struct ParseError;

pub struct Parser<'a, 't> {
    tokens: &'t [Token<'a>],
    reporter: &'t mut Reporter,
    pub current: usize,
    /// monotonically assigned node ids; settable so a REPL session keeps ids
    /// unique across lines
    pub id_counter: usize,
}

impl<'a, 't> Parser<'a, 't> {
    pub fn new(tokens: &'t [Token<'a>], reporter: &'t mut Reporter) -> Self {
        Self {
            tokens,
            reporter,
            current: 0,
            id_counter: 0,
        }
    }

    /// parses a full program; on a syntax error the current statement is
    /// discarded and parsing resumes at the next statement boundary, so one
    /// malformed statement reports one error
    pub fn parse(&mut self) -> Vec<Stmt<'a>> {
        let mut stmts = Vec::with_capacity(self.tokens.len() / 4 + 1);
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                stmts.push(stmt);
            }
        }
        stmts
    }

    /// expression-only entry, used by the REPL heritage and the debug printer
    pub fn parse_expression(&mut self) -> Option<Expr<'a>> {
        self.expression().ok()
    }

    //
    // statements
    //

    fn declaration(&mut self) -> Option<Stmt<'a>> {
        let result = match self.peek().token_type {
            Keyword("var") => {
                self.advance();
                self.var_declaration()
            }
            Keyword("fun") => {
                self.advance();
                self.fn_declaration()
            }
            _ => self.statement(),
        };
        match result {
            Ok(stmt) => Some(stmt),
            Err(ParseError) => {
                self.synchronize();
                None
            }
        }
    }

    fn var_declaration(&mut self) -> Result<Stmt<'a>, ParseError> {
        let name = self.consume_identifier("Expect variable name.")?;
        let init = if self.match_token(&SingleChar('=')) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(&SingleChar(';'), "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var { name, init })
    }

    fn fn_declaration(&mut self) -> Result<Stmt<'a>, ParseError> {
        let name = self.consume_identifier("Expect function name.")?;
        self.consume(&SingleChar('('), "Expect '(' after function name.")?;
        let mut params: SmallVec<[Token<'a>; 4]> = SmallVec::new();
        if !self.check(&SingleChar(')')) {
            loop {
                params.push(self.consume_identifier("Expect parameter name.")?);
                if !self.match_token(&SingleChar(',')) {
                    break;
                }
            }
        }
        self.consume(&SingleChar(')'), "Expect ')' after parameters.")?;
        self.consume(&SingleChar('{'), "Expect '{' before function body.")?;
        let body = self.block()?;
        Ok(Stmt::Fn(Rc::new(FnDecl { name, params, body })))
    }

    fn statement(&mut self) -> Result<Stmt<'a>, ParseError> {
        match self.peek().token_type {
            Keyword("if") => {
                self.advance();
                self.if_statement()
            }
            Keyword("while") => {
                self.advance();
                self.while_statement()
            }
            Keyword("for") => {
                self.advance();
                self.for_statement()
            }
            Keyword("print") => {
                self.advance();
                self.print_statement()
            }
            Keyword("return") => {
                self.advance();
                self.return_statement()
            }
            SingleChar('{') => {
                self.advance();
                Ok(Stmt::Block(self.block()?))
            }
            _ => self.expression_statement(),
        }
    }

    fn if_statement(&mut self) -> Result<Stmt<'a>, ParseError> {
        self.consume(&SingleChar('('), "Expect '(' after 'if'.")?;
        let pred = self.expression()?;
        self.consume(&SingleChar(')'), "Expect ')' after if condition.")?;
        let body = Box::new(self.statement()?);
        let else_b = if self.match_token(&Keyword("else")) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If { pred, body, else_b })
    }

    fn while_statement(&mut self) -> Result<Stmt<'a>, ParseError> {
        self.consume(&SingleChar('('), "Expect '(' after 'while'.")?;
        let pred = self.expression()?;
        self.consume(&SingleChar(')'), "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { pred, body })
    }

    /// `for` is pure sugar: the initializer runs once before a `while` whose
    /// body is the loop body followed by the increment, wrapped in a block so
    /// each iteration gets a fresh scope
    fn for_statement(&mut self) -> Result<Stmt<'a>, ParseError> {
        self.consume(&SingleChar('('), "Expect '(' after 'for'.")?;
        let init = if self.match_token(&SingleChar(';')) {
            None
        } else if self.match_token(&Keyword("var")) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };
        let pred = if self.check(&SingleChar(';')) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(&SingleChar(';'), "Expect ';' after loop condition.")?;
        let incr = if self.check(&SingleChar(')')) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(&SingleChar(')'), "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;
        if let Some(incr) = incr {
            body = Stmt::Block(vec![body, Stmt::Expr(incr)]);
        }
        let pred = pred.unwrap_or_else(|| Expr::Literal {
            id: self.next_id(),
            value: Value::Bool(true),
        });
        body = Stmt::While {
            pred,
            body: Box::new(body),
        };
        if let Some(init) = init {
            body = Stmt::Block(vec![init, body]);
        }
        Ok(body)
    }

    fn print_statement(&mut self) -> Result<Stmt<'a>, ParseError> {
        let expr = self.expression()?;
        self.consume(&SingleChar(';'), "Expect ';' after value.")?;
        Ok(Stmt::Print(expr))
    }

    fn return_statement(&mut self) -> Result<Stmt<'a>, ParseError> {
        let keyword = self.prev(1);
        let value = if self.check(&SingleChar(';')) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(&SingleChar(';'), "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn expression_statement(&mut self) -> Result<Stmt<'a>, ParseError> {
        let expr = self.expression()?;
        self.consume(&SingleChar(';'), "Expect ';' after expression.")?;
        Ok(Stmt::Expr(expr))
    }

    /// statements until the closing brace; the opening brace is already
    /// consumed by the caller
    fn block(&mut self) -> Result<Vec<Stmt<'a>>, ParseError> {
        let mut stmts = Vec::with_capacity(8);
        while !self.check(&SingleChar('}')) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                stmts.push(stmt);
            }
        }
        self.consume(&SingleChar('}'), "Expect '}' after block.")?;
        Ok(stmts)
    }

    //
    // expressions, lowest precedence first
    //

    pub fn expression(&mut self) -> Result<Expr<'a>, ParseError> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr<'a>, ParseError> {
        let expr = self.or_expr()?;
        if self.match_token(&SingleChar('=')) {
            let equals = self.prev(1);
            let value = self.assignment()?;
            return match expr {
                Expr::Variable { name, .. } => Ok(Expr::Assign {
                    id: self.next_id(),
                    name,
                    value: Box::new(value),
                }),
                // report and keep parsing; no panic mode for a bad target
                other => {
                    self.reporter.error_at(&equals, "Invalid assignment target.");
                    Ok(other)
                }
            };
        }
        Ok(expr)
    }

    fn or_expr(&mut self) -> Result<Expr<'a>, ParseError> {
        let mut expr = self.and_expr()?;
        while self.match_token(&Keyword("or")) {
            let op = self.prev(1);
            let rhs = self.and_expr()?;
            expr = Expr::Logical {
                id: self.next_id(),
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn and_expr(&mut self) -> Result<Expr<'a>, ParseError> {
        let mut expr = self.equality()?;
        while self.match_token(&Keyword("and")) {
            let op = self.prev(1);
            let rhs = self.equality()?;
            expr = Expr::Logical {
                id: self.next_id(),
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr<'a>, ParseError> {
        let mut expr = self.comparison()?;
        while self.match_any(&[DblChar(('=', '=')), DblChar(('!', '='))]) {
            let op = self.prev(1);
            let rhs = self.comparison()?;
            expr = Expr::Binary {
                id: self.next_id(),
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr<'a>, ParseError> {
        let mut expr = self.term()?;
        while self.match_any(&[
            SingleChar('>'),
            SingleChar('<'),
            DblChar(('>', '=')),
            DblChar(('<', '=')),
        ]) {
            let op = self.prev(1);
            let rhs = self.term()?;
            expr = Expr::Binary {
                id: self.next_id(),
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr<'a>, ParseError> {
        let mut expr = self.factor()?;
        while self.match_any(&[SingleChar('+'), SingleChar('-')]) {
            let op = self.prev(1);
            let rhs = self.factor()?;
            expr = Expr::Binary {
                id: self.next_id(),
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr<'a>, ParseError> {
        let mut expr = self.unary()?;
        while self.match_any(&[SingleChar('*'), SingleChar('/')]) {
            let op = self.prev(1);
            let rhs = self.unary()?;
            expr = Expr::Binary {
                id: self.next_id(),
                op,
                lhs: Box::new(expr),
                rhs: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr<'a>, ParseError> {
        if self.match_any(&[SingleChar('!'), SingleChar('-')]) {
            let op = self.prev(1);
            let rhs = self.unary()?;
            return Ok(Expr::Unary {
                id: self.next_id(),
                op,
                rhs: Box::new(rhs),
            });
        }
        self.call()
    }

    fn call(&mut self) -> Result<Expr<'a>, ParseError> {
        let mut expr = self.primary()?;
        while self.match_token(&SingleChar('(')) {
            expr = self.finish_call(expr)?;
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr<'a>) -> Result<Expr<'a>, ParseError> {
        let mut args = Vec::with_capacity(2);
        if !self.check(&SingleChar(')')) {
            loop {
                args.push(self.expression()?);
                if !self.match_token(&SingleChar(',')) {
                    break;
                }
            }
        }
        let paren = self.consume(&SingleChar(')'), "Expect ')' after arguments.")?;
        Ok(Expr::Call {
            id: self.next_id(),
            callee: Box::new(callee),
            paren,
            args,
        })
    }

    fn primary(&mut self) -> Result<Expr<'a>, ParseError> {
        let token = self.peek();
        match token.token_type {
            Keyword("false") => {
                self.advance();
                Ok(Expr::Literal {
                    id: self.next_id(),
                    value: Value::Bool(false),
                })
            }
            Keyword("true") => {
                self.advance();
                Ok(Expr::Literal {
                    id: self.next_id(),
                    value: Value::Bool(true),
                })
            }
            Keyword("nil") => {
                self.advance();
                Ok(Expr::Literal {
                    id: self.next_id(),
                    value: Value::Nil,
                })
            }
            Literal(value) => {
                self.advance();
                Ok(Expr::Literal {
                    id: self.next_id(),
                    value,
                })
            }
            Identifier => {
                self.advance();
                Ok(Expr::Variable {
                    id: self.next_id(),
                    name: token,
                })
            }
            SingleChar('(') => {
                self.advance();
                let expr = self.expression()?;
                self.consume(&SingleChar(')'), "Expect ')' after expression.")?;
                Ok(Expr::Grouping {
                    id: self.next_id(),
                    expr: Box::new(expr),
                })
            }
            _ => Err(self.error(&token, "Expect expression.")),
        }
    }

    //
    // helpers
    //

    fn error(&mut self, token: &Token<'a>, message: &str) -> ParseError {
        self.reporter.error_at(token, message);
        ParseError
    }

    /// discard tokens until a statement boundary, bounding error cascades
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if matches!(self.prev(1).token_type, SingleChar(';')) {
                return;
            }
            if let Keyword(k) = self.peek().token_type {
                if matches!(
                    k,
                    "class" | "for" | "fun" | "if" | "print" | "return" | "var" | "while"
                ) {
                    return;
                }
            }
            self.advance();
        }
    }

    pub fn next_id(&mut self) -> usize {
        let id = self.id_counter;
        self.id_counter += 1;
        id
    }

    fn check(&self, token_type: &TokenType<'a>) -> bool {
        !self.is_at_end() && self.tokens[self.current].token_type == *token_type
    }

    fn consume(
        &mut self,
        token_type: &TokenType<'a>,
        message: &str,
    ) -> Result<Token<'a>, ParseError> {
        if self.check(token_type) {
            return Ok(self.advance());
        }
        let token = self.peek();
        Err(self.error(&token, message))
    }

    fn consume_identifier(&mut self, message: &str) -> Result<Token<'a>, ParseError> {
        if !self.is_at_end() && matches!(self.tokens[self.current].token_type, Identifier) {
            return Ok(self.advance());
        }
        let token = self.peek();
        Err(self.error(&token, message))
    }

    fn advance(&mut self) -> Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.prev(1)
    }

    fn prev(&self, steps: usize) -> Token<'a> {
        self.tokens[self.current - steps].clone()
    }

    fn peek(&self) -> Token<'a> {
        self.tokens[self.current].clone()
    }

    fn is_at_end(&self) -> bool {
        matches!(self.tokens[self.current].token_type, EoF)
    }

    fn match_token(&mut self, token_type: &TokenType<'a>) -> bool {
        if self.check(token_type) {
            self.advance();
            return true;
        }
        false
    }

    fn match_any(&mut self, token_types: &[TokenType<'a>]) -> bool {
        for token_type in token_types {
            if self.match_token(token_type) {
                return true;
            }
        }
        false
    }
}
