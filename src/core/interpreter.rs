use crate::core::ast::{Expr, Stmt};
use crate::core::env::Environment;
use crate::core::scanner::Token;
use crate::core::value::{clock, Callable, NativeFn, Value, WispFn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub line: usize,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        Self {
            line: token.line,
            message: message.into(),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[line {}]", self.message, self.line)
    }
}

/// a statement either completes normally, unwinds with a runtime error, or
/// unwinds with a `return` value; `?` propagates both unwind kinds upward
/// until a function-call boundary intercepts `Return`
#[derive(Debug)]
pub enum Unwind<'a> {
    Return(Value<'a>),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind<'_> {
    fn from(err: RuntimeError) -> Self {
        Unwind::Error(err)
    }
}

pub struct Interpreter<'a, W: Write> {
    globals: Rc<RefCell<Environment<'a>>>,
    environment: Rc<RefCell<Environment<'a>>>,
    // expression id -> enclosing-environment hops, from the resolver;
    // absent entries resolve dynamically against the globals
    locals: HashMap<usize, usize>,
    out: W,
}

impl<'a, W: Write> Interpreter<'a, W> {
    pub fn new(out: W) -> Self {
        let globals = Environment::new();
        globals.borrow_mut().define(
            "clock",
            Value::Callable(Callable::Native(NativeFn {
                name: "clock",
                arity: 0,
                call: clock,
            })),
        );
        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            out,
        }
    }

    /// merge in a resolution side-table; node ids must be unique across every
    /// table handed to the same interpreter
    pub fn add_locals(&mut self, locals: HashMap<usize, usize>) {
        self.locals.extend(locals);
    }

    pub fn interpret(&mut self, stmts: &[Stmt<'a>]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            match self.execute(stmt) {
                Ok(()) => {}
                Err(Unwind::Error(err)) => return Err(err),
                // the resolver rejects top-level returns
                Err(Unwind::Return(_)) => return Ok(()),
            }
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt<'a>) -> Result<(), Unwind<'a>> {
        match stmt {
            Stmt::Expr(expr) => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                let _ = writeln!(self.out, "{}", value);
                Ok(())
            }
            Stmt::Var { name, init } => {
                let value = match init {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.borrow_mut().define(name.lexeme, value);
                Ok(())
            }
            Stmt::Block(stmts) => {
                self.execute_block(stmts, Environment::with_enclosing(&self.environment))
            }
            Stmt::If { pred, body, else_b } => {
                if self.evaluate(pred)?.is_truthy() {
                    self.execute(body)
                } else if let Some(else_b) = else_b {
                    self.execute(else_b)
                } else {
                    Ok(())
                }
            }
            Stmt::While { pred, body } => {
                while self.evaluate(pred)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
            Stmt::Fn(decl) => {
                let function = WispFn {
                    decl: Rc::clone(decl),
                    // capture the environment active at declaration time
                    closure: Rc::clone(&self.environment),
                };
                self.environment.borrow_mut().define(
                    decl.name.lexeme,
                    Value::Callable(Callable::Function(Rc::new(function))),
                );
                Ok(())
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Err(Unwind::Return(value))
            }
        }
    }

    /// runs `stmts` with the cursor pointed at `env`; the previous cursor is
    /// restored on every exit path, unwinds included
    fn execute_block(
        &mut self,
        stmts: &[Stmt<'a>],
        env: Rc<RefCell<Environment<'a>>>,
    ) -> Result<(), Unwind<'a>> {
        let previous = std::mem::replace(&mut self.environment, env);
        let result = stmts.iter().try_for_each(|stmt| self.execute(stmt));
        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr<'a>) -> Result<Value<'a>, Unwind<'a>> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Grouping { expr, .. } => self.evaluate(expr),
            Expr::Unary { op, rhs, .. } => {
                let rhs = self.evaluate(rhs)?;
                match op.lexeme {
                    "!" => Ok(Value::Bool(!rhs.is_truthy())),
                    "-" => match rhs {
                        Value::Num(n) => Ok(Value::Num(-n)),
                        _ => Err(RuntimeError::new(op, "Operand must be a number.").into()),
                    },
                    _ => Err(RuntimeError::new(
                        op,
                        format!("Unknown unary operator '{}'.", op.lexeme),
                    )
                    .into()),
                }
            }
            Expr::Binary { op, lhs, rhs, .. } => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                self.eval_binary(op, lhs, rhs).map_err(Unwind::Error)
            }
            Expr::Logical { op, lhs, rhs, .. } => {
                let lhs = self.evaluate(lhs)?;
                // short-circuit yields the deciding operand itself, not a bool
                match op.lexeme {
                    "or" if lhs.is_truthy() => Ok(lhs),
                    "and" if !lhs.is_truthy() => Ok(lhs),
                    _ => self.evaluate(rhs),
                }
            }
            Expr::Variable { id, name } => self.look_up(*id, name).map_err(Unwind::Error),
            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;
                match self.locals.get(id) {
                    Some(&distance) => {
                        Environment::assign_at(&self.environment, distance, name, value.clone());
                    }
                    None => self
                        .globals
                        .borrow_mut()
                        .assign(name, value.clone())
                        .map_err(Unwind::Error)?,
                }
                Ok(value)
            }
            Expr::Call {
                callee,
                paren,
                args,
                ..
            } => {
                let callee = self.evaluate(callee)?;
                let mut evaluated = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated.push(self.evaluate(arg)?);
                }
                let Value::Callable(callable) = callee else {
                    return Err(RuntimeError::new(paren, "Can only call functions.").into());
                };
                if evaluated.len() != callable.arity() {
                    return Err(RuntimeError::new(
                        paren,
                        format!(
                            "Expected {} arguments but got {}.",
                            callable.arity(),
                            evaluated.len()
                        ),
                    )
                    .into());
                }
                self.call(callable, evaluated)
            }
        }
    }

    fn call(
        &mut self,
        callable: Callable<'a>,
        args: Vec<Value<'a>>,
    ) -> Result<Value<'a>, Unwind<'a>> {
        match callable {
            Callable::Native(native) => Ok((native.call)(&args)),
            Callable::Function(func) => {
                let env = Environment::with_enclosing(&func.closure);
                for (param, arg) in func.decl.params.iter().zip(args) {
                    env.borrow_mut().define(param.lexeme, arg);
                }
                match self.execute_block(&func.decl.body, env) {
                    // falling off the end of a body yields nil
                    Ok(()) => Ok(Value::Nil),
                    Err(Unwind::Return(value)) => Ok(value),
                    Err(err) => Err(err),
                }
            }
        }
    }

    fn look_up(&self, id: usize, name: &Token<'a>) -> Result<Value<'a>, RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn eval_binary(
        &self,
        op: &Token<'a>,
        lhs: Value<'a>,
        rhs: Value<'a>,
    ) -> Result<Value<'a>, RuntimeError> {
        match (lhs, op.lexeme, rhs) {
            (Value::Num(a), "+", Value::Num(b)) => Ok(Value::Num(a + b)),
            (Value::Str(a), "+", Value::Str(b)) => Ok(Value::Str(a + &b)),
            (_, "+", _) => Err(RuntimeError::new(
                op,
                "Operands must be two numbers or two strings.",
            )),
            (Value::Num(a), "-", Value::Num(b)) => Ok(Value::Num(a - b)),
            (Value::Num(a), "*", Value::Num(b)) => Ok(Value::Num(a * b)),
            (Value::Num(a), "/", Value::Num(b)) => Ok(Value::Num(a / b)),
            (Value::Num(a), ">", Value::Num(b)) => Ok(Value::Bool(a > b)),
            (Value::Num(a), ">=", Value::Num(b)) => Ok(Value::Bool(a >= b)),
            (Value::Num(a), "<", Value::Num(b)) => Ok(Value::Bool(a < b)),
            (Value::Num(a), "<=", Value::Num(b)) => Ok(Value::Bool(a <= b)),
            (lhs, "==", rhs) => Ok(Value::Bool(lhs == rhs)),
            (lhs, "!=", rhs) => Ok(Value::Bool(lhs != rhs)),
            (_, "-" | "*" | "/" | ">" | ">=" | "<" | "<=", _) => {
                Err(RuntimeError::new(op, "Operands must be numbers."))
            }
            (_, other, _) => Err(RuntimeError::new(
                op,
                format!("Unknown operator '{}'.", other),
            )),
        }
    }
}
