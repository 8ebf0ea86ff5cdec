use crate::core::ast::FnDecl;
use crate::core::env::Environment;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// runtime value domain: everything an expression can evaluate to
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Nil,
    Bool(bool),
    Num(f64),
    Str(String),
    Callable(Callable<'a>),
}

impl Value<'_> {
    /// `nil` and `false` are falsy, every other value is truthy
    /// (including `0` and the empty string)
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }
}

// equality never errors: `nil` equals only `nil`, cross-type comparisons are
// always false, functions compare by identity
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => match (a, b) {
                (Callable::Native(a), Callable::Native(b)) => a.name == b.name,
                (Callable::Function(a), Callable::Function(b)) => Rc::ptr_eq(a, b),
                _ => false,
            },
            _ => false,
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            // `f64` Display already drops the `.0` on integral values and
            // keeps full precision otherwise
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Callable(c) => write!(f, "{}", c),
        }
    }
}

/// the callable contract: a declared arity plus an invocation
#[derive(Clone)]
pub enum Callable<'a> {
    Native(NativeFn),
    Function(Rc<WispFn<'a>>),
}

impl Callable<'_> {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Native(native) => native.arity,
            Callable::Function(func) => func.decl.params.len(),
        }
    }
}

impl fmt::Display for Callable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(_) => write!(f, "<native fn>"),
            Callable::Function(func) => write!(f, "<fn {}>", func.decl.name.lexeme),
        }
    }
}

// captured environments may be cyclic, so Debug must not recurse into them
impl fmt::Debug for Callable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(native) => write!(f, "<native fn {}>", native.name),
            Callable::Function(func) => write!(f, "<fn {}>", func.decl.name.lexeme),
        }
    }
}

pub type NativeCall = for<'a> fn(&[Value<'a>]) -> Value<'a>;

/// host-provided function: fixed arity, no captured environment
#[derive(Clone, Copy)]
pub struct NativeFn {
    pub name: &'static str,
    pub arity: usize,
    pub call: NativeCall,
}

/// user-defined function: the declaration plus the environment that was
/// active when it was declared (its closure)
pub struct WispFn<'a> {
    pub decl: Rc<FnDecl<'a>>,
    pub closure: Rc<RefCell<Environment<'a>>>,
}

/// seconds since the Unix epoch, as a number
pub fn clock<'a>(_args: &[Value<'a>]) -> Value<'a> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Value::Num(elapsed.as_secs_f64())
}
