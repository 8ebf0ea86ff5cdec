use crate::core::scanner::Token;
use crate::core::value::Value;
use smallvec::SmallVec;
use std::rc::Rc;

/// expression tree; every node carries a parser-assigned id so the resolver
/// can attach metadata per syntax node, not per name
#[derive(Debug, Clone)]
pub enum Expr<'a> {
    Assign {
        id: usize,
        name: Token<'a>,
        value: Box<Expr<'a>>,
    },
    Binary {
        id: usize,
        op: Token<'a>,
        lhs: Box<Expr<'a>>,
        rhs: Box<Expr<'a>>,
    },
    Call {
        id: usize,
        callee: Box<Expr<'a>>,
        /// the closing paren, kept for the error line of runtime call failures
        paren: Token<'a>,
        args: Vec<Expr<'a>>,
    },
    Grouping {
        id: usize,
        expr: Box<Expr<'a>>,
    },
    Literal {
        id: usize,
        value: Value<'a>,
    },
    Logical {
        id: usize,
        op: Token<'a>,
        lhs: Box<Expr<'a>>,
        rhs: Box<Expr<'a>>,
    },
    Unary {
        id: usize,
        op: Token<'a>,
        rhs: Box<Expr<'a>>,
    },
    Variable {
        id: usize,
        name: Token<'a>,
    },
}

impl Expr<'_> {
    pub fn id(&self) -> usize {
        match self {
            Expr::Assign { id, .. }
            | Expr::Binary { id, .. }
            | Expr::Call { id, .. }
            | Expr::Grouping { id, .. }
            | Expr::Literal { id, .. }
            | Expr::Logical { id, .. }
            | Expr::Unary { id, .. }
            | Expr::Variable { id, .. } => *id,
        }
    }
}

/// a function declaration; shared behind `Rc` so every closure formed from it
/// reuses the same parameter list and body
#[derive(Debug, Clone)]
pub struct FnDecl<'a> {
    pub name: Token<'a>,
    pub params: SmallVec<[Token<'a>; 4]>,
    pub body: Vec<Stmt<'a>>,
}

#[derive(Debug, Clone)]
pub enum Stmt<'a> {
    Block(Vec<Stmt<'a>>),
    Expr(Expr<'a>),
    Fn(Rc<FnDecl<'a>>),
    If {
        pred: Expr<'a>,
        body: Box<Stmt<'a>>,
        else_b: Option<Box<Stmt<'a>>>,
    },
    Print(Expr<'a>),
    Return {
        keyword: Token<'a>,
        value: Option<Expr<'a>>,
    },
    Var {
        name: Token<'a>,
        init: Option<Expr<'a>>,
    },
    While {
        pred: Expr<'a>,
        body: Box<Stmt<'a>>,
    },
}
