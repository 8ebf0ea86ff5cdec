use crate::core::ast::{Expr, FnDecl, Stmt};
use crate::core::report::Reporter;
use crate::core::scanner::Token;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub enum VarState {
    // declared but its initializer is still being resolved
    Declared,
    // ready for use
    Defined,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FuncType {
    None,
    Function,
}

/// static pass over the program tree: computes, per variable-reference node,
/// the number of lexical scopes between use and declaration, and reports
/// scope errors through the same channel as the parser; the global scope is
/// never pushed, so globals always resolve dynamically
pub struct Resolver<'a, 'r> {
    scopes: Vec<HashMap<&'a str, VarState>>,
    // <expression id, scope distance>
    locals: HashMap<usize, usize>,
    current_func: FuncType,
    reporter: &'r mut Reporter,
}

impl<'a, 'r> Resolver<'a, 'r> {
    pub fn new(reporter: &'r mut Reporter) -> Self {
        Resolver {
            scopes: Vec::new(),
            locals: HashMap::new(),
            current_func: FuncType::None,
            reporter,
        }
    }

    pub fn resolve(mut self, stmts: &[Stmt<'a>]) -> HashMap<usize, usize> {
        for stmt in stmts {
            self.resolve_stmt(stmt);
        }
        self.locals
    }

    fn resolve_stmt(&mut self, stmt: &Stmt<'a>) {
        match stmt {
            Stmt::Block(stmts) => {
                self.begin_scope();
                for stmt in stmts {
                    self.resolve_stmt(stmt);
                }
                self.end_scope();
            }
            Stmt::Var { name, init } => {
                // declare before the initializer so a self-reference inside
                // it is detectable, define after
                self.declare(name);
                if let Some(init) = init {
                    self.resolve_expr(init);
                }
                self.define(name);
            }
            Stmt::Fn(decl) => {
                // the name is bound in the enclosing scope before the body is
                // resolved, enabling direct and mutual recursion
                self.declare(&decl.name);
                self.define(&decl.name);
                self.resolve_function(decl, FuncType::Function);
            }
            Stmt::Expr(expr) | Stmt::Print(expr) => self.resolve_expr(expr),
            Stmt::If { pred, body, else_b } => {
                self.resolve_expr(pred);
                self.resolve_stmt(body);
                if let Some(else_b) = else_b {
                    self.resolve_stmt(else_b);
                }
            }
            Stmt::Return { keyword, value } => {
                if self.current_func == FuncType::None {
                    self.reporter
                        .error_at(keyword, "Cannot return from top-level code.");
                }
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }
            Stmt::While { pred, body } => {
                self.resolve_expr(pred);
                self.resolve_stmt(body);
            }
        }
    }

    fn resolve_function(&mut self, decl: &FnDecl<'a>, func_type: FuncType) {
        let enclosing = self.current_func;
        self.current_func = func_type;

        self.begin_scope();
        for param in &decl.params {
            self.declare(param);
            self.define(param);
        }
        for stmt in &decl.body {
            self.resolve_stmt(stmt);
        }
        self.end_scope();

        self.current_func = enclosing;
    }

    fn resolve_expr(&mut self, expr: &Expr<'a>) {
        match expr {
            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last() {
                    if matches!(scope.get(name.lexeme), Some(VarState::Declared)) {
                        self.reporter.error_at(
                            name,
                            "Cannot read local variable in its own initializer.",
                        );
                    }
                }
                self.resolve_local(*id, name.lexeme);
            }
            Expr::Assign { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name.lexeme);
            }
            Expr::Binary { lhs, rhs, .. } | Expr::Logical { lhs, rhs, .. } => {
                self.resolve_expr(lhs);
                self.resolve_expr(rhs);
            }
            Expr::Call { callee, args, .. } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }
            Expr::Grouping { expr, .. } => self.resolve_expr(expr),
            Expr::Unary { rhs, .. } => self.resolve_expr(rhs),
            Expr::Literal { .. } => {}
        }
    }

    fn declare(&mut self, name: &Token<'a>) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        if scope.contains_key(name.lexeme) {
            self.reporter.error_at(
                name,
                &format!(
                    "Variable with name '{}' already declared in this scope.",
                    name.lexeme
                ),
            );
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme, VarState::Declared);
        }
    }

    fn define(&mut self, name: &Token<'a>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme, VarState::Defined);
        }
    }

    fn resolve_local(&mut self, id: usize, name: &'a str) {
        for (distance, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                self.locals.insert(id, distance);
                return;
            }
        }
        // not found in any local scope: resolve against the globals at
        // evaluation time
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }
}
