use crate::core::interpreter::Interpreter;
use crate::core::parser::Parser;
use crate::core::report::Reporter;
use crate::core::resolver::Resolver;
use crate::core::scanner::Scanner;
use std::io::Write;

pub mod ast;
pub mod env;
pub mod interpreter;
pub mod parser;
pub mod printer;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod value;

/// runs one source unit through the whole pipeline: scan, parse, resolve,
/// interpret; execution never starts if any static error was reported
pub fn run<W: Write>(source: &str, reporter: &mut Reporter, out: W) {
    // source tokenizer
    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens(reporter);
    // token parser
    let mut parser = Parser::new(tokens, reporter);
    let stmts = parser.parse();
    if reporter.had_error {
        return;
    }
    // scope and locality pass
    let locals = Resolver::new(reporter).resolve(&stmts);
    if reporter.had_error {
        return;
    }
    // tree-walking evaluation
    let mut interpreter = Interpreter::new(out);
    interpreter.add_locals(locals);
    if let Err(err) = interpreter.interpret(&stmts) {
        reporter.runtime_error(&err);
    }
}
