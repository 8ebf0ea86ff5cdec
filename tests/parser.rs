use wisp::core::ast::Stmt;
use wisp::core::parser::Parser;
use wisp::core::printer::print_expr;
use wisp::core::scanner::Scanner;
use wisp::Reporter;

fn parse_expr_to_string(source: &str) -> String {
    let mut reporter = Reporter::new();
    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens(&mut reporter);
    let mut parser = Parser::new(tokens, &mut reporter);
    let expr = parser.parse_expression().expect("expression should parse");
    print_expr(&expr)
}

fn parse_program(source: &str) -> (Vec<Stmt<'_>>, Reporter) {
    let mut reporter = Reporter::new();
    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens(&mut reporter);
    let mut parser = Parser::new(tokens, &mut reporter);
    let stmts = parser.parse();
    (stmts, reporter)
}

#[test]
fn unary_binds_tighter_than_factor() {
    assert_eq!(
        parse_expr_to_string("-123 * (45.67)"),
        "(* (- 123) (group 45.67))"
    );
}

#[test]
fn factor_binds_tighter_than_term() {
    assert_eq!(parse_expr_to_string("1 + 2 * 3"), "(+ 1 (* 2 3))");
}

#[test]
fn comparison_and_equality_layers() {
    assert_eq!(
        parse_expr_to_string("1 < 2 == 3 >= 4"),
        "(== (< 1 2) (>= 3 4))"
    );
}

#[test]
fn binary_operators_are_left_associative() {
    assert_eq!(parse_expr_to_string("1 - 2 - 3"), "(- (- 1 2) 3)");
}

#[test]
fn assignment_is_right_associative_and_spans_or() {
    assert_eq!(parse_expr_to_string("a = b or c"), "(= a (or b c))");
    assert_eq!(parse_expr_to_string("a = b = c"), "(= a (= b c))");
}

#[test]
fn calls_chain_left_to_right() {
    assert_eq!(
        parse_expr_to_string("f(1, 2)(3)"),
        "(call (call f 1 2) 3)"
    );
}

#[test]
fn keyword_literals() {
    assert_eq!(parse_expr_to_string("!true == false"), "(== (! true) false)");
    assert_eq!(parse_expr_to_string("nil"), "nil");
}

#[test]
fn invalid_assignment_target_reports_without_recovery() {
    let (stmts, reporter) = parse_program("1 = 2; print 3;");
    assert!(reporter.had_error);
    assert!(reporter.diagnostics()[0].contains("Invalid assignment target."));
    // no panic mode: both statements survive
    assert_eq!(stmts.len(), 2);
}

#[test]
fn syntax_error_recovers_at_next_statement() {
    let (stmts, reporter) = parse_program("var = 1;\nprint 2;");
    assert!(reporter.had_error);
    assert!(reporter.diagnostics()[0].contains("Expect variable name."));
    assert_eq!(stmts.len(), 1);
    assert!(matches!(stmts[0], Stmt::Print(_)));
}

#[test]
fn one_error_per_malformed_statement() {
    let (_, reporter) = parse_program("var 1 2 3;\nvar x = 4;");
    assert_eq!(reporter.diagnostics().len(), 1);
}

#[test]
fn for_loop_desugars_to_block_and_while() {
    let (stmts, reporter) = parse_program("for (var i = 0; i < 3; i = i + 1) print i;");
    assert!(!reporter.had_error);
    assert_eq!(stmts.len(), 1);
    match &stmts[0] {
        Stmt::Block(inner) => {
            assert_eq!(inner.len(), 2);
            assert!(matches!(inner[0], Stmt::Var { .. }));
            match &inner[1] {
                Stmt::While { body, .. } => {
                    // body block holds the original body plus the increment
                    match body.as_ref() {
                        Stmt::Block(parts) => {
                            assert_eq!(parts.len(), 2);
                            assert!(matches!(parts[0], Stmt::Print(_)));
                            assert!(matches!(parts[1], Stmt::Expr(_)));
                        }
                        other => panic!("expected block body, got {:?}", other),
                    }
                }
                other => panic!("expected while, got {:?}", other),
            }
        }
        other => panic!("expected block, got {:?}", other),
    }
}

#[test]
fn for_loop_with_empty_clauses_still_gets_a_condition() {
    let (stmts, reporter) = parse_program("for (;;) print 1;");
    assert!(!reporter.had_error);
    assert!(matches!(stmts[0], Stmt::While { .. }));
}

#[test]
fn error_at_end_of_input() {
    let (_, reporter) = parse_program("print 1");
    assert!(reporter.had_error);
    assert!(reporter.diagnostics()[0].contains("at end"));
}
