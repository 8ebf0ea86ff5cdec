use wisp::Reporter;

fn run_source(source: &str) -> (String, Reporter) {
    let mut reporter = Reporter::new();
    let mut out = Vec::new();
    wisp::run(source, &mut reporter, &mut out);
    (String::from_utf8(out).expect("utf-8 output"), reporter)
}

fn run_ok(source: &str) -> String {
    let (out, reporter) = run_source(source);
    assert!(!reporter.had_error, "static error: {:?}", reporter.diagnostics());
    assert!(
        !reporter.had_runtime_error,
        "runtime error: {:?}",
        reporter.diagnostics()
    );
    out
}

fn runtime_error(source: &str) -> String {
    let (_, reporter) = run_source(source);
    assert!(reporter.had_runtime_error);
    reporter.diagnostics()[0].clone()
}

#[test]
fn arithmetic_and_number_formatting() {
    assert_eq!(run_ok("print 10 / 2;"), "5\n");
    assert_eq!(run_ok("print 10 / 3;"), "3.3333333333333335\n");
    assert_eq!(run_ok("print 1 + 2 * 3 - 4;"), "3\n");
    assert_eq!(run_ok("print -(-5);"), "5\n");
}

#[test]
fn string_concatenation() {
    assert_eq!(run_ok("print \"foo\" + \"bar\";"), "foobar\n");
}

#[test]
fn equality_semantics() {
    assert_eq!(run_ok("print nil == nil;"), "true\n");
    assert_eq!(run_ok("print nil == false;"), "false\n");
    assert_eq!(run_ok("print 0 == false;"), "false\n");
    assert_eq!(run_ok("print \"1\" == 1;"), "false\n");
    assert_eq!(run_ok("print 1 != 2;"), "true\n");
}

#[test]
fn truthiness_in_conditions() {
    assert_eq!(run_ok("if (0) print \"yes\"; else print \"no\";"), "yes\n");
    assert_eq!(run_ok("if (\"\") print \"yes\"; else print \"no\";"), "yes\n");
    assert_eq!(run_ok("if (nil) print \"yes\"; else print \"no\";"), "no\n");
    assert_eq!(run_ok("print !nil;"), "true\n");
}

#[test]
fn logical_operators_return_operand_values() {
    assert_eq!(run_ok("print \"hi\" or 2;"), "hi\n");
    assert_eq!(run_ok("print nil or \"fallback\";"), "fallback\n");
    assert_eq!(run_ok("print nil and 2;"), "nil\n");
    assert_eq!(run_ok("print 1 and 2;"), "2\n");
}

#[test]
fn short_circuit_skips_the_right_operand() {
    let out = run_ok("fun boom() { print \"boom\"; } false and boom(); print \"done\";");
    assert_eq!(out, "done\n");
}

#[test]
fn variable_shadowing_in_blocks() {
    let out = run_ok("var a = 1; { var a = 2; print a; } print a;");
    assert_eq!(out, "2\n1\n");
}

#[test]
fn assignment_is_an_expression() {
    assert_eq!(run_ok("var a = 1; print a = 2;"), "2\n");
}

#[test]
fn uninitialized_variables_are_nil() {
    assert_eq!(run_ok("var a; print a;"), "nil\n");
}

#[test]
fn while_loop_runs_to_completion() {
    let out = run_ok("var i = 0; while (i < 3) { print i; i = i + 1; }");
    assert_eq!(out, "0\n1\n2\n");
}

#[test]
fn for_loop_runs_to_completion() {
    let out = run_ok("for (var i = 0; i < 3; i = i + 1) print i;");
    assert_eq!(out, "0\n1\n2\n");
}

#[test]
fn recursion() {
    let out = run_ok(
        "fun fib(n) { if (n <= 1) return n; return fib(n - 1) + fib(n - 2); } print fib(10);",
    );
    assert_eq!(out, "55\n");
}

#[test]
fn functions_without_return_yield_nil() {
    assert_eq!(run_ok("fun f() {} print f();"), "nil\n");
    assert_eq!(run_ok("fun f() { return; } print f();"), "nil\n");
}

#[test]
fn callable_display() {
    assert_eq!(run_ok("fun f() {} print f;"), "<fn f>\n");
    assert_eq!(run_ok("print clock;"), "<native fn>\n");
}

#[test]
fn clock_returns_seconds() {
    assert_eq!(run_ok("print clock() >= 0;"), "true\n");
}

#[test]
fn unary_minus_requires_a_number() {
    let err = runtime_error("print -\"x\";");
    assert!(err.contains("Operand must be a number."));
}

#[test]
fn comparison_requires_numbers() {
    let err = runtime_error("print 1 < \"2\";");
    assert!(err.contains("Operands must be numbers."));
}

#[test]
fn plus_requires_matching_operands() {
    let err = runtime_error("print 1 + \"a\";");
    assert!(err.contains("Operands must be two numbers or two strings."));
}

#[test]
fn undefined_variable_is_a_runtime_error() {
    let err = runtime_error("print missing;");
    assert!(err.contains("Undefined variable 'missing'."));
}

#[test]
fn assigning_an_undefined_variable_is_a_runtime_error() {
    let err = runtime_error("missing = 1;");
    assert!(err.contains("Undefined variable 'missing'."));
}

#[test]
fn only_callables_can_be_called() {
    let err = runtime_error("var x = 1; x();");
    assert!(err.contains("Can only call functions."));
}

#[test]
fn arity_is_checked() {
    let err = runtime_error("fun f() {} f(1);");
    assert!(err.contains("Expected 0 arguments but got 1."));
    let err = runtime_error("fun g(a, b) {} g(1);");
    assert!(err.contains("Expected 2 arguments but got 1."));
}

#[test]
fn runtime_errors_carry_the_line() {
    let err = runtime_error("var a = 1;\nprint a + nil;");
    assert!(err.ends_with("[line 2]"));
}

#[test]
fn runtime_error_aborts_but_keeps_prior_output() {
    let (out, reporter) = run_source("print 1; print nil + 2; print 3;");
    assert!(reporter.had_runtime_error);
    assert_eq!(out, "1\n");
}

#[test]
fn division_by_zero_is_infinity() {
    assert_eq!(run_ok("print 1 / 0;"), "inf\n");
}
