use wisp::Reporter;

fn run_source(source: &str) -> (String, Reporter) {
    let mut reporter = Reporter::new();
    let mut out = Vec::new();
    wisp::run(source, &mut reporter, &mut out);
    (String::from_utf8(out).expect("utf-8 output"), reporter)
}

#[test]
fn reading_a_local_in_its_own_initializer_is_rejected() {
    let (out, reporter) = run_source("var a = 1; { var a = a; }");
    assert!(reporter.had_error);
    assert!(reporter.diagnostics()[0]
        .contains("Cannot read local variable in its own initializer."));
    // static errors keep the program from running at all
    assert_eq!(out, "");
}

#[test]
fn duplicate_declaration_in_one_scope_is_rejected() {
    let (_, reporter) = run_source("{ var a = 1; var a = 2; }");
    assert!(reporter.had_error);
    assert!(reporter.diagnostics()[0]
        .contains("Variable with name 'a' already declared in this scope."));
}

#[test]
fn redeclaring_a_global_is_allowed() {
    let (out, reporter) = run_source("var a = 1; var a = 2; print a;");
    assert!(!reporter.had_error);
    assert_eq!(out, "2\n");
}

#[test]
fn top_level_return_is_rejected() {
    let (_, reporter) = run_source("return 1;");
    assert!(reporter.had_error);
    assert!(reporter.diagnostics()[0].contains("Cannot return from top-level code."));
}

#[test]
fn return_inside_a_function_is_fine() {
    let (out, reporter) = run_source("fun f() { return 7; } print f();");
    assert!(!reporter.had_error);
    assert_eq!(out, "7\n");
}

#[test]
fn closures_bind_statically_not_dynamically() {
    // the classic scoping probe: `show` captures the global `a` at
    // resolution time, so the later shadowing declaration is invisible to it
    let source = r#"
        var a = "global";
        {
            fun show() {
                print a;
            }
            show();
            var a = "block";
            show();
        }
    "#;
    let (out, reporter) = run_source(source);
    assert!(!reporter.had_error);
    assert_eq!(out, "global\nglobal\n");
}

#[test]
fn parameters_shadow_enclosing_bindings() {
    let (out, reporter) = run_source("var x = 1; fun f(x) { print x; } f(9); print x;");
    assert!(!reporter.had_error);
    assert_eq!(out, "9\n1\n");
}

#[test]
fn function_names_resolve_before_their_bodies() {
    let (out, reporter) = run_source(
        "fun countdown(n) { if (n > 0) { print n; countdown(n - 1); } } countdown(2);",
    );
    assert!(!reporter.had_error);
    assert_eq!(out, "2\n1\n");
}
