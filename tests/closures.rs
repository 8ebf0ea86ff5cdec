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

#[test]
fn counters_keep_independent_state() {
    let source = r#"
        fun makeCounter() {
            var count = 0;
            fun increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        var a = makeCounter();
        var b = makeCounter();
        print a();
        print a();
        print b();
    "#;
    assert_eq!(run_ok(source), "1\n2\n1\n");
}

#[test]
fn closures_capture_per_iteration_copies() {
    let source = r#"
        var f1;
        var f2;
        for (var i = 0; i < 2; i = i + 1) {
            var j = i;
            fun show() {
                print j;
            }
            if (j == 0) f1 = show;
            else f2 = show;
        }
        f1();
        f2();
    "#;
    assert_eq!(run_ok(source), "0\n1\n");
}

#[test]
fn sibling_closures_share_one_environment() {
    let source = r#"
        var inc;
        var get;
        {
            var n = 0;
            fun bump() {
                n = n + 1;
            }
            fun read() {
                return n;
            }
            inc = bump;
            get = read;
        }
        inc();
        inc();
        print get();
    "#;
    assert_eq!(run_ok(source), "2\n");
}

#[test]
fn mutual_recursion_through_globals() {
    let source = r#"
        fun isEven(n) {
            if (n == 0) return true;
            return isOdd(n - 1);
        }
        fun isOdd(n) {
            if (n == 0) return false;
            return isEven(n - 1);
        }
        print isEven(10);
        print isOdd(10);
    "#;
    assert_eq!(run_ok(source), "true\nfalse\n");
}

#[test]
fn returned_closures_outlive_their_defining_call() {
    let source = r#"
        fun outer() {
            var greeting = "hello";
            fun inner() {
                return greeting + " world";
            }
            return inner;
        }
        var f = outer();
        print f();
    "#;
    assert_eq!(run_ok(source), "hello world\n");
}

#[test]
fn assignment_through_a_closure_is_visible_outside() {
    let source = r#"
        var x = "before";
        fun set() {
            x = "after";
        }
        set();
        print x;
    "#;
    assert_eq!(run_ok(source), "after\n");
}

#[test]
fn functions_compare_by_identity() {
    let source = r#"
        fun f() {}
        var g = f;
        print f == g;
        fun h() {}
        print f == h;
    "#;
    assert_eq!(run_ok(source), "true\nfalse\n");
}
