use crate::consts::C1;
use crate::core::interpreter::Interpreter;
use crate::core::parser::Parser as WispParser;
use crate::core::report::Reporter;
use crate::core::resolver::Resolver;
use crate::core::scanner::Scanner;
use crate::throw;
use clap::error::ErrorKind;
use clap::Parser;
use coloredpp::Colorize;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::process::exit;

pub mod utils;

#[derive(Parser)]
#[command(author, version, about, long_about = None, color = clap::ColorChoice::Always)]
struct Cli {
    /// script to execute; omit it to start the interactive prompt
    script: Option<String>,
}

pub fn cli() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return;
        }
        Err(_) => {
            println!("{}", "Usage: wisp [script]".red());
            exit(64);
        }
    };
    match cli.script {
        Some(script) => run_file(&script),
        None => run_prompt(),
    }
}

/// `wisp <script>`: execute the file once; exit 65 after static errors,
/// 70 after a runtime error
fn run_file(path: &str) {
    match File::open(path) {
        Ok(file) => match unsafe { Mmap::map(&file) } {
            Ok(mmap) => match std::str::from_utf8(&mmap) {
                Ok(source) => execute_file(source),
                Err(_) => {
                    throw!(format!("'{}' is not valid UTF-8", path), true);
                }
            },
            Err(err) => {
                throw!(format!("failed to memory-map file '{}': {}", path, err), true);
            }
        },
        Err(err) => {
            throw!(format!("failed to read file '{}': {}", path, err), true);
        }
    }
}

fn execute_file(source: &str) {
    let mut reporter = Reporter::new();
    let stdout = io::stdout();
    crate::core::run(source, &mut reporter, stdout.lock());
    if reporter.had_error {
        exit(65);
    }
    if reporter.had_runtime_error {
        exit(70);
    }
}

/// `wisp`: read lines from standard input until end-of-input; each line is
/// one atomic scan-parse-resolve-interpret unit against a single persistent
/// interpreter, so top-level declarations survive across lines and a runtime
/// error aborts only the line that raised it
fn run_prompt() {
    println!(
        "{}",
        format!("wisp v{}", env!("CARGO_PKG_VERSION")).fg_hex(C1)
    );
    let mut reporter = Reporter::new();
    let mut interpreter = Interpreter::new(io::stdout());
    let mut next_id = 0usize;
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        // lexemes borrow the line, and the session-long interpreter may keep
        // them alive inside closures; leaking the line is bounded by what the
        // user types
        let source: &'static str = Box::leak(line.into_boxed_str());

        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens(&mut reporter);
        let mut parser = WispParser::new(tokens, &mut reporter);
        // node ids stay unique across the whole session
        parser.id_counter = next_id;
        let stmts = parser.parse();
        next_id = parser.id_counter;
        if !reporter.had_error {
            let locals = Resolver::new(&mut reporter).resolve(&stmts);
            if !reporter.had_error {
                interpreter.add_locals(locals);
                if let Err(err) = interpreter.interpret(&stmts) {
                    reporter.runtime_error(&err);
                }
            }
        }
        reporter.reset();
    }
}
