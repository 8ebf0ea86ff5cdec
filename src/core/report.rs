use crate::core::interpreter::RuntimeError;
use crate::core::scanner::{Token, TokenType};
use coloredpp::Colorize;

/// accumulated diagnostic state for one execution unit, threaded explicitly
/// through the pipeline so independent runs never interfere; every error is
/// printed to the error stream as it is reported and kept for inspection
pub struct Reporter {
    pub had_error: bool,
    pub had_runtime_error: bool,
    diagnostics: Vec<String>,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            had_error: false,
            had_runtime_error: false,
            diagnostics: Vec::new(),
        }
    }

    /// a static error with no token context (scanner errors)
    pub fn error(&mut self, line: usize, message: &str) {
        self.report(line, "", message);
    }

    /// a static error located at a token (parser and resolver errors)
    pub fn error_at(&mut self, token: &Token<'_>, message: &str) {
        if matches!(token.token_type, TokenType::EoF) {
            self.report(token.line, " at end", message);
        } else {
            self.report(token.line, &format!(" at '{}'", token.lexeme), message);
        }
    }

    pub fn runtime_error(&mut self, err: &RuntimeError) {
        let text = err.to_string();
        eprintln!("{}", text.clone().red());
        self.diagnostics.push(text);
        self.had_runtime_error = true;
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// clears the slate between interactive lines
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
        self.diagnostics.clear();
    }

    fn report(&mut self, line: usize, location: &str, message: &str) {
        let text = format!("[line {}] Error{}: {}", line, location, message);
        eprintln!("{}", text.clone().red());
        self.diagnostics.push(text);
        self.had_error = true;
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
