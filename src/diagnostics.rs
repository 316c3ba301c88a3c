//! Categorized, positioned error reporting.
//!
//! All three analyzers report through one [`Diagnostics`] sink and then keep
//! going; no analysis error ever aborts the pipeline. Each channel writes a
//! colored line to stderr and bumps a per-category counter so the driver can
//! decide PASSED/FAILED after the fact.

use crossterm::style::Stylize;

/// Error sink shared by the scanner, the parser, and the semantic checks.
///
/// One instance lives per analyzed file; the counters therefore describe
/// exactly one compilation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    lexical_errors: usize,
    syntax_errors: usize,
    semantic_errors: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner-level error: unknown character, bad octal digit, malformed
    /// exponent, bad escape, unterminated comment.
    pub fn lexical(&mut self, message: &str, line: usize, column: usize) {
        self.lexical_errors += 1;
        eprintln!(
            "{}",
            format!("Lexical Error at line {}, column {}: {}", line, column, message).yellow()
        );
    }

    /// Grammar-level error after a commit point.
    pub fn syntax(&mut self, message: &str, line: usize, column: usize) {
        self.syntax_errors += 1;
        eprintln!(
            "{}",
            format!("Syntax Error at line {}, column {}: {}", line, column, message).red()
        );
    }

    /// Declaration-time semantic error with a source position.
    pub fn semantic(&mut self, message: &str, line: usize, column: usize) {
        self.semantic_errors += 1;
        eprintln!(
            "{}",
            format!("Semantic Error at line {}, column {}: {}", line, column, message).magenta()
        );
    }

    /// Declaration-time semantic error keyed by symbol name rather than
    /// position (redefinitions).
    pub fn semantic_definition(&mut self, message: &str, symbol: &str) {
        self.semantic_errors += 1;
        eprintln!(
            "{}",
            format!("Semantic Error (Definition): {} -> '{}'", message, symbol).magenta()
        );
    }

    pub fn error_opening_file(path: &str) {
        eprintln!("{}", format!("Error at opening the file: {}", path).red());
    }

    pub fn error_closing_file(path: &str) {
        eprintln!(
            "{}",
            format!("Error at closing the file: {} File is NOT opened.", path).red()
        );
    }

    pub fn lexical_count(&self) -> usize {
        self.lexical_errors
    }

    pub fn syntax_count(&self) -> usize {
        self.syntax_errors
    }

    pub fn semantic_count(&self) -> usize {
        self.semantic_errors
    }
}
