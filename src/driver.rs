//! Batch driver: enumerate test files, run the pipeline, print results.
//!
//! The driver scans a directory for `.c` files and pushes each one through
//! scanner → parser → symbol listing, printing the same banners and status
//! lines for every file. Per-file errors never stop the run; only a missing
//! test directory is a driver-level failure.

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use crossterm::style::Stylize;

use crate::diagnostics::Diagnostics;
use crate::parser::lexer::Lexer;
use crate::parser::parse::Parser;
use crate::source::CharStream;
use crate::symbols::SemanticContext;

/// Whether the driver pauses between files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Process every file without stopping.
    Automatic,
    /// Wait for a line on stdin after each file; `exit` ends the run.
    Interactive,
}

/// Runs the analysis pipeline over every `.c` file in a directory.
pub struct TestDriver {
    directory: PathBuf,
    mode: Mode,
}

impl TestDriver {
    pub fn new(directory: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            directory: directory.into(),
            mode,
        }
    }

    /// Run all tests. `Err` only for driver-level failures (unreadable
    /// directory); per-file problems are reported and skipped.
    pub fn run(&self) -> io::Result<()> {
        let mut files: Vec<PathBuf> = fs::read_dir(&self.directory)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "c"))
            .collect();
        files.sort();

        if files.is_empty() {
            eprintln!(
                "{}",
                format!("No test files found in {}", self.directory.display()).red()
            );
            return Ok(());
        }

        println!("{}", "Starting Tests...\n".cyan());

        for path in &files {
            println!("{}", format!("Testing: {}", path.display()).cyan());
            self.run_file(path);

            if self.mode == Mode::Interactive {
                println!(
                    "{}",
                    "\nPress Enter to continue, or type 'exit' to stop...".cyan()
                );
                let mut input = String::new();
                if io::stdin().lock().read_line(&mut input).is_err() {
                    break;
                }
                if input.trim() == "exit" {
                    break;
                }
            }
        }

        println!("{}", "Testing Complete.".cyan());
        Ok(())
    }

    /// One file through the whole pipeline.
    fn run_file(&self, path: &Path) {
        let mut source = match CharStream::open(path) {
            Ok(source) => source,
            Err(_) => {
                Diagnostics::error_opening_file(&path.display().to_string());
                return;
            }
        };

        let mut diagnostics = Diagnostics::new();
        let tokens = Lexer::new(&mut source, &mut diagnostics).analyze();

        if tokens.is_empty() {
            eprintln!("{}", "Lexical Analysis FAILED!".red());
            return;
        }
        println!("{}", "Lexical Analysis PASSED!".green());
        for token in &tokens {
            println!("{}", token);
        }

        let mut ctx = SemanticContext::new();
        let syntax_ok = Parser::new(tokens, &mut ctx, &mut diagnostics).unit();

        if !syntax_ok {
            eprintln!("{}", "Syntax Analysis FAILED!".red());
            return;
        }
        println!("{}", "Syntax Analysis PASSED!".green());

        println!("{}", "Collected Symbols:".cyan());
        for sym in ctx.symbols.all() {
            println!("  - {}", sym);
        }
    }
}
