//! # Introduction
//!
//! `atomc` is a front-end for AtomC, a small C-like teaching language. It
//! reads a source file and reports whether the program is lexically,
//! syntactically, and (at declaration time) semantically well-formed,
//! producing a token listing and a populated symbol table on the way.
//!
//! ## Analysis pipeline
//!
//! ```text
//! Source → CharStream → Lexer → Tokens → Parser (+ SemanticContext) → Symbols
//! ```
//!
//! 1. [`source`] — file-backed character stream with one-character pushback
//!    and line/column tracking.
//! 2. [`parser`] — the state-machine scanner and the backtracking recursive
//!    descent parser.
//! 3. [`symbols`] — the ordered symbol table, the type model, and the
//!    semantic context the parser mutates while descending.
//! 4. [`diagnostics`] — categorized, colored error channels; analysis always
//!    continues after a reported error.
//! 5. [`driver`] — the batch harness that runs the pipeline over a test
//!    directory.
//!
//! ## Supported AtomC subset
//!
//! Types: `int`, `double`, `char`, structs, arrays. Declarations: globals,
//! locals, struct members, functions with typed arguments. Control flow:
//! `if/else`, `while`, `for`, `break`, `return`. Expressions: assignment,
//! logical/relational/arithmetic operators, casts, indexing, member access,
//! calls. No preprocessor, no code generation, no expression type-checking.

pub mod diagnostics;
pub mod driver;
pub mod parser;
pub mod source;
pub mod symbols;
