//! AtomC syntax front-end
//!
//! This module turns source characters into an analyzed compilation unit:
//! - [`token`]: the token model (kind, lexeme, position)
//! - [`lexer`]: state-machine tokenization (characters → tokens)
//! - [`parse`]: the recursive descent [`parse::Parser`] over the token
//!   sequence, with its grammar split into declaration, statement, and
//!   expression submodules
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent with limited backtracking: the four
//! ambiguous prefixes (`struct ID`, a function's type-and-name, an
//! assignment target, a cast's `(`) are tried under a cursor checkpoint and
//! rewound on mismatch. No parser generator, no unbounded lookahead.
//!
//! The parser performs declaration-time semantics as it descends: symbol
//! creation, redefinition checks, and struct-type resolution against the
//! [`crate::symbols::SemanticContext`] it is handed.

pub mod lexer;
pub mod parse;
pub mod token;

mod declarations;
mod expressions;
mod statements;
