//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing
//! infrastructure: the token cursor, checkpoint/restore for the grammar's
//! backtracking points, error reporting, and the `unit` entry point.
//!
//! # Parser Architecture
//!
//! The parser is recursive descent over the scanned token sequence, with the
//! grammar split across `impl Parser` blocks:
//! - This module: parser state, helper methods, and `unit`
//! - `declarations`: struct, variable, and function declarations plus their
//!   declaration-time semantic actions
//! - `statements`: statements and compound-statement scope handling
//! - `expressions`: the expression precedence chain
//!
//! # Error policy
//!
//! Rules return `bool`; nothing throws. Before a commit point a failing rule
//! restores the cursor and lets the caller try the next alternative. After a
//! commit point, a mismatch is reported through [`Diagnostics`] and parsing
//! continues, skipping to a `;`/`}` synchronization token where that is the
//! only way to make progress.

use super::token::{Token, TokenKind};
use crate::diagnostics::Diagnostics;
use crate::symbols::SemanticContext;

/// Opaque cursor snapshot handed out by [`Parser::checkpoint`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint(usize);

/// Recursive descent parser with integrated declaration-time semantics.
pub struct Parser<'a> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    // Index of the most recently consumed token, for semantic actions that
    // need its lexeme or position.
    pub(crate) consumed: usize,
    pub(crate) ctx: &'a mut SemanticContext,
    pub(crate) diagnostics: &'a mut Diagnostics,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        ctx: &'a mut SemanticContext,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            tokens,
            position: 0,
            consumed: 0,
            ctx,
            diagnostics,
        }
    }

    /// `unit := { declStruct | declFunc | declVar | stm }`
    ///
    /// Parses the whole token sequence. Returns `true` when no syntax error
    /// was reported. An unrecognized prefix is reported and exactly one
    /// token is skipped, so the loop always makes progress.
    pub fn unit(&mut self) -> bool {
        let errors_before = self.diagnostics.syntax_count();
        while !self.at_end() {
            if self.decl_struct() || self.decl_func() || self.decl_var() || self.stm() {
                continue;
            }
            let lexeme = self.tokens[self.position].lexeme.clone();
            self.tkerr(&format!("Unexpected token '{}'.", lexeme));
            self.position += 1;
        }
        self.diagnostics.syntax_count() == errors_before
    }

    // ===== Cursor helpers =====

    pub(crate) fn crt(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub(crate) fn kind(&self) -> Option<TokenKind> {
        self.crt().map(|t| t.kind)
    }

    pub(crate) fn peek_kind(&self, ahead: usize) -> Option<TokenKind> {
        self.tokens.get(self.position + ahead).map(|t| t.kind)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Consume the current token when it has the expected kind.
    pub(crate) fn consume(&mut self, kind: TokenKind) -> bool {
        if self.kind() == Some(kind) {
            self.consumed = self.position;
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// The token most recently accepted by [`consume`](Parser::consume).
    pub(crate) fn consumed_token(&self) -> &Token {
        &self.tokens[self.consumed]
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.position)
    }

    /// Rewind the cursor to a snapshot. Restoring never re-reads characters;
    /// it only moves the index into the already-scanned sequence.
    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.0;
    }

    /// Report a syntax error at the current token (or at end of input).
    pub(crate) fn tkerr(&mut self, message: &str) {
        match self.crt().map(|t| (t.line, t.column)) {
            Some((line, column)) => self.diagnostics.syntax(message, line, column),
            None => {
                let (line, column) = self
                    .tokens
                    .last()
                    .map(|t| (t.line, t.column))
                    .unwrap_or((0, 0));
                self.diagnostics
                    .syntax(&format!("{} (at end of file)", message), line, column);
            }
        }
    }

    /// Skip ahead to the next `;` or `}` so a statement-level error cannot
    /// cascade; a found `;` is consumed.
    pub(crate) fn skip_to_sync(&mut self) {
        while let Some(kind) = self.kind() {
            if kind == TokenKind::Semicolon {
                self.position += 1;
                return;
            }
            if kind == TokenKind::Racc {
                return;
            }
            self.position += 1;
        }
    }
}
