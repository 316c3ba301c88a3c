//! Statement parsing.
//!
//! ```text
//! stm         := stmCompound
//!              | 'if' '(' expr ')' stm ['else' stm]
//!              | 'while' '(' expr ')' stm
//!              | 'for' '(' [exprAssign] ';' [expr] ';' [exprAssign] ')' stm
//!              | 'break' ';'
//!              | 'return' [expr] ';'
//!              | [exprAssign] ';'
//! stmCompound := '{' { declVar | stm } '}'
//! ```
//!
//! A compound statement is also a scope: entry remembers the symbol table's
//! tail as a marker and bumps the depth, exit truncates the table back to
//! the marker. Statement-level errors after a missing `;` skip ahead to the
//! next `;`/`}` so one bad statement cannot derail the rest of the block.

use super::parse::Parser;
use super::token::TokenKind;

impl Parser<'_> {
    /// `stm`, one statement of any form.
    pub(crate) fn stm(&mut self) -> bool {
        if self.stm_compound() {
            return true;
        }

        if self.consume(TokenKind::If) {
            if !self.consume(TokenKind::Lpar) {
                self.tkerr("Expected '(' after 'if'.");
            }
            if !self.expr() {
                self.tkerr("Expected expression inside if condition.");
            }
            if !self.consume(TokenKind::Rpar) {
                self.tkerr("Expected ')' after if condition.");
            }
            if !self.stm() {
                self.tkerr("Expected statement after 'if'.");
            }
            if self.consume(TokenKind::Else) && !self.stm() {
                self.tkerr("Expected statement after 'else'.");
            }
            return true;
        }

        if self.consume(TokenKind::While) {
            if !self.consume(TokenKind::Lpar) {
                self.tkerr("Expected '(' after 'while'.");
            }
            if !self.expr() {
                self.tkerr("Expected expression inside while condition.");
            }
            if !self.consume(TokenKind::Rpar) {
                self.tkerr("Expected ')' after while condition.");
            }
            if !self.stm() {
                self.tkerr("Expected statement after 'while'.");
            }
            return true;
        }

        if self.consume(TokenKind::For) {
            if !self.consume(TokenKind::Lpar) {
                self.tkerr("Expected '(' after 'for'.");
            }
            self.expr_assign();
            if !self.consume(TokenKind::Semicolon) {
                self.tkerr("Expected ';' inside for loop.");
            }
            self.expr();
            if !self.consume(TokenKind::Semicolon) {
                self.tkerr("Expected ';' inside for loop.");
            }
            self.expr_assign();
            if !self.consume(TokenKind::Rpar) {
                self.tkerr("Expected ')' after for loop.");
            }
            if !self.stm() {
                self.tkerr("Expected statement after 'for'.");
            }
            return true;
        }

        if self.consume(TokenKind::Break) {
            if !self.consume(TokenKind::Semicolon) {
                self.tkerr("Expected ';' after 'break'.");
                self.skip_to_sync();
            }
            return true;
        }

        if self.consume(TokenKind::Return) {
            self.expr();
            if !self.consume(TokenKind::Semicolon) {
                self.tkerr("Expected ';' after 'return'.");
                self.skip_to_sync();
            }
            return true;
        }

        // `[exprAssign] ';'`: expression statement, or a bare `;`.
        if self.expr_assign() {
            if !self.consume(TokenKind::Semicolon) {
                self.tkerr("Expected ';' after expression.");
                self.skip_to_sync();
            }
            return true;
        }
        self.consume(TokenKind::Semicolon)
    }

    /// `stmCompound := '{' { declVar | stm } '}'`, with scope bookkeeping.
    pub(crate) fn stm_compound(&mut self) -> bool {
        if !self.consume(TokenKind::Lacc) {
            return false;
        }
        let marker = self.ctx.symbols.last();
        self.ctx.crt_depth += 1;

        while self.decl_var() || self.stm() {}

        if !self.consume(TokenKind::Racc) {
            self.tkerr("Expected '}' at the end of compound statement.");
        }
        self.ctx.crt_depth -= 1;
        self.ctx.symbols.delete_after(marker);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::parser::lexer::Lexer;
    use crate::source::CharStream;
    use crate::symbols::SemanticContext;

    fn analyze(source: &str) -> (bool, SemanticContext, Diagnostics) {
        let mut src = CharStream::from_str(source);
        let mut diag = Diagnostics::new();
        let tokens = Lexer::new(&mut src, &mut diag).analyze();
        let mut ctx = SemanticContext::new();
        let ok = Parser::new(tokens, &mut ctx, &mut diag).unit();
        (ok, ctx, diag)
    }

    #[test]
    fn test_control_flow_statements() {
        let (ok, _, diag) = analyze(
            r#"
            void f(int n) {
                int i, acc;
                acc = 0;
                for (i = 0; i < n; i = i + 1) {
                    if (i == 3)
                        acc = acc + 2;
                    else
                        acc = acc + 1;
                }
                while (acc > 0) {
                    acc = acc - 1;
                    if (acc == 1)
                        break;
                }
                return;
            }
            "#,
        );
        assert!(ok);
        assert_eq!(diag.syntax_count(), 0);
        assert_eq!(diag.semantic_count(), 0);
    }

    #[test]
    fn test_for_with_empty_slots() {
        let (ok, _, diag) = analyze("void f() { for (;;) break; }");
        assert!(ok);
        assert_eq!(diag.syntax_count(), 0);
    }

    #[test]
    fn test_return_with_and_without_value() {
        let (ok, _, diag) = analyze("int f() { return 1; } void g() { return; }");
        assert!(ok);
        assert_eq!(diag.syntax_count(), 0);
    }

    #[test]
    fn test_empty_statement() {
        let (ok, _, diag) = analyze("void f() { ; ; }");
        assert!(ok);
        assert_eq!(diag.syntax_count(), 0);
    }

    #[test]
    fn test_block_scope_shadowing_and_teardown() {
        // The inner `a` shadows, the block close removes it, and the second
        // `int a;` at function depth is the real redefinition.
        let (ok, ctx, diag) = analyze("void f(){ int a; { int a; } int a; }");
        assert!(ok, "shadowing parses; only the redefinition is semantic");
        assert_eq!(diag.semantic_count(), 1);
        // Teardown: only the function symbol remains.
        assert_eq!(ctx.symbols.len(), 1);
        assert!(ctx.symbols.find("f").is_some());
        assert!(ctx.symbols.find("a").is_none());
    }

    #[test]
    fn test_inner_scope_does_not_collide() {
        let (ok, _, diag) = analyze("void f(){ int a; { int a; { int a; } } }");
        assert!(ok);
        assert_eq!(diag.semantic_count(), 0);
    }

    #[test]
    fn test_missing_semicolon_recovers() {
        let (ok, _, diag) = analyze("void f() { a = 1 b = 2; c = 3; }");
        assert!(!ok);
        assert!(diag.syntax_count() >= 1);
    }

    #[test]
    fn test_statement_at_top_level() {
        // `unit` accepts plain statements alongside declarations.
        let (ok, _, diag) = analyze("int x; x = 3;");
        assert!(ok);
        assert_eq!(diag.syntax_count(), 0);
    }

    #[test]
    fn test_context_cleared_after_function() {
        let (ok, ctx, _) = analyze("void f() { int a; }");
        assert!(ok);
        assert_eq!(ctx.crt_depth, 0);
        assert!(ctx.crt_func.is_none());
        assert!(ctx.crt_struct.is_none());
    }
}
