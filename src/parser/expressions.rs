//! Expression parsing.
//!
//! The precedence chain, lowest first:
//!
//! ```text
//! expr        := exprAssign
//! exprAssign  := exprUnary '=' exprAssign | exprOr
//! exprOr      := exprAnd  { '||' exprAnd }
//! exprAnd     := exprEq   { '&&' exprEq }
//! exprEq      := exprRel  { ('=='|'!=') exprRel }
//! exprRel     := exprAdd  { ('<'|'<='|'>'|'>=') exprAdd }
//! exprAdd     := exprMul  { ('+'|'-') exprMul }
//! exprMul     := exprCast { ('*'|'/') exprCast }
//! exprCast    := '(' typeName ')' exprCast | exprUnary
//! exprUnary   := ('-'|'!') exprUnary | exprPostfix
//! exprPostfix := exprPrimary { '[' expr ']' | '.' ID }
//! exprPrimary := ID ['(' [expr {',' expr}] ')' ]
//!              | CT_INT | CT_REAL | CT_CHAR | CT_STRING
//!              | '(' expr ')'
//! ```
//!
//! Two of the grammar's backtracking points live here: `exprAssign` rewinds
//! a consumed `exprUnary` that is not followed by `=`, and `exprCast`
//! rewinds its `(` when what follows is not a type name. Every rule is
//! cursor-neutral on failure, so a failed alternative leaves no trace.

use super::parse::Parser;
use super::token::TokenKind;

impl Parser<'_> {
    pub(crate) fn expr(&mut self) -> bool {
        self.expr_assign()
    }

    /// `exprAssign := exprUnary '=' exprAssign | exprOr`
    pub(crate) fn expr_assign(&mut self) -> bool {
        let start = self.checkpoint();
        if self.expr_unary() {
            if self.consume(TokenKind::Assign) {
                if !self.expr_assign() {
                    self.tkerr("Invalid assignment expression.");
                }
                return true;
            }
            // Not an assignment target after all; re-parse through the
            // operator chain.
            self.restore(start);
        }
        self.expr_or()
    }

    fn expr_or(&mut self) -> bool {
        if !self.expr_and() {
            return false;
        }
        while self.consume(TokenKind::Or) {
            if !self.expr_and() {
                self.tkerr("Invalid OR expression.");
            }
        }
        true
    }

    fn expr_and(&mut self) -> bool {
        if !self.expr_eq() {
            return false;
        }
        while self.consume(TokenKind::And) {
            if !self.expr_eq() {
                self.tkerr("Invalid AND expression.");
            }
        }
        true
    }

    fn expr_eq(&mut self) -> bool {
        if !self.expr_rel() {
            return false;
        }
        while self.consume(TokenKind::Equal) || self.consume(TokenKind::NotEq) {
            if !self.expr_rel() {
                self.tkerr("Invalid equality expression.");
            }
        }
        true
    }

    fn expr_rel(&mut self) -> bool {
        if !self.expr_add() {
            return false;
        }
        while self.consume(TokenKind::Less)
            || self.consume(TokenKind::LessEq)
            || self.consume(TokenKind::Greater)
            || self.consume(TokenKind::GreaterEq)
        {
            if !self.expr_add() {
                self.tkerr("Invalid relational expression.");
            }
        }
        true
    }

    fn expr_add(&mut self) -> bool {
        if !self.expr_mul() {
            return false;
        }
        while self.consume(TokenKind::Add) || self.consume(TokenKind::Sub) {
            if !self.expr_mul() {
                self.tkerr("Invalid addition or subtraction expression.");
            }
        }
        true
    }

    fn expr_mul(&mut self) -> bool {
        if !self.expr_cast() {
            return false;
        }
        while self.consume(TokenKind::Mul) || self.consume(TokenKind::Div) {
            if !self.expr_cast() {
                self.tkerr("Invalid multiplication or division expression.");
            }
        }
        true
    }

    /// `exprCast := '(' typeName ')' exprCast | exprUnary`
    fn expr_cast(&mut self) -> bool {
        let start = self.checkpoint();
        if self.consume(TokenKind::Lpar) {
            if self.type_name().is_some() {
                if !self.consume(TokenKind::Rpar) {
                    self.tkerr("Expected ')' after type cast.");
                }
                return self.expr_cast();
            }
            // `(` opened a parenthesized expression, not a cast.
            self.restore(start);
        }
        self.expr_unary()
    }

    /// `exprUnary := ('-'|'!') exprUnary | exprPostfix`
    pub(crate) fn expr_unary(&mut self) -> bool {
        let start = self.checkpoint();
        if self.consume(TokenKind::Sub) || self.consume(TokenKind::Not) {
            if self.expr_unary() {
                return true;
            }
            self.restore(start);
            return false;
        }
        self.expr_postfix()
    }

    /// `exprPostfix := exprPrimary { '[' expr ']' | '.' ID }`
    fn expr_postfix(&mut self) -> bool {
        if !self.expr_primary() {
            return false;
        }
        loop {
            if self.consume(TokenKind::Lbracket) {
                if !self.expr() {
                    self.tkerr("Expected index expression after '['.");
                }
                if !self.consume(TokenKind::Rbracket) {
                    self.tkerr("Expected ']' after array index.");
                }
            } else if self.consume(TokenKind::Dot) {
                if !self.consume(TokenKind::Id) {
                    self.tkerr("Expected member name after '.'.");
                }
            } else {
                break;
            }
        }
        true
    }

    /// `exprPrimary := ID ['(' args ')'] | constant | '(' expr ')'`
    fn expr_primary(&mut self) -> bool {
        let start = self.checkpoint();

        if self.consume(TokenKind::Id) {
            if self.consume(TokenKind::Lpar) {
                if self.expr() {
                    while self.consume(TokenKind::Comma) {
                        if !self.expr() {
                            self.tkerr("Expected argument after ','.");
                        }
                    }
                }
                if !self.consume(TokenKind::Rpar) {
                    self.tkerr("Expected ')' after function arguments.");
                }
            }
            return true;
        }

        if self.consume(TokenKind::CtInt)
            || self.consume(TokenKind::CtReal)
            || self.consume(TokenKind::CtChar)
            || self.consume(TokenKind::CtString)
        {
            return true;
        }

        if self.consume(TokenKind::Lpar) {
            if self.expr() {
                if !self.consume(TokenKind::Rpar) {
                    self.tkerr("Expected ')' after expression.");
                }
                return true;
            }
            // Leave the `(` for whoever can make sense of it.
            self.restore(start);
        }

        false
    }
}
