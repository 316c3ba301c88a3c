//! Declaration parsing and declaration-time semantics.
//!
//! This module handles the declaration productions:
//!
//! ```text
//! declStruct := 'struct' ID '{' { declVar } '}' ';'
//! declVar    := typeBase ID [arrayDecl] ['=' exprAssign]
//!               { ',' ID [arrayDecl] ['=' exprAssign] } ';'
//! typeBase   := 'int' | 'double' | 'char' | 'struct' ID
//! arrayDecl  := '[' [expr] ']'
//! typeName   := typeBase [arrayDecl]
//! declFunc   := (typeBase | 'void') ['*'] ID '(' [funcArg {',' funcArg}] ')' stmCompound
//! funcArg    := typeBase ID [arrayDecl]
//! ```
//!
//! Two of the grammar's backtracking points live here: `declStruct` rewinds
//! its `struct ID` prefix when no `{` follows (so the same prefix can be a
//! type usage), and `declFunc` rewinds its type-and-name prefix when no `(`
//! follows (so `declVar` gets its turn).
//!
//! Each declaration also performs its semantic action: redefinition checks,
//! struct-type resolution, and symbol creation. A redefined variable,
//! function, or argument is reported and created anyway, so later lookups
//! keep resolving to the newest definition; a redefined struct *member* is
//! reported and dropped, keeping member lists duplicate-free.

use super::parse::Parser;
use super::token::{Token, TokenKind};
use crate::symbols::{Class, Storage, Symbol, Type, TypeBase};

/// Syntactic result of `typeBase`. For struct types, resolution of the name
/// to a struct symbol is deferred until the surrounding production has
/// committed, so a backtracked prefix never reports a spurious error.
pub(crate) struct TypeSpec {
    base: TypeBase,
    struct_name: Option<Token>,
}

/// Decode an integer lexeme the way the scanner classified it: `0x`/`0X`
/// prefix is hex, a leading `0` with more digits is octal, anything else is
/// decimal.
fn decode_int_lexeme(lexeme: &str) -> Option<i32> {
    if let Some(hex) = lexeme.strip_prefix("0x").or_else(|| lexeme.strip_prefix("0X")) {
        return i32::from_str_radix(hex, 16).ok();
    }
    if lexeme.len() > 1 && lexeme.starts_with('0') {
        return i32::from_str_radix(&lexeme[1..], 8).ok();
    }
    lexeme.parse().ok()
}

impl Parser<'_> {
    /// `declStruct := 'struct' ID '{' { declVar } '}' ';'`
    ///
    /// Backtracks over `struct ID` when no `{` follows.
    pub(crate) fn decl_struct(&mut self) -> bool {
        let start = self.checkpoint();
        if !self.consume(TokenKind::Struct) {
            return false;
        }
        if !self.consume(TokenKind::Id) {
            self.restore(start);
            return false;
        }
        let name_tok = self.consumed_token().clone();
        if !self.consume(TokenKind::Lacc) {
            // `struct X` followed by anything else is a type usage.
            self.restore(start);
            return false;
        }

        if self.ctx.symbols.find(&name_tok.lexeme).is_some() {
            self.diagnostics
                .semantic_definition("Struct redefinition", &name_tok.lexeme);
        }
        let sym = self
            .ctx
            .symbols
            .add(&name_tok.lexeme, Class::Struct, self.ctx.crt_depth);
        self.ctx.crt_struct = Some(sym);

        while self.decl_var() {}

        if !self.consume(TokenKind::Racc) {
            self.tkerr("Expected '}' at the end of struct.");
        }
        if !self.consume(TokenKind::Semicolon) {
            self.tkerr("Expected ';' after struct declaration.");
        }
        self.ctx.crt_struct = None;
        true
    }

    /// `declVar := typeBase ID [arrayDecl] ['=' exprAssign] { ',' ... } ';'`
    pub(crate) fn decl_var(&mut self) -> bool {
        let start = self.checkpoint();
        let spec = match self.type_base() {
            Some(spec) => spec,
            None => {
                self.restore(start);
                return false;
            }
        };
        let base = self.resolve_type(spec);

        if self.consume(TokenKind::Id) {
            self.var_declarator(&base);
        } else {
            self.tkerr("Expected variable name after type.");
        }
        while self.consume(TokenKind::Comma) {
            if self.consume(TokenKind::Id) {
                self.var_declarator(&base);
            } else {
                self.tkerr("Expected variable name after ','.");
            }
        }
        if !self.consume(TokenKind::Semicolon) {
            self.tkerr("Expected ';' at the end of variable declaration.");
        }
        true
    }

    /// One declarator: the ID was just consumed; parse the optional array
    /// bound and initializer, then register the symbol.
    fn var_declarator(&mut self, base: &Type) {
        let name_tok = self.consumed_token().clone();
        let mut ty = base.clone();
        self.array_decl(&mut ty);
        if self.consume(TokenKind::Assign) && !self.expr_assign() {
            self.tkerr("Expected initializer expression after '='.");
        }
        self.declare_var(&name_tok, ty);
    }

    /// `typeBase := 'int' | 'double' | 'char' | 'struct' ID`
    pub(crate) fn type_base(&mut self) -> Option<TypeSpec> {
        if self.consume(TokenKind::Int) {
            return Some(TypeSpec {
                base: TypeBase::Int,
                struct_name: None,
            });
        }
        if self.consume(TokenKind::Double) {
            return Some(TypeSpec {
                base: TypeBase::Double,
                struct_name: None,
            });
        }
        if self.consume(TokenKind::Char) {
            return Some(TypeSpec {
                base: TypeBase::Char,
                struct_name: None,
            });
        }
        let start = self.checkpoint();
        if self.consume(TokenKind::Struct) {
            if self.consume(TokenKind::Id) {
                return Some(TypeSpec {
                    base: TypeBase::Struct,
                    struct_name: Some(self.consumed_token().clone()),
                });
            }
            self.restore(start);
        }
        None
    }

    /// Resolve a [`TypeSpec`] into a [`Type`], looking struct names up in
    /// the symbol table. An unresolved or wrong-class name is reported and
    /// leaves `struct_ref` unset.
    pub(crate) fn resolve_type(&mut self, spec: TypeSpec) -> Type {
        let mut ty = Type::scalar(spec.base);
        if let Some(tok) = spec.struct_name {
            match self.ctx.symbols.find(&tok.lexeme) {
                Some(id) if self.ctx.symbols.get(id).cls == Class::Struct => {
                    ty.struct_ref = Some(id);
                }
                Some(_) => {
                    self.diagnostics.semantic(
                        &format!("'{}' does not name a struct type", tok.lexeme),
                        tok.line,
                        tok.column,
                    );
                }
                None => {
                    self.diagnostics.semantic(
                        &format!("Undefined struct type '{}'", tok.lexeme),
                        tok.line,
                        tok.column,
                    );
                }
            }
        }
        ty
    }

    /// `arrayDecl := '[' [expr] ']'`
    ///
    /// A lone `CT_INT` bound is decoded into `n_elements`; any other bound
    /// expression is parsed but leaves an open array, since the front-end
    /// folds no constants.
    pub(crate) fn array_decl(&mut self, ty: &mut Type) -> bool {
        if !self.consume(TokenKind::Lbracket) {
            return false;
        }
        ty.n_elements = 0;
        if self.consume(TokenKind::Rbracket) {
            return true;
        }
        if self.kind() == Some(TokenKind::CtInt) && self.peek_kind(1) == Some(TokenKind::Rbracket)
        {
            self.consume(TokenKind::CtInt);
            if let Some(n) = decode_int_lexeme(&self.consumed_token().lexeme) {
                ty.n_elements = n;
            }
        } else {
            self.expr();
        }
        if !self.consume(TokenKind::Rbracket) {
            self.tkerr("Expected ']' after array declaration.");
        }
        true
    }

    /// `typeName := typeBase [arrayDecl]`, used by cast expressions.
    pub(crate) fn type_name(&mut self) -> Option<Type> {
        let spec = self.type_base()?;
        let mut ty = self.resolve_type(spec);
        self.array_decl(&mut ty);
        Some(ty)
    }

    /// `declFunc := (typeBase | 'void') ['*'] ID '(' [funcArg {',' funcArg}] ')' stmCompound`
    ///
    /// Backtracks over the type-and-name prefix when no `(` follows; the
    /// `(` is the commit point.
    pub(crate) fn decl_func(&mut self) -> bool {
        let start = self.checkpoint();

        let spec = self.type_base();
        let is_void = spec.is_none() && self.consume(TokenKind::Void);
        if spec.is_none() && !is_void {
            return false;
        }
        let pointer_return = self.consume(TokenKind::Mul);
        if !self.consume(TokenKind::Id) {
            self.restore(start);
            return false;
        }
        let name_tok = self.consumed_token().clone();
        if !self.consume(TokenKind::Lpar) {
            self.restore(start);
            return false;
        }

        let mut ret_ty = match spec {
            Some(spec) => self.resolve_type(spec),
            None => Type::scalar(TypeBase::Void),
        };
        if pointer_return {
            // Pointer returns reuse the open-array encoding on the return
            // type; nothing downstream distinguishes further.
            ret_ty.n_elements = 0;
        }

        if self.ctx.symbols.find(&name_tok.lexeme).is_some() {
            self.diagnostics
                .semantic_definition("Function redefinition", &name_tok.lexeme);
        }
        let func = self
            .ctx
            .symbols
            .add(&name_tok.lexeme, Class::Func, self.ctx.crt_depth);
        self.ctx.symbols.get_mut(func).ty = ret_ty;
        self.ctx.crt_func = Some(func);
        self.ctx.crt_depth += 1;

        if self.func_arg() {
            while self.consume(TokenKind::Comma) {
                if !self.func_arg() {
                    self.tkerr("Expected function argument after ','.");
                }
            }
        }
        if !self.consume(TokenKind::Rpar) {
            self.tkerr("Expected ')' after function parameters.");
        }
        if !self.stm_compound() {
            self.tkerr("Expected function body after function declaration.");
        }

        self.ctx.crt_depth -= 1;
        // Drop everything the function introduced (arguments included); the
        // function symbol itself stays.
        self.ctx.symbols.delete_after(Some(func));
        self.ctx.crt_func = None;
        true
    }

    /// `funcArg := typeBase ID [arrayDecl]`
    ///
    /// Each argument lands both in the table (at the function's inner depth,
    /// `MEM=ARG`) and, as an independent copy, in the function's `args`.
    pub(crate) fn func_arg(&mut self) -> bool {
        let spec = match self.type_base() {
            Some(spec) => spec,
            None => return false,
        };
        let mut ty = self.resolve_type(spec);
        if !self.consume(TokenKind::Id) {
            self.tkerr("Expected argument name.");
            return true;
        }
        let name_tok = self.consumed_token().clone();
        self.array_decl(&mut ty);

        if let Some(existing) = self.ctx.symbols.find(&name_tok.lexeme) {
            if self.ctx.symbols.get(existing).depth == self.ctx.crt_depth {
                self.diagnostics
                    .semantic_definition("Argument redefinition", &name_tok.lexeme);
            }
        }
        let id = self
            .ctx
            .symbols
            .add(&name_tok.lexeme, Class::Var, self.ctx.crt_depth);
        {
            let arg = self.ctx.symbols.get_mut(id);
            arg.mem = Storage::Arg;
            arg.ty = ty;
        }
        if let Some(func) = self.ctx.crt_func {
            let copy = self.ctx.symbols.get(id).clone();
            self.ctx.symbols.get_mut(func).args.push(copy);
        }
        true
    }

    /// Register one declared variable or struct member.
    fn declare_var(&mut self, name_tok: &Token, ty: Type) {
        if let Some(struct_id) = self.ctx.crt_struct {
            if self.ctx.symbols.get(struct_id).find_member(&name_tok.lexeme).is_some() {
                self.diagnostics
                    .semantic_definition("Member redefinition", &name_tok.lexeme);
                return;
            }
            let mut member = Symbol::new(&name_tok.lexeme, Class::Var, self.ctx.crt_depth);
            member.mem = Storage::Local;
            member.ty = ty;
            self.ctx.symbols.get_mut(struct_id).members.push(member);
            return;
        }

        if let Some(existing) = self.ctx.symbols.find(&name_tok.lexeme) {
            if self.ctx.symbols.get(existing).depth == self.ctx.crt_depth {
                self.diagnostics
                    .semantic_definition("Variable redefinition", &name_tok.lexeme);
            }
        }
        let id = self
            .ctx
            .symbols
            .add(&name_tok.lexeme, Class::Var, self.ctx.crt_depth);
        let sym = self.ctx.symbols.get_mut(id);
        sym.mem = if self.ctx.crt_func.is_some() {
            Storage::Local
        } else {
            Storage::Global
        };
        sym.ty = ty;
    }
}
