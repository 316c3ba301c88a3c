//! Symbol table, type model, and the semantic context threaded through the
//! parser.
//!
//! The table is an *ordered* slab, not a map: symbols keep insertion order,
//! lookup scans newest-to-oldest (so the most recent definition shadows
//! older ones), and leaving a scope truncates the tail back to a marker
//! captured on entry. Callers hold [`SymbolId`] indices instead of
//! references; an index stays valid until a truncation removes the slot it
//! names.
//!
//! Struct members and function arguments are owned by their parent symbol
//! and are invisible to [`SymbolTable::find`]; member lookup goes through
//! `Type::struct_ref` to the owning struct.

use std::fmt;

/// Stable handle into a [`SymbolTable`].
pub type SymbolId = usize;

/// Base of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeBase {
    Int,
    Double,
    Char,
    Struct,
    Void,
}

/// Symbol class. The discriminants are the numeric codes used in symbol
/// listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Var = 0,
    Func = 1,
    ExtFunc = 2,
    Struct = 3,
}

/// Storage class. Discriminants are listing codes, as for [`Class`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Global = 0,
    Arg = 1,
    Local = 2,
}

/// A resolved (or partially resolved) AtomC type.
///
/// `n_elements` encodes the array-ness: `-1` scalar, `0` open array `[]`,
/// `> 0` sized array. Function symbols reuse `n_elements = 0` on their
/// return type as the pointer-return marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub base: TypeBase,
    /// Set iff `base == TypeBase::Struct` and the struct name resolved.
    pub struct_ref: Option<SymbolId>,
    pub n_elements: i32,
}

impl Type {
    pub fn scalar(base: TypeBase) -> Self {
        Self {
            base,
            struct_ref: None,
            n_elements: -1,
        }
    }

    pub fn is_array(&self) -> bool {
        self.n_elements >= 0
    }
}

/// One table entry. `args` is populated only for `Class::Func`, `members`
/// only for `Class::Struct`; both hold independent copies owned by the
/// parent symbol.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub cls: Class,
    pub mem: Storage,
    pub ty: Type,
    pub depth: usize,
    pub args: Vec<Symbol>,
    pub members: Vec<Symbol>,
}

impl Symbol {
    /// Fresh symbol with default storage and an unresolved `void` type; the
    /// declaring construct fills the rest in.
    pub fn new(name: &str, cls: Class, depth: usize) -> Self {
        Self {
            name: name.to_string(),
            cls,
            mem: Storage::Global,
            ty: Type::scalar(TypeBase::Void),
            depth,
            args: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Member lookup inside a struct symbol, oldest-first declaration order.
    pub fn find_member(&self, name: &str) -> Option<&Symbol> {
        self.members.iter().find(|m| m.name == name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [CLS={}, MEM={}, DEPTH={}]",
            self.name, self.cls as u8, self.mem as u8, self.depth
        )
    }
}

/// Ordered symbol storage for one compilation.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a symbol and return its handle. No uniqueness check here; the
    /// parser enforces redefinition policy.
    pub fn add(&mut self, name: &str, cls: Class, depth: usize) -> SymbolId {
        self.symbols.push(Symbol::new(name, cls, depth));
        self.symbols.len() - 1
    }

    /// Newest-to-oldest scan: the most recent definition wins.
    pub fn find(&self, name: &str) -> Option<SymbolId> {
        self.symbols.iter().rposition(|s| s.name == name)
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id]
    }

    /// Handle of the newest symbol, used as a scope marker.
    pub fn last(&self) -> Option<SymbolId> {
        self.symbols.len().checked_sub(1)
    }

    /// Remove every symbol added after `marker`; with no marker, remove
    /// everything. This is the whole of scope teardown.
    pub fn delete_after(&mut self, marker: Option<SymbolId>) {
        match marker {
            Some(id) => self.symbols.truncate(id + 1),
            None => self.symbols.clear(),
        }
    }

    pub fn all(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Mutable state the parser threads through one compilation.
///
/// At most one of `crt_func` / `crt_struct` is set at any time: a function
/// body cannot contain a struct definition and vice versa.
#[derive(Debug, Default)]
pub struct SemanticContext {
    pub symbols: SymbolTable,
    pub crt_depth: usize,
    pub crt_func: Option<SymbolId>,
    pub crt_struct: Option<SymbolId>,
}

impl SemanticContext {
    pub fn new() -> Self {
        Self::default()
    }
}
