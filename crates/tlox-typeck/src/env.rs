//! Scoped symbol and type-name environments.
//!
//! Scopes live in an arena indexed by [`ScopeId`]; each records its parent,
//! so lookup follows the lexical chain outward and the nearest binding wins.
//! A separate stack tracks which scope is active. Class scopes outlive the
//! collection pass that created them: the inference pass re-enters them by id.

use rustc_hash::FxHashMap;

use crate::ty::Ty;

/// Index of a scope in the environment arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

/// A named value binding.
#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Ty,
    pub mutable: bool,
}

impl Symbol {
    /// A mutable binding (variables, fields, parameters).
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Symbol {
            name: name.into(),
            ty,
            mutable: true,
        }
    }

    /// An immutable binding (functions, constructors, `this`).
    pub fn immutable(name: impl Into<String>, ty: Ty) -> Self {
        Symbol {
            name: name.into(),
            ty,
            mutable: false,
        }
    }
}

#[derive(Debug, Default)]
struct Scope {
    parent: Option<ScopeId>,
    /// One symbol per name; rebinding overwrites.
    symbols: FxHashMap<String, Symbol>,
    /// Type names (classes and primitives).
    types: FxHashMap<String, Ty>,
}

/// The scope arena plus the stack of active scopes.
#[derive(Debug)]
pub struct TypeEnv {
    scopes: Vec<Scope>,
    /// Active scopes. Index 0 is always the global scope.
    stack: Vec<ScopeId>,
}

impl TypeEnv {
    /// Create an environment with one empty global scope.
    pub fn new() -> Self {
        TypeEnv {
            scopes: vec![Scope::default()],
            stack: vec![ScopeId(0)],
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    /// The innermost active scope.
    pub fn current(&self) -> ScopeId {
        *self.stack.last().expect("scope stack should never be empty")
    }

    /// Allocate a new scope whose parent is the current scope. It is not
    /// entered until [`TypeEnv::push`] is called with its id.
    pub fn new_child(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(self.current()),
            ..Scope::default()
        });
        id
    }

    /// Enter a scope. Its parent must be the current scope.
    pub fn push(&mut self, id: ScopeId) {
        debug_assert_eq!(
            self.scopes[id.0 as usize].parent,
            Some(self.current()),
            "entered scope must be a child of the current scope"
        );
        self.stack.push(id);
    }

    /// Leave the current scope.
    ///
    /// # Panics
    ///
    /// Panics if called when only the global scope remains.
    pub fn pop(&mut self) {
        assert!(self.stack.len() > 1, "cannot pop the global scope");
        self.stack.pop();
    }

    /// Number of active scopes.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.scopes[id.0 as usize].parent
    }

    /// Bind a symbol in the current scope, replacing any binding of the same name there.
    pub fn define(&mut self, symbol: Symbol) {
        let id = self.current();
        self.define_in(id, symbol);
    }

    pub fn define_in(&mut self, id: ScopeId, symbol: Symbol) {
        self.scopes[id.0 as usize]
            .symbols
            .insert(symbol.name.clone(), symbol);
    }

    /// Bind a type name in the current scope.
    pub fn define_type(&mut self, name: impl Into<String>, ty: Ty) {
        let id = self.current();
        self.scopes[id.0 as usize].types.insert(name.into(), ty);
    }

    /// Look up a symbol from the current scope outward.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let mut scope = Some(self.current());
        while let Some(id) = scope {
            let s = &self.scopes[id.0 as usize];
            if let Some(symbol) = s.symbols.get(name) {
                return Some(symbol);
            }
            scope = s.parent;
        }
        None
    }

    /// Look up a symbol bound directly in `id`, without consulting parents.
    pub fn lookup_local(&self, id: ScopeId, name: &str) -> Option<&Symbol> {
        self.scopes[id.0 as usize].symbols.get(name)
    }

    /// Look up a type name from the current scope outward.
    pub fn lookup_type(&self, name: &str) -> Option<&Ty> {
        self.lookup_type_from(self.current(), name)
    }

    /// Look up a type name starting at `id` and walking its parents.
    pub fn lookup_type_from(&self, id: ScopeId, name: &str) -> Option<&Ty> {
        let mut scope = Some(id);
        while let Some(id) = scope {
            let s = &self.scopes[id.0 as usize];
            if let Some(ty) = s.types.get(name) {
                return Some(ty);
            }
            scope = s.parent;
        }
        None
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}
