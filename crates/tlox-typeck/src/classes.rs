//! Class table: per-class metadata and the subtype relation.
//!
//! A class type value carries only its name and type arguments. Everything
//! else the checker knows about a class (its superclass, its member scope)
//! is recorded here when the class is collected.

use rustc_hash::FxHashMap;

use crate::env::ScopeId;
use crate::ty::Ty;

/// What the checker knows about one declared class.
#[derive(Clone, Debug)]
pub struct ClassInfo {
    pub name: String,
    /// The class's own type.
    pub ty: Ty,
    /// Resolved superclass type. `None` for root classes and for classes
    /// whose superclass name did not resolve to a class.
    pub superclass: Option<Ty>,
    /// The class-body scope holding fields, methods, constructors and `this`.
    pub scope: ScopeId,
    /// Fields in declaration order, with the type collected for each.
    /// A field shares its name with a method without either replacing the other.
    pub fields: Vec<(String, Ty)>,
    /// Method names in declaration order.
    pub methods: Vec<String>,
}

impl ClassInfo {
    pub fn has_member(&self, name: &str) -> bool {
        self.field_ty(name).is_some() || self.has_method(name)
    }

    /// The collected type of a field declared on this class itself.
    pub fn field_ty(&self, name: &str) -> Option<&Ty> {
        self.fields.iter().find(|(f, _)| f == name).map(|(_, ty)| ty)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(f, _)| f.as_str())
    }
}

/// Registry of every class collected in a program.
#[derive(Clone, Debug, Default)]
pub struct ClassTable {
    classes: FxHashMap<String, ClassInfo>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a class. Redeclaring a name replaces the earlier entry.
    pub fn register(&mut self, info: ClassInfo) {
        self.classes.insert(info.name.clone(), info);
    }

    pub fn get(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The superclass chain of `name`, nearest ancestor first.
    ///
    /// Stops at the first class with no recorded superclass. Cyclic chains
    /// are cut once every class has been visited.
    pub fn ancestors(&self, name: &str) -> Vec<Ty> {
        let mut chain = Vec::new();
        let mut current = self.get(name);
        while let Some(info) = current {
            let Some(sup) = &info.superclass else { break };
            if chain.len() >= self.classes.len() {
                break;
            }
            chain.push(sup.clone());
            current = sup.class_name().and_then(|n| self.get(n));
        }
        chain
    }

    /// Whether a value of type `from` may be used where `to` is expected.
    ///
    /// True when the types are equal, or when `from` is a class and `to`
    /// appears somewhere on its superclass chain. The error sentinel is
    /// assignable in both directions.
    pub fn is_assignable(&self, from: &Ty, to: &Ty) -> bool {
        if from == to || matches!(from, Ty::Error) || matches!(to, Ty::Error) {
            return true;
        }
        match from.class_name() {
            Some(name) => self.ancestors(name).iter().any(|sup| sup == to),
            None => false,
        }
    }
}
