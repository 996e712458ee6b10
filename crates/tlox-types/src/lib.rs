//! Type representation for the tlox type system.
//!
//! Defines the closed set of types the checker reasons about: primitives,
//! nominal classes, function types, inference variables, `void`, and the
//! error sentinel used by recovery mode. Types are immutable values; the
//! checker rebuilds them when a substitution is applied.

use std::fmt;

/// A type variable, identified by a `u32` index into the unification table.
///
/// Indices come from a per-checker counter, so a variable's index doubles
/// as its unique name. Equality is by index only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyVar(pub u32);

impl fmt::Display for TyVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// A nominal type name, used for primitives (`int`, `string`) and classes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TyCon {
    pub name: String,
}

impl TyCon {
    pub fn new(name: impl Into<String>) -> Self {
        TyCon { name: name.into() }
    }
}

impl fmt::Display for TyCon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A tlox type.
///
/// - `Var`: an inference variable, resolved by the constraint solver
/// - `Con`: a primitive, nominal by name (`int`, `string`, `bool`)
/// - `Class`: a class, nominal by name and type arguments
/// - `Fun`: a function type `(params) -> return`
/// - `Void`: the unit type
/// - `Error`: the sentinel written into nodes that recovery mode could not type
///
/// Superclass links are not part of a class type. They live in the checker's
/// class table, so two `Class` values are equal iff their names and
/// argument lists are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    /// A type variable (unresolved during inference).
    Var(TyVar),
    /// A primitive type.
    Con(TyCon),
    /// A class type with its (possibly empty) type arguments.
    Class(TyCon, Vec<Ty>),
    /// A function type: `(param_types) -> return_type`.
    Fun(Vec<Ty>, Box<Ty>),
    /// The unit type.
    Void,
    /// The recovery-mode error sentinel.
    Error,
}

impl Ty {
    /// Create a primitive type by name.
    pub fn prim(name: impl Into<String>) -> Ty {
        Ty::Con(TyCon::new(name))
    }

    /// Create an `int` type.
    pub fn int() -> Ty {
        Ty::prim("int")
    }

    /// Create a `string` type.
    pub fn string() -> Ty {
        Ty::prim("string")
    }

    /// Create a `bool` type.
    pub fn bool() -> Ty {
        Ty::prim("bool")
    }

    /// Create a non-generic class type.
    pub fn class(name: impl Into<String>) -> Ty {
        Ty::Class(TyCon::new(name), Vec::new())
    }

    /// Create a class type applied to type arguments: `Box<int>`.
    pub fn class_with(name: impl Into<String>, args: Vec<Ty>) -> Ty {
        Ty::Class(TyCon::new(name), args)
    }

    /// Create a function type.
    pub fn fun(params: Vec<Ty>, ret: Ty) -> Ty {
        Ty::Fun(params, Box::new(ret))
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Ty::Var(_))
    }

    /// The class name, if this is a class type.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Ty::Class(con, _) => Some(&con.name),
            _ => None,
        }
    }

    /// Whether any type variable occurs in this type.
    pub fn has_vars(&self) -> bool {
        match self {
            Ty::Var(_) => true,
            Ty::Con(_) | Ty::Void | Ty::Error => false,
            Ty::Class(_, args) => args.iter().any(Ty::has_vars),
            Ty::Fun(params, ret) => params.iter().any(Ty::has_vars) || ret.has_vars(),
        }
    }

    /// The type variables of this type, in first-occurrence order, without duplicates.
    pub fn free_vars(&self) -> Vec<TyVar> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars(&self, out: &mut Vec<TyVar>) {
        match self {
            Ty::Var(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            Ty::Con(_) | Ty::Void | Ty::Error => {}
            Ty::Class(_, args) => {
                for a in args {
                    a.collect_vars(out);
                }
            }
            Ty::Fun(params, ret) => {
                for p in params {
                    p.collect_vars(out);
                }
                ret.collect_vars(out);
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Ty]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Var(v) => write!(f, "{}", v),
            Ty::Con(c) => write!(f, "{}", c),
            Ty::Class(c, args) => {
                write!(f, "{}", c)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    write_list(f, args)?;
                    write!(f, ">")?;
                }
                Ok(())
            }
            Ty::Fun(params, ret) => {
                write!(f, "(")?;
                write_list(f, params)?;
                write!(f, ") -> {}", ret)
            }
            Ty::Void => write!(f, "void"),
            Ty::Error => write!(f, "<error>"),
        }
    }
}

// ── ena trait implementations ──────────────────────────────────────────

impl ena::unify::UnifyKey for TyVar {
    type Value = Option<Ty>;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        TyVar(u)
    }

    fn tag() -> &'static str {
        "TyVar"
    }
}

impl ena::unify::EqUnifyValue for Ty {}
