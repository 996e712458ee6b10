//! Type error types with provenance tracking.
//!
//! Constraint-related errors carry the `ConstraintOrigin` recorded when the
//! constraint was generated, so a failure found late in solving can still
//! point back at the node that produced it.

use std::fmt;

use rowan::TextRange;

use crate::ty::{Ty, TyVar};

/// Where in the program a constraint was generated.
///
/// Spans are optional because the front end may build nodes without
/// source ranges.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstraintOrigin {
    /// `f(x)`: argument `param_idx` must be assignable to the parameter.
    FnArg {
        call_site: Option<TextRange>,
        param_idx: usize,
    },
    /// `f(x)` where `f` is not a function of matching arity: the callee is
    /// equated with a function built from the arguments.
    Call { call_site: Option<TextRange> },
    /// `a + b`: operand types must agree.
    BinOp { op_span: Option<TextRange> },
    /// `var x: T = e`: the initializer must be assignable to `T`.
    Annotation { annotation_span: Option<TextRange> },
    /// A returned value must match the declared return type.
    Return {
        return_span: Option<TextRange>,
        fn_span: Option<TextRange>,
    },
    /// `x = e`: the value must be assignable to the target.
    Assignment { span: Option<TextRange> },
    /// `new C(x)`: argument `param_idx` must be assignable to the constructor parameter.
    Construction {
        span: Option<TextRange>,
        param_idx: usize,
    },
    /// A field's collected type must agree with its inferred type.
    Field { span: Option<TextRange> },
    /// Synthetic origin with no source location.
    Builtin,
}

impl ConstraintOrigin {
    /// The primary source range for this origin.
    pub fn span(&self) -> Option<TextRange> {
        match self {
            ConstraintOrigin::FnArg { call_site, .. } => *call_site,
            ConstraintOrigin::Call { call_site } => *call_site,
            ConstraintOrigin::BinOp { op_span } => *op_span,
            ConstraintOrigin::Annotation { annotation_span } => *annotation_span,
            ConstraintOrigin::Return {
                return_span,
                fn_span,
            } => return_span.or(*fn_span),
            ConstraintOrigin::Assignment { span } => *span,
            ConstraintOrigin::Construction { span, .. } => *span,
            ConstraintOrigin::Field { span } => *span,
            ConstraintOrigin::Builtin => None,
        }
    }
}

/// A type error encountered during checking.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeError {
    /// `new C()` where `C` names no type in scope.
    UndefinedClass {
        name: String,
        span: Option<TextRange>,
    },
    /// `new C()` where `C` names a type that is not a class.
    NotAClass {
        name: String,
        found: Ty,
        span: Option<TextRange>,
    },
    /// `obj.m` where the class of `obj` has no member `m`.
    MemberNotFound {
        ty: Ty,
        member: String,
        span: Option<TextRange>,
    },
    /// `obj.m` where `obj` is neither a class nor an inference variable.
    UnsupportedMemberTarget {
        ty: Ty,
        member: String,
        span: Option<TextRange>,
    },
    /// Two function types with different parameter counts were unified.
    ArityMismatch {
        expected: usize,
        found: usize,
        origin: ConstraintOrigin,
    },
    /// Two class types with different names or argument counts were unified.
    ClassMismatch {
        expected: Ty,
        found: Ty,
        origin: ConstraintOrigin,
    },
    /// Two types have incompatible shapes.
    CannotUnify {
        expected: Ty,
        found: Ty,
        origin: ConstraintOrigin,
    },
    /// A type variable would have to contain itself.
    InfiniteType {
        var: TyVar,
        ty: Ty,
        origin: ConstraintOrigin,
    },
    /// `from` is not a subtype of `to`.
    NotAssignable {
        from: Ty,
        to: Ty,
        origin: ConstraintOrigin,
    },
    /// A name with no binding, reported only when identifiers are strict.
    UndefinedIdentifier {
        name: String,
        span: Option<TextRange>,
    },
    /// A node still holds an inference variable after solving.
    UnresolvedType { ty: Ty, span: Option<TextRange> },
    /// One type parameter matched two different argument types in a generic call.
    TypeParamConflict { var: TyVar, first: Ty, second: Ty },
}

impl TypeError {
    /// The primary source range of the error, if any.
    pub fn span(&self) -> Option<TextRange> {
        match self {
            TypeError::UndefinedClass { span, .. }
            | TypeError::NotAClass { span, .. }
            | TypeError::MemberNotFound { span, .. }
            | TypeError::UnsupportedMemberTarget { span, .. }
            | TypeError::UndefinedIdentifier { span, .. }
            | TypeError::UnresolvedType { span, .. } => *span,
            TypeError::ArityMismatch { origin, .. }
            | TypeError::ClassMismatch { origin, .. }
            | TypeError::CannotUnify { origin, .. }
            | TypeError::InfiniteType { origin, .. }
            | TypeError::NotAssignable { origin, .. } => origin.span(),
            TypeError::TypeParamConflict { .. } => None,
        }
    }

    /// The (expected, found) pair for errors that compare two types.
    pub fn expected_found(&self) -> Option<(&Ty, &Ty)> {
        match self {
            TypeError::ClassMismatch {
                expected, found, ..
            }
            | TypeError::CannotUnify {
                expected, found, ..
            } => Some((expected, found)),
            TypeError::NotAssignable { from, to, .. } => Some((to, from)),
            _ => None,
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::UndefinedClass { name, .. } => {
                write!(f, "undefined class `{}`", name)
            }
            TypeError::NotAClass { name, found, .. } => {
                write!(f, "`{}` is not a class (it names `{}`)", name, found)
            }
            TypeError::MemberNotFound { ty, member, .. } => {
                write!(f, "type `{}` has no member `{}`", ty, member)
            }
            TypeError::UnsupportedMemberTarget { ty, member, .. } => {
                write!(f, "cannot access member `{}` on type `{}`", member, ty)
            }
            TypeError::ArityMismatch {
                expected, found, ..
            } => {
                write!(
                    f,
                    "arity mismatch: expected {} parameters, found {}",
                    expected, found
                )
            }
            TypeError::ClassMismatch {
                expected, found, ..
            } => {
                write!(f, "class mismatch: expected `{}`, found `{}`", expected, found)
            }
            TypeError::CannotUnify {
                expected, found, ..
            } => {
                write!(f, "cannot unify `{}` with `{}`", expected, found)
            }
            TypeError::InfiniteType { var, ty, .. } => {
                write!(f, "infinite type: `{}` occurs in `{}`", var, ty)
            }
            TypeError::NotAssignable { from, to, .. } => {
                write!(f, "type `{}` is not assignable to `{}`", from, to)
            }
            TypeError::UndefinedIdentifier { name, .. } => {
                write!(f, "undefined identifier `{}`", name)
            }
            TypeError::UnresolvedType { ty, .. } => {
                write!(f, "could not infer a concrete type (found `{}`)", ty)
            }
            TypeError::TypeParamConflict { var, first, second } => {
                write!(
                    f,
                    "type parameter `{}` bound to both `{}` and `{}`",
                    var, first, second
                )
            }
        }
    }
}

impl std::error::Error for TypeError {}
