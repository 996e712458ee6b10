//! Type-parameter matching for generic function calls.
//!
//! Independent of the unification table: a signature's type variables are
//! treated as parameters and bound by structurally matching each parameter
//! type against the corresponding argument type.

use rustc_hash::FxHashMap;

use crate::error::TypeError;
use crate::ty::{Ty, TyVar};

pub type Bindings = FxHashMap<TyVar, Ty>;

/// Bind the type variables of a function signature from argument types.
///
/// Returns `Ok(None)` if `fn_ty` is not a function of the right arity, if a
/// parameter's shape does not fit its argument, or if some variable of the
/// signature (including one only in the return type) is left unbound. A
/// variable matched against two different types is a `TypeParamConflict`.
pub fn match_generic_call(fn_ty: &Ty, args: &[Ty]) -> Result<Option<Bindings>, TypeError> {
    let Ty::Fun(params, _) = fn_ty else {
        return Ok(None);
    };
    if params.len() != args.len() {
        return Ok(None);
    }

    let mut bindings = Bindings::default();
    for (param, arg) in params.iter().zip(args) {
        if !bind(param, arg, &mut bindings)? {
            return Ok(None);
        }
    }

    if fn_ty.free_vars().iter().all(|v| bindings.contains_key(v)) {
        Ok(Some(bindings))
    } else {
        Ok(None)
    }
}

/// Match one pattern type against a concrete type. `Ok(false)` on a shape mismatch.
fn bind(pattern: &Ty, actual: &Ty, bindings: &mut Bindings) -> Result<bool, TypeError> {
    match (pattern, actual) {
        (Ty::Var(v), _) => match bindings.get(v) {
            Some(existing) if existing != actual => Err(TypeError::TypeParamConflict {
                var: *v,
                first: existing.clone(),
                second: actual.clone(),
            }),
            Some(_) => Ok(true),
            None => {
                bindings.insert(*v, actual.clone());
                Ok(true)
            }
        },
        (Ty::Class(c1, a1), Ty::Class(c2, a2)) if c1 == c2 && a1.len() == a2.len() => {
            for (p, a) in a1.iter().zip(a2) {
                if !bind(p, a, bindings)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Ty::Fun(p1, r1), Ty::Fun(p2, r2)) if p1.len() == p2.len() => {
            for (p, a) in p1.iter().zip(p2) {
                if !bind(p, a, bindings)? {
                    return Ok(false);
                }
            }
            bind(r1, r2, bindings)
        }
        _ => Ok(pattern == actual),
    }
}

/// Substitute bound type parameters into a type.
pub fn instantiate(ty: &Ty, bindings: &Bindings) -> Ty {
    match ty {
        Ty::Var(v) => bindings.get(v).cloned().unwrap_or_else(|| ty.clone()),
        Ty::Class(con, args) => Ty::Class(
            con.clone(),
            args.iter().map(|a| instantiate(a, bindings)).collect(),
        ),
        Ty::Fun(params, ret) => Ty::fun(
            params.iter().map(|p| instantiate(p, bindings)).collect(),
            instantiate(ret, bindings),
        ),
        Ty::Con(_) | Ty::Void | Ty::Error => ty.clone(),
    }
}
