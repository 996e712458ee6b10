//! Unification engine.
//!
//! Built on `ena`'s union-find table. A type variable is either unbound,
//! linked to other variables, or bound to a type; the current substitution
//! is whatever the table says. Bindings are only ever added.

use ena::unify::InPlaceUnificationTable;

use crate::error::{ConstraintOrigin, TypeError};
use crate::ty::{Ty, TyVar};

/// The inference context: owns the unification table.
pub struct InferCtx {
    table: InPlaceUnificationTable<TyVar>,
}

impl InferCtx {
    /// Create a new, empty inference context.
    pub fn new() -> Self {
        InferCtx {
            table: InPlaceUnificationTable::new(),
        }
    }

    // ── Type Variable Creation ──────────────────────────────────────────

    /// Create a fresh, unbound type variable. Indices increase monotonically.
    pub fn fresh_var(&mut self) -> Ty {
        Ty::Var(self.table.new_key(None))
    }

    /// Number of type variables created so far.
    pub fn var_count(&self) -> usize {
        self.table.len()
    }

    // ── Resolution ──────────────────────────────────────────────────────

    /// Apply the current substitution to a type.
    ///
    /// Bound variables are replaced by their (recursively resolved) value.
    /// Unbound variables are normalized to the root of their equivalence
    /// class, so two linked variables resolve to the same representative.
    /// The result is a fixed point: resolving it again changes nothing.
    pub fn resolve(&mut self, ty: Ty) -> Ty {
        match ty {
            Ty::Var(v) => match self.table.probe_value(v) {
                Some(inner) => self.resolve(inner),
                None => Ty::Var(self.table.find(v)),
            },
            Ty::Class(con, args) => {
                let args = args.into_iter().map(|a| self.resolve(a)).collect();
                Ty::Class(con, args)
            }
            Ty::Fun(params, ret) => {
                let params = params.into_iter().map(|p| self.resolve(p)).collect();
                let ret = Box::new(self.resolve(*ret));
                Ty::Fun(params, ret)
            }
            other => other,
        }
    }

    // ── Occurs Check ────────────────────────────────────────────────────

    /// Check if a type variable occurs anywhere within a type, looking
    /// through existing bindings.
    pub fn occurs_in(&mut self, var: TyVar, ty: &Ty) -> bool {
        match ty {
            Ty::Var(v) => {
                if self.table.unioned(*v, var) {
                    return true;
                }
                match self.table.probe_value(*v) {
                    Some(inner) => self.occurs_in(var, &inner),
                    None => false,
                }
            }
            Ty::Con(_) | Ty::Void | Ty::Error => false,
            Ty::Class(_, args) => args.iter().any(|a| self.occurs_in(var, a)),
            Ty::Fun(params, ret) => {
                params.iter().any(|p| self.occurs_in(var, p)) || self.occurs_in(var, ret)
            }
        }
    }

    // ── Unification ─────────────────────────────────────────────────────

    /// Unify two types, extending the substitution so they become equal.
    ///
    /// Both sides are resolved first. On failure the table may already hold
    /// bindings made for earlier components of a compound type; callers
    /// treat any failure as final.
    pub fn unify(&mut self, a: Ty, b: Ty, origin: ConstraintOrigin) -> Result<(), TypeError> {
        let a = self.resolve(a);
        let b = self.resolve(b);

        if a == b {
            return Ok(());
        }

        match (a, b) {
            // The error sentinel absorbs everything.
            (Ty::Error, _) | (_, Ty::Error) => Ok(()),

            // Variable meets variable -- union them.
            (Ty::Var(v1), Ty::Var(v2)) => {
                self.table
                    .unify_var_var(v1, v2)
                    .expect("unifying two unbound vars should not fail");
                Ok(())
            }

            // Variable meets concrete type -- bind the variable (with occurs check).
            (Ty::Var(v), ty) | (ty, Ty::Var(v)) => {
                if self.occurs_in(v, &ty) {
                    Err(TypeError::InfiniteType {
                        var: v,
                        ty,
                        origin,
                    })
                } else {
                    self.table
                        .unify_var_value(v, Some(ty))
                        .expect("binding a var to a concrete type after occurs check should not fail");
                    Ok(())
                }
            }

            // Function types -- unify params pairwise, then return types.
            (Ty::Fun(p1, r1), Ty::Fun(p2, r2)) => {
                if p1.len() != p2.len() {
                    return Err(TypeError::ArityMismatch {
                        expected: p1.len(),
                        found: p2.len(),
                        origin,
                    });
                }
                for (a, b) in p1.into_iter().zip(p2) {
                    self.unify(a, b, origin.clone())?;
                }
                self.unify(*r1, *r2, origin)
            }

            // Class types -- names and argument counts must agree, then args pairwise.
            (Ty::Class(c1, a1), Ty::Class(c2, a2)) => {
                if c1 != c2 || a1.len() != a2.len() {
                    return Err(TypeError::ClassMismatch {
                        expected: Ty::Class(c1, a1),
                        found: Ty::Class(c2, a2),
                        origin,
                    });
                }
                for (a, b) in a1.into_iter().zip(a2) {
                    self.unify(a, b, origin.clone())?;
                }
                Ok(())
            }

            // Everything else is a shape mismatch, including two different primitives.
            (expected, found) => Err(TypeError::CannotUnify {
                expected,
                found,
                origin,
            }),
        }
    }
}

impl Default for InferCtx {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────
