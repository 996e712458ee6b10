//! Constraint representation and the solver loop.

use tracing::{debug, trace};

use crate::classes::ClassTable;
use crate::error::{ConstraintOrigin, TypeError};
use crate::ty::Ty;
use crate::unify::InferCtx;

/// How the two sides of a constraint relate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    /// Both sides must unify.
    Equal,
    /// The left side must be a subtype of the right. Checked, never bound.
    Assignable,
}

/// A deferred typing requirement recorded by the walker.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub lhs: Ty,
    pub rhs: Ty,
    pub relation: Relation,
    pub origin: ConstraintOrigin,
}

impl Constraint {
    pub fn equal(lhs: Ty, rhs: Ty, origin: ConstraintOrigin) -> Self {
        Constraint {
            lhs,
            rhs,
            relation: Relation::Equal,
            origin,
        }
    }

    /// `from` must be assignable to `to`.
    pub fn assignable(from: Ty, to: Ty, origin: ConstraintOrigin) -> Self {
        Constraint {
            lhs: from,
            rhs: to,
            relation: Relation::Assignable,
            origin,
        }
    }
}

/// Check that `from` is assignable to `to` under the current substitution.
///
/// Both sides are resolved first. No variable is bound by this check, so an
/// unbound variable is only assignable to itself.
pub fn check_assignable(
    ctx: &mut InferCtx,
    classes: &ClassTable,
    from: &Ty,
    to: &Ty,
    origin: &ConstraintOrigin,
) -> Result<(), TypeError> {
    let from = ctx.resolve(from.clone());
    let to = ctx.resolve(to.clone());
    if classes.is_assignable(&from, &to) {
        Ok(())
    } else {
        Err(TypeError::NotAssignable {
            from,
            to,
            origin: origin.clone(),
        })
    }
}

/// Process constraints in the order they were generated.
///
/// Without `keep_going` the solver stops at the first failure, so at most
/// one error is returned. With it, failing constraints are reported and
/// skipped.
pub fn solve(
    ctx: &mut InferCtx,
    classes: &ClassTable,
    constraints: &[Constraint],
    keep_going: bool,
) -> Vec<TypeError> {
    debug!(count = constraints.len(), "solving constraints");
    let mut errors = Vec::new();
    for (index, c) in constraints.iter().enumerate() {
        trace!(index, lhs = %c.lhs, rhs = %c.rhs, relation = ?c.relation, "constraint");
        let result = match c.relation {
            Relation::Equal => ctx.unify(c.lhs.clone(), c.rhs.clone(), c.origin.clone()),
            Relation::Assignable => check_assignable(ctx, classes, &c.lhs, &c.rhs, &c.origin),
        };
        if let Err(err) = result {
            debug!(index, error = %err, "constraint failed");
            errors.push(err);
            if !keep_going {
                break;
            }
        }
    }
    errors
}
