//! Final passes over a checked program's type slots.

use tlox_ast::visit::walk_program_mut;
use tlox_ast::Stmt;

use crate::error::TypeError;
use crate::ty::Ty;
use crate::unify::InferCtx;

/// Replace every node's type with its resolved form under the current
/// substitution. Unset slots stay unset. Running it twice changes nothing.
pub fn apply_substitution(ctx: &mut InferCtx, program: &mut [Stmt]) {
    walk_program_mut(program, &mut |slot: &mut Option<Ty>, _span| {
        if let Some(ty) = slot.take() {
            *slot = Some(ctx.resolve(ty));
        }
    });
}

/// One `UnresolvedType` per node whose type still contains a variable.
pub fn unresolved_types(program: &mut [Stmt]) -> Vec<TypeError> {
    let mut out = Vec::new();
    walk_program_mut(program, &mut |slot: &mut Option<Ty>, span| {
        if let Some(ty) = slot.as_ref() {
            if ty.has_vars() {
                out.push(TypeError::UnresolvedType {
                    ty: ty.clone(),
                    span,
                });
            }
        }
    });
    out
}

/// Write `Ty::Error` into every unset slot. Returns how many were filled.
pub fn fill_error_slots(program: &mut [Stmt]) -> usize {
    let mut filled = 0;
    walk_program_mut(program, &mut |slot: &mut Option<Ty>, _span| {
        if slot.is_none() {
            *slot = Some(Ty::Error);
            filled += 1;
        }
    });
    filled
}
