//! Traversal over every node's inferred-type slot.
//!
//! The checker's final passes (substitution, error-sentinel filling, the
//! leftover-variable check) all need to touch every node exactly once
//! without caring about node kinds. The walk is pre-order: a node's slot
//! is visited before its children's.

use rowan::TextRange;
use tlox_types::Ty;

use crate::expr::{Expr, ExprKind};
use crate::item::{ClassDecl, CtorDecl, FieldDecl, FnDecl, Stmt};

/// Visit every type slot in a program.
pub fn walk_program_mut<F>(program: &mut [Stmt], f: &mut F)
where
    F: FnMut(&mut Option<Ty>, Option<TextRange>),
{
    for stmt in program {
        walk_stmt_mut(stmt, f);
    }
}

pub fn walk_stmt_mut<F>(stmt: &mut Stmt, f: &mut F)
where
    F: FnMut(&mut Option<Ty>, Option<TextRange>),
{
    match stmt {
        Stmt::Var(d) => {
            f(&mut d.ty, d.span);
            if let Some(init) = &mut d.init {
                walk_expr_mut(init, f);
            }
        }
        Stmt::Field(d) => walk_field_mut(d, f),
        Stmt::Function(d) => walk_fn_mut(d, f),
        Stmt::Constructor(d) => walk_ctor_mut(d, f),
        Stmt::Class(d) => walk_class_mut(d, f),
        Stmt::Return(r) => {
            f(&mut r.ty, r.span);
            if let Some(value) = &mut r.value {
                walk_expr_mut(value, f);
            }
        }
        Stmt::Expr(e) => walk_expr_mut(e, f),
    }
}

fn walk_field_mut<F>(d: &mut FieldDecl, f: &mut F)
where
    F: FnMut(&mut Option<Ty>, Option<TextRange>),
{
    f(&mut d.ty, d.span);
    if let Some(init) = &mut d.init {
        walk_expr_mut(init, f);
    }
}

fn walk_fn_mut<F>(d: &mut FnDecl, f: &mut F)
where
    F: FnMut(&mut Option<Ty>, Option<TextRange>),
{
    f(&mut d.ty, d.span);
    walk_program_mut(&mut d.body, f);
}

fn walk_ctor_mut<F>(d: &mut CtorDecl, f: &mut F)
where
    F: FnMut(&mut Option<Ty>, Option<TextRange>),
{
    f(&mut d.ty, d.span);
    walk_program_mut(&mut d.body, f);
}

fn walk_class_mut<F>(d: &mut ClassDecl, f: &mut F)
where
    F: FnMut(&mut Option<Ty>, Option<TextRange>),
{
    f(&mut d.ty, d.span);
    for field in &mut d.fields {
        walk_field_mut(field, f);
    }
    for method in &mut d.methods {
        walk_fn_mut(method, f);
    }
    for ctor in &mut d.ctors {
        walk_ctor_mut(ctor, f);
    }
}

pub fn walk_expr_mut<F>(expr: &mut Expr, f: &mut F)
where
    F: FnMut(&mut Option<Ty>, Option<TextRange>),
{
    f(&mut expr.ty, expr.span);
    match &mut expr.kind {
        ExprKind::Literal(_) | ExprKind::Identifier(_) => {}
        ExprKind::Binary { lhs, rhs, .. } => {
            walk_expr_mut(lhs, f);
            walk_expr_mut(rhs, f);
        }
        ExprKind::Call { callee, args } => {
            walk_expr_mut(callee, f);
            for arg in args {
                walk_expr_mut(arg, f);
            }
        }
        ExprKind::Member { object, .. } => walk_expr_mut(object, f),
        ExprKind::Assign { target, value } => {
            walk_expr_mut(target, f);
            walk_expr_mut(value, f);
        }
        ExprKind::New { args, .. } => {
            for arg in args {
                walk_expr_mut(arg, f);
            }
        }
    }
}
