//! The inference walker and the checking pipeline.
//!
//! `TypeChecker` owns all per-program state: the unification table, the
//! scope arena, the class table, the overload sets and the constraint list.
//! A check runs in four phases:
//!
//! 1. collection (see `collect`): signatures and classes are registered
//! 2. inference: every node gets a provisional type, constraints are emitted
//! 3. solving: constraints are processed in emission order
//! 4. application (see `apply`): every node's type is resolved in place
//!
//! The walker only emits constraints. It never unifies directly, so every
//! type it writes into a node may still contain variables until the final
//! phase runs.

use rowan::TextRange;
use rustc_hash::FxHashMap;
use tlox_ast::{
    BinOp, ClassDecl, CtorDecl, Expr, ExprKind, FieldDecl, FnDecl, OpClass, ReturnStmt, Stmt,
    VarDecl,
};
use tracing::{debug, instrument};

use crate::apply;
use crate::builtins::register_builtins;
use crate::classes::ClassTable;
use crate::collect::{Collected, DeclKey};
use crate::config::{CtorResolution, InferConfig};
use crate::env::{ScopeId, Symbol, TypeEnv};
use crate::error::{ConstraintOrigin, TypeError};
use crate::overload::{self, Overload, OverloadSet};
use crate::solve::{self, Constraint};
use crate::ty::Ty;
use crate::unify::InferCtx;
use crate::TypeckResult;

/// Per-program checker state. Consumed by a single check.
pub struct TypeChecker {
    pub(crate) ctx: InferCtx,
    pub(crate) env: TypeEnv,
    pub(crate) classes: ClassTable,
    /// Free function overloads by name.
    pub(crate) overloads: FxHashMap<String, OverloadSet>,
    /// Method overloads by class name, then method name.
    pub(crate) methods: FxHashMap<String, FxHashMap<String, OverloadSet>>,
    /// Constructor overloads by class name.
    pub(crate) constructors: FxHashMap<String, OverloadSet>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) collected: FxHashMap<DeclKey, Vec<Collected>>,
    pub(crate) cursors: FxHashMap<DeclKey, usize>,
    pub(crate) config: InferConfig,
}

impl TypeChecker {
    pub fn new(config: InferConfig) -> Self {
        let mut env = TypeEnv::new();
        register_builtins(&mut env);
        TypeChecker {
            ctx: InferCtx::new(),
            env,
            classes: ClassTable::new(),
            overloads: FxHashMap::default(),
            methods: FxHashMap::default(),
            constructors: FxHashMap::default(),
            constraints: Vec::new(),
            collected: FxHashMap::default(),
            cursors: FxHashMap::default(),
            config,
        }
    }

    /// Check a program, stopping at the first error.
    ///
    /// On success every node's type slot holds its fully resolved type. On
    /// failure the slots hold whatever provisional types the walker wrote.
    #[instrument(skip_all, fields(statements = program.len()))]
    pub fn infer_program(self, program: &mut [Stmt]) -> TypeckResult {
        self.run(program, false)
    }

    /// Check a program, collecting as many errors as possible.
    ///
    /// A walker error abandons only the current top-level statement and a
    /// solver error only the current constraint. The partial substitution is
    /// always applied, and any slot left unset is filled with `Ty::Error`.
    #[instrument(skip_all, fields(statements = program.len()))]
    pub fn infer_program_with_recovery(self, program: &mut [Stmt]) -> TypeckResult {
        self.run(program, true)
    }

    fn run(mut self, program: &mut [Stmt], recover: bool) -> TypeckResult {
        self.collect_program(program);

        let mut errors = Vec::new();
        for stmt in program.iter_mut() {
            if let Err(err) = self.infer_stmt(stmt) {
                debug!(error = %err, "inference failed");
                errors.push(err);
                if !recover {
                    break;
                }
            }
        }

        if errors.is_empty() || recover {
            errors.extend(solve::solve(
                &mut self.ctx,
                &self.classes,
                &self.constraints,
                recover,
            ));
        }

        let mut warnings = Vec::new();
        if errors.is_empty() || recover {
            apply::apply_substitution(&mut self.ctx, program);
        }
        if errors.is_empty() {
            let leftovers = apply::unresolved_types(program);
            if self.config.deny_unresolved {
                errors.extend(leftovers);
            } else {
                warnings.extend(leftovers);
            }
        }
        if recover {
            let filled = apply::fill_error_slots(program);
            if filled > 0 {
                debug!(filled, "filled untyped nodes with the error sentinel");
            }
        }

        TypeckResult {
            errors,
            warnings,
            constraint_count: self.constraints.len(),
            classes: self.classes,
        }
    }

    /// Run `f` with `scope` as the current scope, leaving it afterwards
    /// whether or not `f` succeeds.
    pub(crate) fn in_scope<R>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> R) -> R {
        self.env.push(scope);
        let out = f(self);
        self.env.pop();
        out
    }

    fn equal(&mut self, lhs: Ty, rhs: Ty, origin: ConstraintOrigin) {
        self.constraints.push(Constraint::equal(lhs, rhs, origin));
    }

    fn assignable(&mut self, from: Ty, to: Ty, origin: ConstraintOrigin) {
        self.constraints.push(Constraint::assignable(from, to, origin));
    }

    // ── Statements ─────────────────────────────────────────────────────

    pub(crate) fn infer_stmt(&mut self, stmt: &mut Stmt) -> Result<Ty, TypeError> {
        match stmt {
            Stmt::Var(decl) => self.infer_var(decl),
            Stmt::Field(decl) => self.infer_field(decl, None),
            Stmt::Function(decl) => self.infer_fn(decl),
            Stmt::Constructor(decl) => self.infer_ctor(decl),
            Stmt::Class(decl) => self.infer_class(decl),
            Stmt::Return(ret) => self.infer_return(ret),
            Stmt::Expr(expr) => self.infer_expr(expr, None),
        }
    }

    /// The declared type of a binding: the annotation if present (with the
    /// initializer checked against it), else the initializer's type, else a
    /// fresh variable.
    fn infer_binding(
        &mut self,
        annotation: Option<&Ty>,
        init: Option<&mut Expr>,
        span: Option<TextRange>,
    ) -> Result<Ty, TypeError> {
        match (annotation, init) {
            (Some(ann), Some(init)) => {
                let init_ty = self.infer_expr(init, None)?;
                self.assignable(
                    init_ty,
                    ann.clone(),
                    ConstraintOrigin::Annotation {
                        annotation_span: span,
                    },
                );
                Ok(ann.clone())
            }
            (None, Some(init)) => self.infer_expr(init, None),
            (Some(ann), None) => Ok(ann.clone()),
            (None, None) => Ok(self.ctx.fresh_var()),
        }
    }

    fn infer_var(&mut self, decl: &mut VarDecl) -> Result<Ty, TypeError> {
        let ty = self.infer_binding(decl.annotation.as_ref(), decl.init.as_mut(), decl.span)?;
        self.env.define(Symbol::new(decl.name.clone(), ty.clone()));
        decl.ty = Some(ty.clone());
        Ok(ty)
    }

    /// A field binding. For a field of `owner`, the type collected for member
    /// access is kept in step with the inferred one.
    fn infer_field(&mut self, decl: &mut FieldDecl, owner: Option<&str>) -> Result<Ty, TypeError> {
        let collected = owner
            .and_then(|class| self.classes.get(class))
            .and_then(|info| info.field_ty(&decl.name))
            .cloned();
        let ty = match collected {
            Some(prev) if decl.annotation.is_none() && decl.init.is_none() => prev,
            collected => {
                let ty =
                    self.infer_binding(decl.annotation.as_ref(), decl.init.as_mut(), decl.span)?;
                if let Some(prev) = collected {
                    if prev != ty {
                        self.equal(prev, ty.clone(), ConstraintOrigin::Field { span: decl.span });
                    }
                }
                ty
            }
        };
        self.env.define(Symbol::new(decl.name.clone(), ty.clone()));
        decl.ty = Some(ty.clone());
        Ok(ty)
    }

    fn infer_fn(&mut self, decl: &mut FnDecl) -> Result<Ty, TypeError> {
        let (params, declared_ret) = self.fn_signature(decl);
        let fn_ty = Ty::fun(params.clone(), declared_ret.clone());
        let fn_span = decl.span;

        let scope = self.env.new_child();
        let body_ret = self.in_scope(scope, |this| {
            for (param, ty) in decl.params.iter().zip(params) {
                this.env.define(Symbol::new(param.name.clone(), ty));
            }
            let mut first_ret: Option<Ty> = None;
            for stmt in decl.body.iter_mut() {
                this.infer_stmt(stmt)?;
                if let Stmt::Return(ret) = stmt {
                    if ret.value.is_none() {
                        continue;
                    }
                    let Some(ty) = ret.ty.clone() else { continue };
                    match first_ret.clone() {
                        None => first_ret = Some(ty),
                        Some(first) => this.equal(
                            first,
                            ty,
                            ConstraintOrigin::Return {
                                return_span: ret.span,
                                fn_span,
                            },
                        ),
                    }
                }
            }
            Ok::<_, TypeError>(first_ret.unwrap_or(Ty::Void))
        })?;

        self.equal(
            declared_ret,
            body_ret,
            ConstraintOrigin::Return {
                return_span: None,
                fn_span,
            },
        );
        decl.ty = Some(fn_ty.clone());
        Ok(fn_ty)
    }

    fn infer_ctor(&mut self, decl: &mut CtorDecl) -> Result<Ty, TypeError> {
        let params = self.ctor_params(decl);

        let scope = self.env.new_child();
        self.in_scope(scope, |this| {
            for (param, ty) in decl.params.iter().zip(params.iter()) {
                this.env.define(Symbol::new(param.name.clone(), ty.clone()));
            }
            for stmt in decl.body.iter_mut() {
                this.infer_stmt(stmt)?;
            }
            Ok::<_, TypeError>(())
        })?;

        // The class type is looked up from outside the class scope.
        let outer = self.env.parent(scope).and_then(|class| self.env.parent(class));
        let ret = match outer.and_then(|s| self.env.lookup_type_from(s, &decl.class_name)) {
            Some(ty) => ty.clone(),
            None => self.ctx.fresh_var(),
        };
        let ty = Ty::fun(params, ret);
        decl.ty = Some(ty.clone());
        Ok(ty)
    }

    fn infer_class(&mut self, decl: &mut ClassDecl) -> Result<Ty, TypeError> {
        let scope = self.class_scope(decl);
        let class_name = decl.name.clone();
        self.in_scope(scope, |this| {
            for field in decl.fields.iter_mut() {
                this.infer_field(field, Some(&class_name))?;
            }
            for method in decl.methods.iter_mut() {
                this.infer_fn(method)?;
            }
            for ctor in decl.ctors.iter_mut() {
                this.infer_ctor(ctor)?;
            }
            Ok::<_, TypeError>(())
        })?;
        let ty = Ty::class(decl.name.clone());
        decl.ty = Some(ty.clone());
        Ok(ty)
    }

    fn infer_return(&mut self, ret: &mut ReturnStmt) -> Result<Ty, TypeError> {
        let ty = match ret.value.as_mut() {
            Some(value) => self.infer_expr(value, None)?,
            None => Ty::Void,
        };
        ret.ty = Some(ty.clone());
        Ok(ty)
    }

    // ── Expressions ────────────────────────────────────────────────────

    /// Infer an expression's type and record it on the node.
    ///
    /// `expected` is a hint from the context (the target of an assignment).
    /// Only arithmetic operators use it.
    pub(crate) fn infer_expr(&mut self, expr: &mut Expr, expected: Option<&Ty>) -> Result<Ty, TypeError> {
        let span = expr.span;
        let ty = match &mut expr.kind {
            ExprKind::Literal(lit) => lit.ty.clone(),
            ExprKind::Identifier(name) => self.infer_identifier(name, span)?,
            ExprKind::Binary { lhs, op, rhs } => self.infer_binary(lhs, op, rhs, expected, span)?,
            ExprKind::Call { callee, args } => self.infer_call(callee, args, span)?,
            ExprKind::Member { object, member } => self.infer_member(object, member, span)?,
            ExprKind::Assign { target, value } => self.infer_assign(target, value, span)?,
            ExprKind::New { class_name, args } => self.infer_new(class_name, args, span)?,
        };
        expr.ty = Some(ty.clone());
        Ok(ty)
    }

    fn infer_identifier(&mut self, name: &str, span: Option<TextRange>) -> Result<Ty, TypeError> {
        if let Some(symbol) = self.env.lookup(name) {
            return Ok(symbol.ty.clone());
        }
        if self.config.strict_identifiers {
            return Err(TypeError::UndefinedIdentifier {
                name: name.to_string(),
                span,
            });
        }
        Ok(self.ctx.fresh_var())
    }

    fn infer_binary(
        &mut self,
        lhs: &mut Expr,
        op: &BinOp,
        rhs: &mut Expr,
        expected: Option<&Ty>,
        span: Option<TextRange>,
    ) -> Result<Ty, TypeError> {
        let lhs_ty = self.infer_expr(lhs, None)?;
        let rhs_ty = self.infer_expr(rhs, None)?;
        let origin = ConstraintOrigin::BinOp { op_span: span };

        match op.class() {
            OpClass::Arithmetic => {
                self.equal(lhs_ty.clone(), rhs_ty, origin.clone());
                if let Some(expected) = expected {
                    self.equal(lhs_ty.clone(), expected.clone(), origin);
                }
                Ok(lhs_ty)
            }
            OpClass::Comparison => {
                self.equal(lhs_ty, rhs_ty, origin);
                Ok(Ty::bool())
            }
            OpClass::Logical => {
                self.equal(lhs_ty, Ty::bool(), origin.clone());
                self.equal(rhs_ty, Ty::bool(), origin);
                Ok(Ty::bool())
            }
            OpClass::Unknown => {
                debug!(op = %op, "no typing rule for operator");
                Ok(self.ctx.fresh_var())
            }
        }
    }

    fn infer_call(
        &mut self,
        callee: &mut Expr,
        args: &mut [Expr],
        span: Option<TextRange>,
    ) -> Result<Ty, TypeError> {
        let mut arg_tys = Vec::with_capacity(args.len());
        for arg in args.iter_mut() {
            arg_tys.push(self.infer_expr(arg, None)?);
        }

        if let ExprKind::Identifier(name) = &callee.kind {
            if let Some(chosen) = self.resolve_overload(name, &arg_tys) {
                callee.ty = Some(chosen.fn_ty());
                return Ok(chosen.ret);
            }
        }

        match self.infer_expr(callee, None)? {
            Ty::Fun(params, ret) if params.len() == arg_tys.len() => {
                for (idx, (arg, param)) in arg_tys.into_iter().zip(params).enumerate() {
                    self.assignable(
                        arg,
                        param,
                        ConstraintOrigin::FnArg {
                            call_site: span,
                            param_idx: idx,
                        },
                    );
                }
                Ok(*ret)
            }
            callee_ty => {
                let ret = self.ctx.fresh_var();
                self.equal(
                    callee_ty,
                    Ty::fun(arg_tys, ret.clone()),
                    ConstraintOrigin::Call { call_site: span },
                );
                Ok(ret)
            }
        }
    }

    /// Pick the best overload of `name` for the given argument types.
    fn resolve_overload(&mut self, name: &str, args: &[Ty]) -> Option<Overload> {
        if !self.overloads.contains_key(name) {
            return None;
        }
        let args: Vec<Ty> = args.iter().map(|a| self.ctx.resolve(a.clone())).collect();
        let set = self.overloads.get(name)?;
        let chosen = overload::resolve(set, &args, &self.classes).cloned();
        debug!(
            function = name,
            candidates = set.len(),
            chosen = ?chosen.as_ref().map(Overload::fn_ty).map(|t| t.to_string()),
            "overload resolution"
        );
        chosen
    }

    fn infer_member(
        &mut self,
        object: &mut Expr,
        member: &str,
        span: Option<TextRange>,
    ) -> Result<Ty, TypeError> {
        let object_ty = self.infer_expr(object, None)?;
        let object_ty = self.ctx.resolve(object_ty);
        match &object_ty {
            Ty::Class(con, _) => match self.lookup_member(&con.name, member) {
                Some(ty) => Ok(ty),
                None => Err(TypeError::MemberNotFound {
                    ty: object_ty.clone(),
                    member: member.to_string(),
                    span,
                }),
            },
            Ty::Var(_) => Ok(self.ctx.fresh_var()),
            _ => Err(TypeError::UnsupportedMemberTarget {
                ty: object_ty.clone(),
                member: member.to_string(),
                span,
            }),
        }
    }

    /// Find a member's type on a class, fields before methods, then (if
    /// enabled) on each superclass in turn.
    fn lookup_member(&self, class_name: &str, member: &str) -> Option<Ty> {
        let mut current = self.classes.get(class_name);
        let mut hops = 0;
        while let Some(info) = current {
            if let Some(ty) = info.field_ty(member) {
                return Some(ty.clone());
            }
            if info.has_method(member) {
                // Like a bare name, a method reference sees its latest overload.
                return self
                    .methods
                    .get(&info.name)
                    .and_then(|sets| sets.get(member))
                    .and_then(|set| set.candidates.last())
                    .map(Overload::fn_ty);
            }
            if !self.config.inherited_members || hops >= self.classes.len() {
                return None;
            }
            hops += 1;
            current = info
                .superclass
                .as_ref()
                .and_then(Ty::class_name)
                .and_then(|name| self.classes.get(name));
        }
        None
    }

    fn infer_assign(
        &mut self,
        target: &mut Expr,
        value: &mut Expr,
        span: Option<TextRange>,
    ) -> Result<Ty, TypeError> {
        let target_ty = self.infer_expr(target, None)?;
        let value_ty = self.infer_expr(value, Some(&target_ty))?;
        self.assignable(value_ty, target_ty.clone(), ConstraintOrigin::Assignment { span });
        Ok(target_ty)
    }

    fn infer_new(
        &mut self,
        class_name: &str,
        args: &mut [Expr],
        span: Option<TextRange>,
    ) -> Result<Ty, TypeError> {
        let class_ty = match self.env.lookup_type(class_name) {
            Some(ty @ Ty::Class(..)) => ty.clone(),
            Some(other) => {
                return Err(TypeError::NotAClass {
                    name: class_name.to_string(),
                    found: other.clone(),
                    span,
                })
            }
            None => {
                return Err(TypeError::UndefinedClass {
                    name: class_name.to_string(),
                    span,
                })
            }
        };

        let mut arg_tys = Vec::with_capacity(args.len());
        for arg in args.iter_mut() {
            arg_tys.push(self.infer_expr(arg, None)?);
        }

        if let Some(ctor) = self.resolve_constructor(class_name, &arg_tys) {
            for (idx, (arg, param)) in arg_tys.into_iter().zip(ctor.params).enumerate() {
                self.assignable(
                    arg,
                    param,
                    ConstraintOrigin::Construction {
                        span,
                        param_idx: idx,
                    },
                );
            }
        }
        Ok(class_ty)
    }

    fn resolve_constructor(&mut self, class_name: &str, args: &[Ty]) -> Option<Overload> {
        let args: Vec<Ty> = args.iter().map(|a| self.ctx.resolve(a.clone())).collect();
        let set = self.constructors.get(class_name)?;
        let chosen = match self.config.constructor_resolution {
            CtorResolution::Arity => overload::first_arity_match(set, args.len()),
            CtorResolution::Scored => overload::resolve(set, &args, &self.classes)
                .or_else(|| overload::first_arity_match(set, args.len())),
        };
        debug!(class = class_name, found = chosen.is_some(), "constructor resolution");
        chosen.cloned()
    }
}
