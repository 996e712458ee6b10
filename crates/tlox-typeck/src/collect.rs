//! Declaration collection: the first pass over a program.
//!
//! Registers every top-level function, class and constructor signature
//! before any body is inferred, so bodies can refer to declarations that
//! appear later in the program. Method and constructor signatures are
//! collected inside their class scope.
//!
//! Each collected signature is also filed under (scope, kind, name) in
//! declaration order. The walker consumes those entries in the same order,
//! which lets every overload bind its own parameter types. Declarations
//! nested inside bodies are not visited here; the walker collects them on
//! first encounter.

use tlox_ast::{ClassDecl, CtorDecl, FnDecl, Param, Stmt};
use tracing::{debug, warn};

use crate::classes::ClassInfo;
use crate::env::{ScopeId, Symbol};
use crate::infer::TypeChecker;
use crate::overload::{Overload, OverloadSet};
use crate::ty::Ty;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum DeclKind {
    Function,
    Constructor,
    Class,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct DeclKey {
    scope: ScopeId,
    kind: DeclKind,
    name: String,
}

/// What the collector recorded for one declaration.
#[derive(Clone, Debug)]
pub(crate) enum Collected {
    Signature { params: Vec<Ty>, ret: Ty },
    Class(ScopeId),
}

/// The constructor symbol bound in a class scope.
pub fn ctor_symbol(class_name: &str) -> String {
    format!("{}.<init>", class_name)
}

impl TypeChecker {
    pub(crate) fn collect_program(&mut self, program: &[Stmt]) {
        for stmt in program {
            self.collect_stmt(stmt);
        }
    }

    fn collect_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Function(decl) => {
                self.collect_fn(decl, None);
            }
            Stmt::Class(decl) => {
                self.collect_class(decl);
            }
            Stmt::Constructor(decl) => {
                self.collect_ctor(decl);
            }
            Stmt::Var(_) | Stmt::Field(_) | Stmt::Return(_) | Stmt::Expr(_) => {}
        }
    }

    /// Parameter types from annotations, with a fresh variable for each
    /// unannotated parameter.
    fn param_types(&mut self, params: &[Param]) -> Vec<Ty> {
        params
            .iter()
            .map(|p| match &p.annotation {
                Some(ty) => ty.clone(),
                None => self.ctx.fresh_var(),
            })
            .collect()
    }

    /// Register a function signature in the current scope and in its overload
    /// set. Methods (`owner` is their class) get a set of their own per class,
    /// so they never compete with free functions of the same name.
    pub(crate) fn collect_fn(&mut self, decl: &FnDecl, owner: Option<&str>) -> Ty {
        let params = self.param_types(&decl.params);
        let ret = match &decl.ret {
            Some(ty) => ty.clone(),
            None => self.ctx.fresh_var(),
        };
        let fn_ty = Ty::fun(params.clone(), ret.clone());
        debug!(function = %decl.name, ty = %fn_ty, "collected function");

        let sets = match owner {
            Some(class) => self.methods.entry(class.to_string()).or_default(),
            None => &mut self.overloads,
        };
        sets.entry(decl.name.clone())
            .or_insert_with(|| OverloadSet::new(decl.name.clone()))
            .add(Overload {
                params: params.clone(),
                ret: ret.clone(),
                span: decl.span,
            });
        self.env
            .define(Symbol::immutable(decl.name.clone(), fn_ty.clone()));
        self.record(DeclKind::Function, &decl.name, Collected::Signature { params, ret });
        fn_ty
    }

    /// Register a class: its type name, its member scope, its fields, and
    /// (inside that scope) its method and constructor signatures.
    pub(crate) fn collect_class(&mut self, decl: &ClassDecl) -> ScopeId {
        let superclass = decl.superclass.as_ref().and_then(|name| {
            match self.env.lookup_type(name) {
                Some(ty @ Ty::Class(..)) => Some(ty.clone()),
                other => {
                    warn!(
                        class = %decl.name,
                        superclass = %name,
                        found = ?other,
                        "superclass is not a known class; treating class as a root"
                    );
                    None
                }
            }
        });

        let class_ty = Ty::class(decl.name.clone());
        self.env.define_type(decl.name.clone(), class_ty.clone());

        let scope = self.env.new_child();
        self.env
            .define_in(scope, Symbol::immutable("this", class_ty.clone()));
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            let ty = match &field.annotation {
                Some(ty) => ty.clone(),
                None => self.ctx.fresh_var(),
            };
            self.env.define_in(scope, Symbol::new(field.name.clone(), ty.clone()));
            fields.push((field.name.clone(), ty));
        }

        self.classes.register(ClassInfo {
            name: decl.name.clone(),
            ty: class_ty,
            superclass,
            scope,
            fields,
            methods: decl.methods.iter().map(|m| m.name.clone()).collect(),
        });
        self.record(DeclKind::Class, &decl.name, Collected::Class(scope));
        debug!(class = %decl.name, fields = decl.fields.len(), methods = decl.methods.len(), "collected class");

        self.in_scope(scope, |this| {
            for method in &decl.methods {
                this.collect_fn(method, Some(&decl.name));
            }
            for ctor in &decl.ctors {
                this.collect_ctor(ctor);
            }
        });
        scope
    }

    /// Register a constructor signature. The return type is the named class,
    /// or a fresh variable when that name does not resolve.
    pub(crate) fn collect_ctor(&mut self, decl: &CtorDecl) -> Ty {
        let params = self.param_types(&decl.params);
        let ret = match self.env.lookup_type(&decl.class_name) {
            Some(ty) => ty.clone(),
            None => self.ctx.fresh_var(),
        };
        let fn_ty = Ty::fun(params.clone(), ret.clone());
        debug!(class = %decl.class_name, ty = %fn_ty, "collected constructor");

        self.constructors
            .entry(decl.class_name.clone())
            .or_insert_with(|| OverloadSet::new(ctor_symbol(&decl.class_name)))
            .add(Overload {
                params: params.clone(),
                ret: ret.clone(),
                span: decl.span,
            });
        self.env
            .define(Symbol::immutable(ctor_symbol(&decl.class_name), fn_ty.clone()));
        self.record(
            DeclKind::Constructor,
            &decl.class_name,
            Collected::Signature { params, ret },
        );
        fn_ty
    }

    fn record(&mut self, kind: DeclKind, name: &str, collected: Collected) {
        let key = DeclKey {
            scope: self.env.current(),
            kind,
            name: name.to_string(),
        };
        self.collected.entry(key).or_default().push(collected);
    }

    /// Take the next collected entry for a declaration in the current scope.
    pub(crate) fn take_collected(&mut self, kind: DeclKind, name: &str) -> Option<Collected> {
        let key = DeclKey {
            scope: self.env.current(),
            kind,
            name: name.to_string(),
        };
        let entries = self.collected.get(&key)?;
        let cursor = self.cursors.entry(key).or_insert(0);
        let entry = entries.get(*cursor)?.clone();
        *cursor += 1;
        Some(entry)
    }

    /// The collected signature of a function, collecting it now if the first
    /// pass did not reach it.
    pub(crate) fn fn_signature(&mut self, decl: &FnDecl) -> (Vec<Ty>, Ty) {
        if let Some(Collected::Signature { params, ret }) =
            self.take_collected(DeclKind::Function, &decl.name)
        {
            return (params, ret);
        }
        self.collect_fn(decl, None);
        match self.take_collected(DeclKind::Function, &decl.name) {
            Some(Collected::Signature { params, ret }) => (params, ret),
            _ => unreachable!("function signature was just collected"),
        }
    }

    /// The collected parameter types of a constructor, collecting it now if needed.
    pub(crate) fn ctor_params(&mut self, decl: &CtorDecl) -> Vec<Ty> {
        if let Some(Collected::Signature { params, .. }) =
            self.take_collected(DeclKind::Constructor, &decl.class_name)
        {
            return params;
        }
        self.collect_ctor(decl);
        match self.take_collected(DeclKind::Constructor, &decl.class_name) {
            Some(Collected::Signature { params, .. }) => params,
            _ => unreachable!("constructor signature was just collected"),
        }
    }

    /// The member scope of a class, collecting the class now if needed.
    pub(crate) fn class_scope(&mut self, decl: &ClassDecl) -> ScopeId {
        match self.take_collected(DeclKind::Class, &decl.name) {
            Some(Collected::Class(scope)) => scope,
            _ => {
                let scope = self.collect_class(decl);
                self.take_collected(DeclKind::Class, &decl.name);
                scope
            }
        }
    }
}
