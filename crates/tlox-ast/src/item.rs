//! Declarations and statements.

use rowan::TextRange;
use tlox_types::Ty;

use crate::expr::Expr;

/// A statement node. Each variant's payload owns its own type slot.
#[derive(Clone, Debug)]
pub enum Stmt {
    Var(VarDecl),
    Field(FieldDecl),
    Function(FnDecl),
    Constructor(CtorDecl),
    Class(ClassDecl),
    Return(ReturnStmt),
    /// An expression evaluated for its effect.
    Expr(Expr),
}

impl Stmt {
    /// The node's inferred type, if the checker has set it.
    pub fn ty(&self) -> Option<&Ty> {
        match self {
            Stmt::Var(d) => d.ty.as_ref(),
            Stmt::Field(d) => d.ty.as_ref(),
            Stmt::Function(d) => d.ty.as_ref(),
            Stmt::Constructor(d) => d.ty.as_ref(),
            Stmt::Class(d) => d.ty.as_ref(),
            Stmt::Return(r) => r.ty.as_ref(),
            Stmt::Expr(e) => e.ty.as_ref(),
        }
    }

    pub fn span(&self) -> Option<TextRange> {
        match self {
            Stmt::Var(d) => d.span,
            Stmt::Field(d) => d.span,
            Stmt::Function(d) => d.span,
            Stmt::Constructor(d) => d.span,
            Stmt::Class(d) => d.span,
            Stmt::Return(r) => r.span,
            Stmt::Expr(e) => e.span,
        }
    }

    /// Attach a source range to the statement node.
    pub fn with_span(mut self, span: TextRange) -> Stmt {
        let slot = match &mut self {
            Stmt::Var(d) => &mut d.span,
            Stmt::Field(d) => &mut d.span,
            Stmt::Function(d) => &mut d.span,
            Stmt::Constructor(d) => &mut d.span,
            Stmt::Class(d) => &mut d.span,
            Stmt::Return(r) => &mut r.span,
            Stmt::Expr(e) => &mut e.span,
        };
        *slot = Some(span);
        self
    }

    /// `var name [: annotation] [= init];`
    pub fn var(name: impl Into<String>, annotation: Option<Ty>, init: Option<Expr>) -> Stmt {
        Stmt::Var(VarDecl {
            name: name.into(),
            annotation,
            init,
            span: None,
            ty: None,
        })
    }

    /// `return [value];`
    pub fn ret(value: Option<Expr>) -> Stmt {
        Stmt::Return(ReturnStmt {
            value,
            span: None,
            ty: None,
        })
    }

    pub fn expr(expr: Expr) -> Stmt {
        Stmt::Expr(expr)
    }
}

/// `var name [: annotation] [= init];`
#[derive(Clone, Debug)]
pub struct VarDecl {
    pub name: String,
    pub annotation: Option<Ty>,
    pub init: Option<Expr>,
    pub span: Option<TextRange>,
    pub ty: Option<Ty>,
}

impl VarDecl {
    pub fn with_span(mut self, span: TextRange) -> Self {
        self.span = Some(span);
        self
    }
}

/// A class field: `name [: annotation] [= init];`
#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub name: String,
    pub annotation: Option<Ty>,
    pub init: Option<Expr>,
    pub span: Option<TextRange>,
    pub ty: Option<Ty>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, annotation: Option<Ty>, init: Option<Expr>) -> Self {
        FieldDecl {
            name: name.into(),
            annotation,
            init,
            span: None,
            ty: None,
        }
    }

    pub fn with_span(mut self, span: TextRange) -> Self {
        self.span = Some(span);
        self
    }
}

/// A function or constructor parameter. Unannotated parameters get a
/// fresh type variable during collection.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub annotation: Option<Ty>,
}

impl Param {
    pub fn typed(name: impl Into<String>, ty: Ty) -> Self {
        Param {
            name: name.into(),
            annotation: Some(ty),
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            annotation: None,
        }
    }
}

/// A function (or method) declaration.
#[derive(Clone, Debug)]
pub struct FnDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Option<Ty>,
    pub body: Vec<Stmt>,
    pub span: Option<TextRange>,
    /// Set to the function's signature type.
    pub ty: Option<Ty>,
}

impl FnDecl {
    pub fn new(name: impl Into<String>, params: Vec<Param>, ret: Option<Ty>, body: Vec<Stmt>) -> Self {
        FnDecl {
            name: name.into(),
            params,
            ret,
            body,
            span: None,
            ty: None,
        }
    }

    pub fn with_span(mut self, span: TextRange) -> Self {
        self.span = Some(span);
        self
    }
}

/// A constructor declaration. Its return type is always the enclosing class.
#[derive(Clone, Debug)]
pub struct CtorDecl {
    pub class_name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Option<TextRange>,
    pub ty: Option<Ty>,
}

impl CtorDecl {
    pub fn new(class_name: impl Into<String>, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        CtorDecl {
            class_name: class_name.into(),
            params,
            body,
            span: None,
            ty: None,
        }
    }

    pub fn with_span(mut self, span: TextRange) -> Self {
        self.span = Some(span);
        self
    }
}

/// A class declaration with at most one superclass.
#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub name: String,
    pub superclass: Option<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<FnDecl>,
    pub ctors: Vec<CtorDecl>,
    pub span: Option<TextRange>,
    pub ty: Option<Ty>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        ClassDecl {
            name: name.into(),
            superclass: None,
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
            span: None,
            ty: None,
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: FnDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn constructor(mut self, ctor: CtorDecl) -> Self {
        self.ctors.push(ctor);
        self
    }

    pub fn with_span(mut self, span: TextRange) -> Self {
        self.span = Some(span);
        self
    }
}

/// `return [value];`
#[derive(Clone, Debug)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Option<TextRange>,
    pub ty: Option<Ty>,
}

impl From<VarDecl> for Stmt {
    fn from(decl: VarDecl) -> Self {
        Stmt::Var(decl)
    }
}

impl From<FnDecl> for Stmt {
    fn from(decl: FnDecl) -> Self {
        Stmt::Function(decl)
    }
}

impl From<ClassDecl> for Stmt {
    fn from(decl: ClassDecl) -> Self {
        Stmt::Class(decl)
    }
}

impl From<Expr> for Stmt {
    fn from(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }
}
