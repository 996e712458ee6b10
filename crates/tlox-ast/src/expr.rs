//! Expression nodes.

use std::fmt;

use rowan::TextRange;
use tlox_types::Ty;

/// An expression node together with its source range and inferred-type slot.
#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Option<TextRange>,
    /// Unset until the checker visits the node.
    pub ty: Option<Ty>,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    /// A literal; its type is carried on the node.
    Literal(Literal),
    /// A bare name.
    Identifier(String),
    /// `lhs op rhs`.
    Binary {
        lhs: Box<Expr>,
        op: BinOp,
        rhs: Box<Expr>,
    },
    /// `callee(args...)`.
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// `object.member`.
    Member { object: Box<Expr>, member: String },
    /// `target = value`.
    Assign { target: Box<Expr>, value: Box<Expr> },
    /// `new ClassName(args...)`.
    New { class_name: String, args: Vec<Expr> },
}

/// A literal value and the type the front end assigned to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub value: LitValue,
    pub ty: Ty,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LitValue {
    Int(i64),
    Str(String),
    Bool(bool),
}

/// A binary operator.
///
/// Operators the checker has no rule for are kept verbatim in `Other`
/// rather than rejected by the front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
    Other(String),
}

/// The typing rule family an operator belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpClass {
    Arithmetic,
    Comparison,
    Logical,
    Unknown,
}

impl BinOp {
    /// Map a source operator symbol to a `BinOp`.
    pub fn from_symbol(symbol: &str) -> BinOp {
        match symbol {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Mod,
            "==" => BinOp::Eq,
            "!=" => BinOp::NotEq,
            "<" => BinOp::Lt,
            ">" => BinOp::Gt,
            "<=" => BinOp::LtEq,
            ">=" => BinOp::GtEq,
            "&&" => BinOp::And,
            "||" => BinOp::Or,
            other => BinOp::Other(other.to_string()),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Other(s) => s,
        }
    }

    pub fn class(&self) -> OpClass {
        match self {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => OpClass::Arithmetic,
            BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => {
                OpClass::Comparison
            }
            BinOp::And | BinOp::Or => OpClass::Logical,
            BinOp::Other(_) => OpClass::Unknown,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ── Builders ───────────────────────────────────────────────────────────

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr { kind, span: None, ty: None }
    }

    /// Attach a source range.
    pub fn with_span(mut self, span: TextRange) -> Self {
        self.span = Some(span);
        self
    }

    pub fn literal(value: LitValue, ty: Ty) -> Self {
        Expr::new(ExprKind::Literal(Literal { value, ty }))
    }

    /// An `int` literal.
    pub fn int(value: i64) -> Self {
        Expr::literal(LitValue::Int(value), Ty::int())
    }

    /// A `string` literal.
    pub fn string(value: impl Into<String>) -> Self {
        Expr::literal(LitValue::Str(value.into()), Ty::string())
    }

    /// A `bool` literal.
    pub fn bool(value: bool) -> Self {
        Expr::literal(LitValue::Bool(value), Ty::bool())
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::new(ExprKind::Identifier(name.into()))
    }

    pub fn binary(lhs: Expr, op: BinOp, rhs: Expr) -> Self {
        Expr::new(ExprKind::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::Call {
            callee: Box::new(callee),
            args,
        })
    }

    pub fn member(object: Expr, member: impl Into<String>) -> Self {
        Expr::new(ExprKind::Member {
            object: Box::new(object),
            member: member.into(),
        })
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::new(ExprKind::Assign {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn new_instance(class_name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::New {
            class_name: class_name.into(),
            args,
        })
    }
}
