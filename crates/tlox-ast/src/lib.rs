//! AST consumed and annotated by the tlox type checker.
//!
//! The front end hands the checker a sequence of top-level [`Stmt`]s. Every
//! statement and expression node owns an `Option<Ty>` slot, unset when the
//! tree is built and filled in by the checker. Nodes optionally carry a
//! source range so diagnostics can point back at the program text.
//!
//! # Modules
//!
//! - [`expr`]: expression nodes and binary operators
//! - [`item`]: declarations and statements
//! - [`visit`]: traversal over every node's type slot

pub mod expr;
pub mod item;
pub mod visit;

pub use expr::{BinOp, Expr, ExprKind, LitValue, Literal, OpClass};
pub use item::{ClassDecl, CtorDecl, FieldDecl, FnDecl, Param, ReturnStmt, Stmt, VarDecl};
pub use rowan::TextRange;
pub use tlox_types::Ty;
