//! tlox type checker: constraint-based inference for a small class-based language.
//!
//! Takes an AST from `tlox-ast`, assigns a type to every node in place, and
//! reports type errors. Unannotated variables, parameters and return types
//! are inferred. Features:
//!
//! - Two-pass checking, so declarations may be used before they appear
//! - Equality constraints solved by unification with an occurs check
//! - Nominal subtyping through single class inheritance
//! - Score-based overload resolution for functions and constructors
//! - A recovery mode that reports as many errors as it can
//!
//! # Architecture
//!
//! - [`ty`]: Core type representation (re-exported from `tlox-types`)
//! - [`env`]: Scope arena with lexical lookup
//! - [`classes`]: Class table and the assignability relation
//! - [`unify`]: Unification engine on `ena`'s union-find table
//! - [`solve`]: Constraints and the solver loop
//! - [`overload`]: Overload sets and scoring
//! - [`collect`]: Declaration collection (first pass)
//! - [`infer`]: Inference walker and checking pipeline (second pass onward)
//! - [`apply`]: Substitution and leftover-variable passes over type slots
//! - [`generic`]: Type-parameter matching for generic calls
//! - [`config`]: Checker options, loadable from TOML
//! - [`diagnostics`]: Ariadne and JSON rendering of errors

pub mod apply;
pub mod builtins;
pub mod classes;
pub mod collect;
pub mod config;
pub mod diagnostics;
pub mod env;
pub mod error;
pub mod generic;
pub mod infer;
pub mod overload;
pub mod solve;
pub mod unify;

pub use tlox_types as ty;

use tlox_ast::Stmt;

pub use crate::classes::ClassTable;
pub use crate::config::{CtorResolution, InferConfig};
pub use crate::error::{ConstraintOrigin, TypeError};
pub use crate::infer::TypeChecker;

/// The result of checking a tlox program.
///
/// The inferred types themselves live in the AST's type slots.
#[derive(Debug)]
pub struct TypeckResult {
    /// Type errors found during checking.
    pub errors: Vec<TypeError>,
    /// Leftover type variables, when they are not configured as errors.
    pub warnings: Vec<TypeError>,
    /// Number of constraints the walker emitted.
    pub constraint_count: usize,
    /// Every class collected from the program.
    pub classes: ClassTable,
}

impl TypeckResult {
    /// Whether the program type-checked.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Render all errors, then all warnings, with ariadne.
    pub fn render_errors(&self, source: &str, filename: &str) -> Vec<String> {
        let errors = self
            .errors
            .iter()
            .map(|e| diagnostics::render_diagnostic(e, &self.classes, source, filename));
        let warnings = self
            .warnings
            .iter()
            .map(|w| diagnostics::render_warning(w, &self.classes, source, filename));
        errors.chain(warnings).collect()
    }

    /// All errors, then all warnings, as JSON diagnostics.
    pub fn to_json(&self, filename: &str) -> Vec<serde_json::Value> {
        let errors = self
            .errors
            .iter()
            .map(|e| diagnostics::diagnostic_json(e, &self.classes, filename));
        let warnings = self
            .warnings
            .iter()
            .map(|w| diagnostics::warning_json(w, &self.classes, filename));
        errors.chain(warnings).collect()
    }
}

/// Type-check a program with the default configuration, stopping at the
/// first error.
pub fn check(program: &mut [Stmt]) -> TypeckResult {
    check_with_config(program, &InferConfig::default())
}

pub fn check_with_config(program: &mut [Stmt], config: &InferConfig) -> TypeckResult {
    TypeChecker::new(config.clone()).infer_program(program)
}

/// Type-check a program in recovery mode. See
/// [`TypeChecker::infer_program_with_recovery`].
pub fn check_with_recovery(program: &mut [Stmt], config: &InferConfig) -> TypeckResult {
    TypeChecker::new(config.clone()).infer_program_with_recovery(program)
}
